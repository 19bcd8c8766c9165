//! Line-oriented grammar syntax.
//!
//! ```text
//! Expr -> $$$Term$$$ $$$ExprTail$$$
//! ExprTail -> + $$$Term$$$ $$$ExprTail$$$ ||| ###
//! ```
//!
//! Each non-blank line has the form `Name -> alternative ||| alternative ...`,
//! where an alternative is a whitespace-separated list of tokens. Lines with
//! the same `Name` append further alternatives.

use crate::{grammar::GrammarError, types::Map};

/// The separator between the left-hand side and the alternatives.
pub const ARROW: &str = "->";

/// The separator between alternatives on a line.
pub const ALTERNATION: &str = "|||";

/// Productions keyed by nonterminal name, each alternative a list of tokens.
pub type Productions = Map<String, Vec<Vec<String>>>;

pub fn parse(source: &str) -> Result<Productions, GrammarError> {
    let span = tracing::trace_span!("parse");
    let _entered = span.enter();

    let mut productions = Productions::default();
    for (i, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let lineno = i + 1;
        let (name, alternatives) = parse_line(line).map_err(|msg| GrammarError::Syntax {
            line: lineno,
            msg,
        })?;
        tracing::trace!("line {}: {} -> {:?}", lineno, name, alternatives);
        productions
            .entry(name.to_owned())
            .or_default()
            .extend(alternatives);
    }

    Ok(productions)
}

fn parse_line(line: &str) -> Result<(&str, Vec<Vec<String>>), String> {
    let (name, body) = line
        .split_once(ARROW)
        .ok_or_else(|| format!("missing `{}'", ARROW))?;
    if body.contains(ARROW) {
        return Err(format!("more than one `{}' on a line", ARROW));
    }

    let name = name.trim();
    if name.is_empty() {
        return Err("missing nonterminal name".into());
    }

    let mut alternatives = vec![];
    for (i, alternative) in body.split(ALTERNATION).enumerate() {
        let tokens: Vec<String> = alternative.split_whitespace().map(str::to_owned).collect();
        if tokens.is_empty() {
            return Err(format!("alternative #{} of `{}' is empty", i + 1, name));
        }
        alternatives.push(tokens);
    }

    Ok((name, alternatives))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternatives_and_repeated_lines() {
        let productions = parse(
            "\nD -> Hello ||| ###\n   \nA -> $$$B$$$  $$$C$$$\nD -> World\n",
        )
        .unwrap();

        assert_eq!(productions.keys().collect::<Vec<_>>(), ["D", "A"]);
        assert_eq!(
            productions["D"],
            [vec!["Hello"], vec!["###"], vec!["World"]]
        );
        assert_eq!(productions["A"], [vec!["$$$B$$$", "$$$C$$$"]]);
    }

    #[test]
    fn alternation_needs_no_whitespace() {
        let productions = parse("S -> a|||b c").unwrap();
        assert_eq!(productions["S"], [vec!["a"], vec!["b", "c"]]);
    }

    #[test]
    fn syntax_errors_report_line() {
        let cases = [
            ("S -> a\nT b\n", 2),
            ("\n\nS -> a -> b", 3),
            (" -> a", 1),
            ("S -> a |||", 1),
            ("S ->", 1),
        ];
        for (source, expected) in cases {
            match parse(source) {
                Err(GrammarError::Syntax { line, .. }) => assert_eq!(line, expected, "{:?}", source),
                other => panic!("unexpected result for {:?}: {:?}", source, other),
            }
        }
    }
}
