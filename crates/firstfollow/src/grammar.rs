//! Grammar types.

use crate::{
    symbol::Symbol,
    types::{Map, Set},
    util::{display_fn, write_joined},
};
use std::{fmt, fs, io, marker::PhantomData, path::Path, str::FromStr};

/// The type that represents a production rule in grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    left: String,
    right: Vec<Symbol>,
}

impl Rule {
    /// Return the name of the nonterminal this rule expands.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Return the right-hand side of this production.
    pub fn right(&self) -> &[Symbol] {
        &self.right[..]
    }

    /// Return whether this rule is exactly `###`.
    pub fn is_epsilon(&self) -> bool {
        matches!(self.right(), [Symbol::Epsilon])
    }
}

// `"LHS -> R1 R2 R3"`
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ", self.left)?;
        write_joined(f, &self.right, " ")
    }
}

/// An immutable collection of production rules, grouped by nonterminal.
///
/// Nonterminals and their alternatives keep the order in which they were
/// defined.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Map<String, Vec<Rule>>,
}

impl Grammar {
    /// Construct a grammar from `(name, rules)` pairs, each rule being a list
    /// of encoded tokens.
    ///
    /// A name that occurs more than once gets the alternatives of every
    /// occurrence, in order.
    pub fn new<I, N, R, T>(productions: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (N, R)>,
        N: AsRef<str>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self::define(|g| {
            for (name, rules) in productions {
                let name = name.as_ref();
                g.nonterminal(name)?;
                for rule in rules {
                    g.rule(name, rule)?;
                }
            }
            Ok(())
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let source = fs::read_to_string(path).map_err(GrammarError::IO)?;
        source.parse()
    }

    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarError>
    where
        F: FnOnce(&mut GrammarDef<'_>) -> Result<(), GrammarError>,
    {
        let mut def = GrammarDef {
            productions: Map::default(),
            _marker: PhantomData,
        };
        f(&mut def)?;
        def.end()
    }

    /// Return the names of the declared nonterminals.
    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.productions.keys().map(String::as_str)
    }

    /// Return whether `name` is a declared nonterminal.
    pub fn contains_class(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }

    /// Return the alternatives of the nonterminal `name`.
    pub fn rules_of(&self, name: &str) -> Result<&[Rule], GrammarError> {
        self.productions
            .get(name)
            .map(|rules| &rules[..])
            .ok_or_else(|| GrammarError::UnknownSymbol {
                name: name.to_owned(),
                context: "not declared in the grammar".into(),
            })
    }

    /// Iterate over all production rules.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.productions.values().flatten()
    }

    /// Collect every symbol that appears in this grammar, except epsilon.
    ///
    /// The declared nonterminals come first, followed by the remaining
    /// symbols in the order they occur on right-hand sides.
    pub fn vocabulary(&self) -> Set<Symbol> {
        let mut vocab: Set<Symbol> = self.classes().map(Symbol::nonterminal).collect();
        for rule in self.rules() {
            vocab.extend(rule.right().iter().filter(|s| !s.is_epsilon()).cloned());
        }
        vocab
    }

    // `"LHS -> R1 R2 ||| R3"`
    fn display_class<'g>(&'g self, name: &'g str, rules: &'g [Rule]) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            write!(f, "{} -> ", name)?;
            for (i, rule) in rules.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ||| ")?;
                }
                write_joined(f, rule.right(), " ")?;
            }
            Ok(())
        })
    }
}

/// Formats the grammar in the text syntax accepted by `FromStr`.
impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, rules) in &self.productions {
            writeln!(f, "{}", self.display_class(name, rules))?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let productions = crate::syntax::parse(source)?;
        Self::new(productions)
    }
}

/// The contextural values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef<'def> {
    productions: Map<String, Vec<Rule>>,
    _marker: PhantomData<&'def mut ()>,
}

impl<'def> GrammarDef<'def> {
    /// Declare a nonterminal symbol used in this grammar.
    ///
    /// Every declared nonterminal must receive at least one rule before the
    /// definition ends.
    pub fn nonterminal(&mut self, name: &str) -> Result<(), GrammarError> {
        if name.is_empty() {
            return Err(GrammarError::malformed("empty nonterminal name"));
        }
        if !self.productions.contains_key(name) {
            self.productions.insert(name.to_owned(), vec![]);
        }
        Ok(())
    }

    /// Append an alternative to the nonterminal `name`, declaring it if needed.
    pub fn rule<I, T>(&mut self, name: &str, tokens: I) -> Result<(), GrammarError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.nonterminal(name)?;
        let right: Vec<Symbol> = tokens
            .into_iter()
            .map(|token| Symbol::from_token(token.as_ref()))
            .collect();
        if right.is_empty() {
            return Err(GrammarError::malformed(format!(
                "empty production rule for nonterminal `{}'",
                name
            )));
        }

        let rules = self.productions.entry(name.to_owned()).or_default();
        rules.push(Rule {
            left: name.to_owned(),
            right,
        });
        Ok(())
    }

    fn end(self) -> Result<Grammar, GrammarError> {
        for (name, rules) in &self.productions {
            if rules.is_empty() {
                return Err(GrammarError::malformed(format!(
                    "nonterminal `{}' has no production rules",
                    name
                )));
            }
        }
        tracing::debug!(
            "defined grammar: {} nonterminals, {} rules",
            self.productions.len(),
            self.productions.values().map(Vec::len).sum::<usize>()
        );
        Ok(Grammar {
            productions: self.productions,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("malformed grammar: {}", msg)]
    Malformed { msg: String },

    #[error("unknown nonterminal `{}' ({})", name, context)]
    UnknownSymbol { name: String, context: String },

    #[error("syntax error at line {}: {}", line, msg)]
    Syntax { line: usize, msg: String },

    #[error("IO error: {}", _0)]
    IO(io::Error),
}

impl GrammarError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed { msg: msg.into() }
    }
}
