//! Calculation of FIRST and FOLLOW sets.
//!
//! The sets are the least solution of the following equations, where `X` is
//! a nonterminal, `t` a terminal and `ε` the epsilon sentinel:
//!
//! * `First(t) = {t}`
//! * `First(X)` is the union over the alternatives of `X` of
//!   `Follow(X)` for `X -> ε`, `First(Y)` for `X -> ε Y ...`, and
//!   `First(Y)` for `X -> Y ...`.
//! * `Follow(s)` is the union over every occurrence of `s` in `Y -> ... s Z ...`
//!   of `First(Z)`, or of `Follow(Y)` when `s` is the last symbol.
//!
//! FIRST and FOLLOW refer to each other, so a query is not answered by
//! recursion. Instead, the equations the query transitively depends on are
//! collected and repeatedly evaluated until a whole pass adds nothing. The
//! sets only grow and the terminals are finite, so this always terminates.

use crate::{
    grammar::{Grammar, GrammarError, Rule},
    symbol::Symbol,
    types::{Map, Set},
    util::write_joined,
};
use std::{fmt, mem};

/// A set of terminals, in the order they were discovered.
pub type TerminalSet = Set<String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SetKey {
    First(Symbol),
    Follow(Symbol),
}

impl fmt::Display for SetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First(s) => write!(f, "FIRST({})", s),
            Self::Follow(s) => write!(f, "FOLLOW({})", s),
        }
    }
}

/// `key = base ∪ deps[0] ∪ deps[1] ∪ ...`
#[derive(Debug, Default)]
struct Equation {
    base: TerminalSet,
    deps: Vec<SetKey>,
}

/// Memoized FIRST/FOLLOW queries over a grammar.
#[derive(Debug)]
pub struct FirstFollow<'g> {
    grammar: &'g Grammar,
    first_sets: Map<Symbol, TerminalSet>,
    follow_sets: Map<Symbol, TerminalSet>,
}

impl<'g> FirstFollow<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            first_sets: Map::default(),
            follow_sets: Map::default(),
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Return the set of terminals that can begin a derivation from `symbol`.
    pub fn first(&mut self, symbol: &Symbol) -> Result<&TerminalSet, GrammarError> {
        self.solve(SetKey::First(symbol.clone()))?;
        Ok(&self.first_sets[symbol])
    }

    /// Return the set of terminals that can immediately follow `symbol`.
    ///
    /// Any symbol may be queried; one that never occurs in a rule has an
    /// empty FOLLOW set.
    pub fn follow(&mut self, symbol: &Symbol) -> Result<&TerminalSet, GrammarError> {
        self.solve(SetKey::Follow(symbol.clone()))?;
        Ok(&self.follow_sets[symbol])
    }

    /// Compute the FIRST sets of all declared nonterminals.
    pub fn compute_first_sets(&mut self) -> Result<(), GrammarError> {
        let grammar = self.grammar;
        for class in grammar.classes() {
            self.solve(SetKey::First(Symbol::nonterminal(class)))?;
        }
        Ok(())
    }

    /// Compute the FOLLOW sets of every symbol in `vocabulary`.
    pub fn compute_follow_sets<'a, I>(&mut self, vocabulary: I) -> Result<(), GrammarError>
    where
        I: IntoIterator<Item = &'a Symbol>,
    {
        for symbol in vocabulary {
            self.solve(SetKey::Follow(symbol.clone()))?;
        }
        Ok(())
    }

    /// Return the FIRST set of `symbol` if it has already been computed.
    pub fn cached_first(&self, symbol: &Symbol) -> Option<&TerminalSet> {
        self.first_sets.get(symbol)
    }

    /// Return the FOLLOW set of `symbol` if it has already been computed.
    pub fn cached_follow(&self, symbol: &Symbol) -> Option<&TerminalSet> {
        self.follow_sets.get(symbol)
    }

    /// Finish the analysis, keeping the computed sets as immutable tables.
    pub fn into_tables(self) -> SetTables {
        SetTables {
            first_sets: self.first_sets,
            follow_sets: self.follow_sets,
            empty: TerminalSet::default(),
        }
    }

    fn cached(&self, key: &SetKey) -> Option<&TerminalSet> {
        match key {
            SetKey::First(s) => self.first_sets.get(s),
            SetKey::Follow(s) => self.follow_sets.get(s),
        }
    }

    fn solve(&mut self, root: SetKey) -> Result<(), GrammarError> {
        if self.cached(&root).is_some() {
            return Ok(());
        }

        let span = tracing::debug_span!("solve", key = %root);
        let _entered = span.enter();

        // Collect every unsolved equation reachable from the root. Nothing is
        // cached until all of them are known to be well-formed.
        let mut equations: Map<SetKey, Equation> = Map::default();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if equations.contains_key(&key) || self.cached(&key).is_some() {
                continue;
            }
            let equation = self.equation(&key)?;
            tracing::trace!("{} depends on {:?}", key, equation.deps);
            stack.extend(equation.deps.iter().cloned());
            equations.insert(key, equation);
        }

        let mut values: Vec<TerminalSet> = equations.values().map(|eq| eq.base.clone()).collect();
        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for (index, equation) in equations.values().enumerate() {
                let mut value = mem::take(&mut values[index]);
                for dep in &equation.deps {
                    let added = match equations.get_index_of(dep) {
                        Some(j) => Some(&values[j]),
                        None => self.cached(dep),
                    };
                    for terminal in added.into_iter().flatten() {
                        changed |= value.insert(terminal.clone());
                    }
                }
                values[index] = value;
            }
        }
        tracing::debug!("solved {} sets in {} passes", equations.len(), passes);

        for (key, value) in equations.into_keys().zip(values) {
            tracing::trace!("{} = {:?}", key, value);
            match key {
                SetKey::First(s) => self.first_sets.insert(s, value),
                SetKey::Follow(s) => self.follow_sets.insert(s, value),
            };
        }

        Ok(())
    }

    fn equation(&self, key: &SetKey) -> Result<Equation, GrammarError> {
        let mut equation = Equation::default();
        match key {
            SetKey::First(Symbol::T(t)) => {
                equation.base.insert(t.clone());
            }

            SetKey::First(Symbol::Epsilon) => {
                return Err(GrammarError::malformed(
                    "epsilon cannot be the target of a FIRST set; \
                     are there two epsilon tokens in sequence in a production?",
                ));
            }

            SetKey::First(Symbol::N(name)) => {
                for rule in self.grammar.rules_of(name)? {
                    match rule.right() {
                        [Symbol::Epsilon] => {
                            tracing::trace!("`{}' may vanish, consulting its FOLLOW set", rule);
                            equation.deps.push(SetKey::Follow(Symbol::N(name.clone())));
                        }
                        // `X -> ε Y ...` is read as `X -> Y ...`.
                        [Symbol::Epsilon, second, ..] => {
                            self.push_first(&mut equation, second, rule)?;
                        }
                        [first, ..] => {
                            self.push_first(&mut equation, first, rule)?;
                        }
                        [] => unreachable!("rules are never empty"),
                    }
                }
            }

            SetKey::Follow(symbol) => {
                for rule in self.grammar.rules() {
                    let right = rule.right();
                    for (i, _) in right.iter().enumerate().filter(|(_, s)| *s == symbol) {
                        match right.get(i + 1) {
                            Some(next) => self.push_first(&mut equation, next, rule)?,
                            None => equation
                                .deps
                                .push(SetKey::Follow(Symbol::N(rule.left().to_owned()))),
                        }
                    }
                }
            }
        }
        Ok(equation)
    }

    /// Add `First(symbol)`, which is referenced from `rule`, to the equation.
    fn push_first(
        &self,
        equation: &mut Equation,
        symbol: &Symbol,
        rule: &Rule,
    ) -> Result<(), GrammarError> {
        match symbol {
            Symbol::Epsilon => {
                return Err(GrammarError::malformed(format!(
                    "epsilon is followed by another epsilon in `{}'",
                    rule
                )));
            }
            Symbol::N(name) if !self.grammar.contains_class(name) => {
                return Err(GrammarError::UnknownSymbol {
                    name: name.clone(),
                    context: format!("referenced in `{}'", rule),
                });
            }
            _ => (),
        }
        equation.deps.push(SetKey::First(symbol.clone()));
        Ok(())
    }
}

/// The finalized FIRST and FOLLOW sets of a grammar.
///
/// Lookups never compute anything: a symbol without an entry has an empty set.
#[derive(Debug, Clone, Default)]
pub struct SetTables {
    first_sets: Map<Symbol, TerminalSet>,
    follow_sets: Map<Symbol, TerminalSet>,
    empty: TerminalSet,
}

impl SetTables {
    /// Compute the FIRST and FOLLOW sets of every symbol in the grammar.
    pub fn analyze(grammar: &Grammar) -> Result<Self, GrammarError> {
        let vocabulary = grammar.vocabulary();
        let mut sets = FirstFollow::new(grammar);
        sets.compute_first_sets()?;
        for symbol in vocabulary.iter().filter(|s| s.is_terminal()) {
            sets.first(symbol)?;
        }
        sets.compute_follow_sets(&vocabulary)?;
        Ok(sets.into_tables())
    }

    pub fn first(&self, symbol: &Symbol) -> &TerminalSet {
        self.first_sets.get(symbol).unwrap_or(&self.empty)
    }

    pub fn follow(&self, symbol: &Symbol) -> &TerminalSet {
        self.follow_sets.get(symbol).unwrap_or(&self.empty)
    }

    pub fn first_sets(&self) -> impl Iterator<Item = (&Symbol, &TerminalSet)> + '_ {
        self.first_sets.iter()
    }

    pub fn follow_sets(&self) -> impl Iterator<Item = (&Symbol, &TerminalSet)> + '_ {
        self.follow_sets.iter()
    }
}

impl fmt::Display for SetTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## FIRST sets:")?;
        for (symbol, set) in self.first_sets.iter().filter(|(s, _)| s.is_nonterminal()) {
            write!(f, "FIRST({}) = {{ ", symbol)?;
            write_joined(f, set, ", ")?;
            writeln!(f, " }}")?;
        }

        writeln!(f, "\n## FOLLOW sets:")?;
        for (symbol, set) in &self.follow_sets {
            write!(f, "FOLLOW({}) = {{ ", symbol)?;
            write_joined(f, set, ", ")?;
            writeln!(f, " }}")?;
        }

        Ok(())
    }
}
