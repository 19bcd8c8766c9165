//! Symbol types and their textual encoding.
//!
//! A grammar token is decoded as follows:
//!
//! * `###` is the epsilon sentinel,
//! * `$$$Name$$$` is a reference to the nonterminal `Name`,
//! * anything else is a terminal.

use std::fmt;

/// The marker wrapped around both sides of a nonterminal name.
pub const NONTERMINAL_MARKER: &str = "$$$";

/// The reserved literal that denotes the empty sequence.
pub const EPSILON: &str = "###";

/// Return whether the token is a wrapped nonterminal reference.
pub fn is_nonterminal(token: &str) -> bool {
    unwrap_nonterminal(token).is_some()
}

/// Return whether the token is the epsilon sentinel.
pub fn is_epsilon(token: &str) -> bool {
    token == EPSILON
}

/// Wrap a bare name into the nonterminal token form.
pub fn make_nonterminal(name: &str) -> String {
    format!("{0}{1}{0}", NONTERMINAL_MARKER, name)
}

fn unwrap_nonterminal(token: &str) -> Option<&str> {
    let name = token
        .strip_prefix(NONTERMINAL_MARKER)?
        .strip_suffix(NONTERMINAL_MARKER)?;
    // `$$$$$$` wraps nothing.
    (!name.is_empty()).then_some(name)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// An atomic input token.
    T(String),
    /// A reference to a nonterminal, by its bare name.
    N(String),
    /// The empty sequence.
    Epsilon,
}

impl Symbol {
    /// Decode a grammar token.
    pub fn from_token(token: &str) -> Self {
        if is_epsilon(token) {
            Self::Epsilon
        } else if let Some(name) = unwrap_nonterminal(token) {
            Self::N(name.to_owned())
        } else {
            Self::T(token.to_owned())
        }
    }

    pub fn terminal(name: impl Into<String>) -> Self {
        Self::T(name.into())
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Self::N(name.into())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::T(..))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Self::N(..))
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Self::Epsilon)
    }

    /// Return the terminal text or the bare nonterminal name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::T(name) | Self::N(name) => Some(name),
            Self::Epsilon => None,
        }
    }
}

/// Formats the symbol in its token form, so that `from_token` reads it back.
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::T(t) => f.write_str(t),
            Self::N(n) => write!(f, "{0}{1}{0}", NONTERMINAL_MARKER, n),
            Self::Epsilon => f.write_str(EPSILON),
        }
    }
}

impl From<&str> for Symbol {
    fn from(token: &str) -> Self {
        Self::from_token(token)
    }
}
