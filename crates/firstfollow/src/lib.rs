//! Calculation of FIRST and FOLLOW sets for context-free grammars.

pub mod grammar;
pub mod sets;
pub mod symbol;
pub mod syntax;
pub mod types;
pub mod util;

pub use crate::{
    grammar::{Grammar, GrammarDef, GrammarError},
    sets::{FirstFollow, SetTables, TerminalSet},
    symbol::Symbol,
};
