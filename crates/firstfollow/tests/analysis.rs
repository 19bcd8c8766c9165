use firstfollow::{FirstFollow, Grammar, GrammarError, SetTables, Symbol, TerminalSet};
use std::{env, path::PathBuf};

fn load(name: &str) -> Grammar {
    let path = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap())
        .join(format!("tests/grammars/{}.grammar", name));
    Grammar::from_file(path).unwrap()
}

fn set<const N: usize>(terminals: [&str; N]) -> TerminalSet {
    terminals.into_iter().map(str::to_owned).collect()
}

fn n(name: &str) -> Symbol {
    Symbol::nonterminal(name)
}

#[test]
fn arithmetic() {
    let grammar = load("arithmetic");
    let tables = SetTables::analyze(&grammar).unwrap();

    assert_eq!(*tables.first(&n("Expr")), set(["(", "num", "ident"]));
    assert_eq!(*tables.first(&n("Factor")), set(["(", "num", "ident"]));
    assert_eq!(*tables.follow(&n("Expr")), set([")"]));
    assert_eq!(*tables.follow(&n("ExprTail")), set([")"]));
    // a vanishing nonterminal starts with whatever follows it.
    assert_eq!(*tables.first(&n("ExprTail")), set(["+", "-", ")"]));
    assert_eq!(*tables.follow(&n("Term")), set(["+", "-", ")"]));
    assert_eq!(*tables.first(&n("TermTail")), set(["*", "/", "+", "-", ")"]));
    assert_eq!(*tables.follow(&n("Factor")), set(["*", "/", "+", "-", ")"]));
    assert_eq!(*tables.first(&Symbol::terminal("num")), set(["num"]));
}

#[test]
fn json() {
    let grammar = load("json");
    let mut sets = FirstFollow::new(&grammar);

    assert_eq!(
        *sets.first(&n("Value")).unwrap(),
        set(["{", "[", "string", "number", "true", "false", "null"])
    );
    assert_eq!(*sets.first(&n("Members")).unwrap(), set(["string", "}"]));
    assert_eq!(*sets.follow(&n("Member")).unwrap(), set([",", "}"]));
    assert_eq!(*sets.follow(&n("Value")).unwrap(), set([",", "}", "]"]));
    assert_eq!(*sets.follow(&Symbol::terminal("string")).unwrap(), set([":", ",", "}", "]"]));
}

#[test]
fn cyclic_epsilon_terminates() {
    let grammar = load("cyclic_epsilon");
    let mut sets = FirstFollow::new(&grammar);

    assert_eq!(*sets.follow(&n("A")).unwrap(), set(["x", "y"]));
    assert_eq!(*sets.first(&n("A")).unwrap(), set(["x", "y"]));
    assert_eq!(*sets.first(&n("S")).unwrap(), set(["x", "y"]));
    assert!(sets.follow(&n("S")).unwrap().is_empty());
}

#[test]
fn leading_epsilon() {
    let grammar = load("leading_epsilon");
    let mut sets = FirstFollow::new(&grammar);

    assert_eq!(*sets.first(&n("S")).unwrap(), set(["t", "start"]));
    assert_eq!(*sets.follow(&n("T")).unwrap(), set(["end"]));
    assert_eq!(*sets.follow(&Symbol::terminal("t")).unwrap(), set(["end"]));
}

#[test]
fn tracing_does_not_affect_results() {
    let grammar = load("arithmetic");
    let quiet = SetTables::analyze(&grammar).unwrap();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    let traced = tracing::subscriber::with_default(subscriber, || SetTables::analyze(&grammar))
        .unwrap();

    for symbol in &grammar.vocabulary() {
        assert_eq!(quiet.first(symbol), traced.first(symbol));
        assert_eq!(quiet.follow(symbol), traced.follow(symbol));
    }
    assert_eq!(quiet.to_string(), traced.to_string());
}

#[test]
fn unknown_reference_from_text() {
    let grammar: Grammar = "S -> $$$Missing$$$ ||| x".parse().unwrap();
    assert!(matches!(
        SetTables::analyze(&grammar),
        Err(GrammarError::UnknownSymbol { ref name, .. }) if name == "Missing"
    ));
}

#[test]
fn missing_file() {
    assert!(matches!(
        Grammar::from_file("tests/grammars/does_not_exist.grammar"),
        Err(GrammarError::IO(..))
    ));
}
