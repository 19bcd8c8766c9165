use firstfollow::{FirstFollow, Grammar, SetTables};
use std::{env, path::PathBuf};

macro_rules! define_tests {
    ($($name:ident),*$(,)?) => {$(
        #[test]
        fn $name() {
            let grammar = Grammar::from_file(
                &PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap())
                    .join(concat!("tests/grammars/", stringify!($name), ".grammar"))
            ).unwrap();
            let tables = SetTables::analyze(&grammar).unwrap();
            eprintln!("grammar:\n{}\n{}", grammar, tables);

            // every FOLLOW set computed on demand agrees with the tables.
            let mut sets = FirstFollow::new(&grammar);
            for symbol in &grammar.vocabulary() {
                assert_eq!(sets.first(symbol).unwrap(), tables.first(symbol));
                assert_eq!(sets.follow(symbol).unwrap(), tables.follow(symbol));
            }
        }
    )*};
}

define_tests! {
    hello_world,
    arithmetic,
    json,
    cyclic_epsilon,
    leading_epsilon,
}
