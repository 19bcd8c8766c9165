use anyhow::Context as _;
use clap::Parser;
use firstfollow::{FirstFollow, Grammar, SetTables, Symbol};
use std::{path::PathBuf, time::Instant};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print the FIRST set of the specified token, e.g. `$$$Expr$$$`.
    #[arg(long = "first", value_name = "TOKEN")]
    first: Vec<String>,

    /// Print the FOLLOW set of the specified token.
    #[arg(long = "follow", value_name = "TOKEN")]
    follow: Vec<String>,

    /// Print the grammar as it was read before the sets.
    #[arg(long)]
    echo: bool,

    /// The path of grammar definition file.
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    tracing::debug!("parsed CLI args = {:?}", args);

    process_file(&args)
        .with_context(|| anyhow::anyhow!("errored during processing {}", args.input.display()))?;

    Ok(())
}

fn process_file(args: &Args) -> anyhow::Result<()> {
    let s = Instant::now();
    let grammar = Grammar::from_file(&args.input).context("failed to load the grammar")?;
    tracing::info!("load grammar: {:?} elapsed", s.elapsed());

    if args.echo {
        println!("{}", grammar);
    }

    let s = Instant::now();
    if args.first.is_empty() && args.follow.is_empty() {
        let tables = SetTables::analyze(&grammar)?;
        print!("{}", tables);
    } else {
        let mut sets = FirstFollow::new(&grammar);
        for token in &args.first {
            let symbol = Symbol::from_token(token);
            let set = sets
                .first(&symbol)
                .with_context(|| anyhow::anyhow!("failed to compute FIRST({})", symbol))?;
            println!("FIRST({}) = {:?}", symbol, set);
        }
        for token in &args.follow {
            let symbol = Symbol::from_token(token);
            let set = sets
                .follow(&symbol)
                .with_context(|| anyhow::anyhow!("failed to compute FOLLOW({})", symbol))?;
            println!("FOLLOW({}) = {:?}", symbol, set);
        }
    }
    tracing::info!("compute sets: {:?} elapsed", s.elapsed());

    Ok(())
}
