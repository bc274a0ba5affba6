mod query;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use getarg::ArgStore;
use tracing_subscriber::{EnvFilter, fmt};

use crate::query::{Query, check_ints, evaluate};

#[derive(Parser)]
#[command(name = "getarg")]
#[command(version, about = "Inspect how dash-style flags resolve", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every parsed flag as JSON
    Dump(DumpArgs),

    /// Evaluate typed lookups against the arguments
    Get(GetArgs),

    /// Strictly validate integer flags
    Check(CheckArgs),
}

#[derive(Parser)]
struct DumpArgs {
    /// Arguments to parse (after `--`)
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct GetArgs {
    /// Boolean lookup, default false
    #[arg(long = "bool", value_name = "NAME[=DEFAULT]", allow_hyphen_values = true)]
    bools: Vec<String>,

    /// String lookup, default empty
    #[arg(long = "string", value_name = "NAME[=DEFAULT]", allow_hyphen_values = true)]
    strings: Vec<String>,

    /// Integer lookup, default 0
    #[arg(long = "int", value_name = "NAME[=DEFAULT]", allow_hyphen_values = true)]
    ints: Vec<String>,

    /// Arguments to parse (after `--`)
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Integer flag that must be absent or a valid base-10 integer
    #[arg(long = "int", value_name = "NAME", required = true, allow_hyphen_values = true)]
    ints: Vec<String>,

    /// Arguments to parse (after `--`)
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Dump(args) => dump(args),
        Commands::Get(args) => get(args),
        Commands::Check(args) => check(args),
    }
}

fn dump(args: DumpArgs) -> Result<()> {
    tracing::debug!("executing dump command");

    let store = ArgStore::build(&args.args);
    println!("{}", serde_json::to_string_pretty(&store)?);
    Ok(())
}

fn get(args: GetArgs) -> Result<()> {
    tracing::debug!("executing get command");

    if args.bools.is_empty() && args.strings.is_empty() && args.ints.is_empty() {
        bail!("nothing to look up; pass at least one of --bool, --string or --int");
    }

    let bools = parse_all(&args.bools, query::parse_bool)?;
    let strings = parse_all(&args.strings, query::parse_string)?;
    let ints = parse_all(&args.ints, query::parse_int)?;

    let store = ArgStore::build(&args.args);
    let report = evaluate(&store, &bools, &strings, &ints);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let store = ArgStore::build(&args.args);
    let values = check_ints(&store, &args.ints).context("integer check failed")?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn parse_all<T>(raw: &[String], parse: fn(&str) -> Result<Query<T>>) -> Result<Vec<Query<T>>> {
    raw.iter().map(|s| parse(s)).collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
