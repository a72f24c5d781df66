use std::collections::HashMap;

use cas::{Cas, DEFAULT_MAX_DEPTH, DEFAULT_MAX_HEIGHT, Error, Limits};
use clap::Parser;
use clap::Subcommand;
use miette::miette;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Evaluate, differentiate and simplify arithmetic expressions")]
struct Args {
    /// Deepest parenthesis nesting accepted by the parser
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Tallest expression tree accepted by the parser
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_HEIGHT)]
    max_height: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the tokens of an expression, one per line
    Tokenize { expression: String },
    /// Print the fully parenthesized parse tree
    Parse { expression: String },
    /// Evaluate an expression
    Eval {
        expression: String,
        /// Variable value, as NAME=VALUE
        #[arg(long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
    },
    /// Print the simplified derivative with respect to a variable
    Diff { expression: String, var: String },
    /// Print the simplified expression
    Simplify { expression: String },
}

fn parse_binding(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for `{name}`: {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let limits = Limits {
        max_depth: args.max_depth,
        max_height: args.max_height,
    };

    match args.command {
        Commands::Tokenize { expression } => {
            let tokens = match cas::tokenize(&expression) {
                Ok(tokens) => tokens,
                Err(e) => exit_with(e.into()),
            };
            for token in tokens {
                println!("{token}");
            }
        }
        Commands::Parse { expression } => {
            let cas = build(&expression, limits);
            println!("{}", cas.tree());
        }
        Commands::Eval { expression, vars } => {
            let cas = build(&expression, limits);
            let bindings: HashMap<String, f64> = vars.into_iter().collect();
            match cas.evaluate(&bindings) {
                Ok(value) => println!("{value}"),
                Err(e) => exit_with(e),
            }
        }
        Commands::Diff { expression, var } => {
            if var.is_empty() || !var.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(miette!(
                    help = "variable names are made of ASCII letters only",
                    "invalid variable name `{var}`"
                ));
            }
            let cas = build(&expression, limits);
            println!("{}", cas.differentiate(&var));
        }
        Commands::Simplify { expression } => {
            let cas = build(&expression, limits);
            println!("{}", cas.simplify());
        }
    }

    Ok(())
}

fn build(expression: &str, limits: Limits) -> Cas {
    match Cas::with_limits(expression, limits) {
        Ok(cas) => cas,
        Err(e) => exit_with(e),
    }
}

/// Reports the error and exits: 65 for malformed input, 70 when evaluation
/// fails.
fn exit_with(e: Error) -> ! {
    let code = match e {
        Error::Lex(_) | Error::Parse(_) => 65,
        Error::Eval(_) => 70,
    };
    eprintln!("{:?}", miette::Report::new(e));
    std::process::exit(code);
}
