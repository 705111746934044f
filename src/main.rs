use clap::{Parser as ClapParser, Subcommand};
use filter_lang::{
    ParserOptions,
    cli::{self, CheckOptions, CheckResult, CliError, ParseOptions},
};
use std::io::{self, Read};

const ENV_LOG: &str = "FQL_LOG";

#[derive(ClapParser)]
#[command(name = "fql")]
#[command(about = "fql - parse, check and document filter query language expressions")]
#[command(version)]
struct Cli {
    /// Deepest allowed nesting of parentheses and negations
    #[arg(long, global = true, env = "FQL_MAX_DEPTH", default_value_t = 64)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a filter and print its canonical form
    Parse {
        /// The filter to parse
        filter: String,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Print operator names (EQ, NOT_IN, ...) instead of symbols
        #[arg(long)]
        names: bool,
    },

    /// Apply a filter to JSON records
    Check {
        /// The filter to apply
        filter: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,

        /// Case-insensitive CONTAINS / STARTS WITH / ENDS WITH
        #[arg(long)]
        ignore_case: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'fql docs' to list categories)
        category: String,
    },
}

fn init_logging() {
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let parser = ParserOptions::default().max_depth(cli.max_depth);

    let result = match cli.command {
        Commands::Parse {
            filter,
            json,
            pretty,
            names,
        } => cli::execute_parse(&ParseOptions {
            filter,
            json,
            pretty,
            names,
            parser,
        })
        .map(|text| println!("{}", text)),
        Commands::Check {
            filter,
            input,
            pretty,
            syntax_only,
            ignore_case,
        } => run_check(
            CheckOptions {
                filter,
                input,
                syntax_only,
                ignore_case,
                parser,
            },
            pretty,
        ),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => {
            cli::get_doc_category(&category).map(|content| print!("{}", content))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(mut options: CheckOptions, pretty: bool) -> Result<(), CliError> {
    if options.input.is_none() && !options.syntax_only && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid(canonical) => println!("Syntax is valid: {}", canonical),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}
