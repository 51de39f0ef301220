use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use postfix_computer as rpn;

use rpn::evaluator::Evaluator;
use rpn::scanner::{tokenize, Scanner};
use rpn::sink::WriterSink;
use rpn::symbol_table::DEFAULT_CAPACITY;
use rpn::token::Token;

#[derive(ClapParser, Debug)]
#[command(version, about = "Postfix expression computer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to postfix.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Splits input from a file into tokens, printing each with its kind
    Tokenize { filename: Option<PathBuf> },

    /// Evaluates a postfix program from a file
    Run {
        filename: Option<PathBuf>,

        /// Tokens dispatched per batch
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        batch: u64,

        /// Initial symbol table capacity
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,

        /// Report failing tokens and continue with the next one
        #[arg(long)]
        keep_going: bool,

        /// Print the final stack and symbol table as JSON
        #[arg(long)]
        dump_state: bool,
    },
}

/// Reads the contents of a file into a Vec<u8>
fn read_file(filename: PathBuf) -> Result<Vec<u8>> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("postfix.log").context("Failed to create postfix.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'postfix_computer::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("postfix_computer::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "{} [{}:{}] - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to postfix.log");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => match filename {
            Some(filename) => {
                info!("Running Tokenize subcommand");
                let buf = read_file(filename)?;
                let mut tokenized = true;

                for token in Scanner::new(&buf) {
                    match token.and_then(|t| t.kind().map(|_| t)) {
                        Ok(token) => println!("{}", token),

                        Err(e) => {
                            tokenized = false;
                            debug!("Tokenization debug: {}", e);
                            eprintln!("{}", e);
                        }
                    }
                }

                if !tokenized {
                    debug!("Tokenization failed, exiting with code 65");
                    std::process::exit(65);
                }

                info!("Tokenization completed successfully");
            }
            None => {
                info!("No filepath provided for Tokenize");
                println!("No input filepath was provided. Exiting...");
                std::process::exit(0);
            }
        },

        Commands::Run {
            filename,
            batch,
            capacity,
            keep_going,
            dump_state,
        } => match filename {
            Some(filename) => {
                info!("Running Run subcommand");
                let buf = read_file(filename)?;

                let tokens: Vec<Token<'_>> = match tokenize(&buf) {
                    Ok(tokens) => tokens,
                    Err(e) => {
                        debug!("Scan debug: {}", e);
                        eprintln!("{}", e);
                        std::process::exit(65);
                    }
                };

                info!(
                    "Program: {}",
                    tokens.iter().map(|t| t.lexeme).collect::<Vec<_>>().join(" ")
                );

                let batch = usize::try_from(batch).unwrap_or(usize::MAX);
                let mut evaluator = Evaluator::with_capacity(WriterSink::new(io::stdout()), capacity);
                let mut cursor: Option<&[Token<'_>]> = Some(tokens.as_slice());
                let mut exit_code: Option<i32> = None;

                while let Some(rest) = cursor {
                    match evaluator.process(rest, batch) {
                        Ok(next) => cursor = next,

                        Err(e) => {
                            debug!("Runtime debug: {}", e);
                            eprintln!("{}", e);

                            let code = if e.is_input_error() { 65 } else { 70 };

                            if !keep_going {
                                std::process::exit(code);
                            }

                            exit_code = Some(code);
                            cursor = e
                                .position()
                                .and_then(|p| tokens.get(p + 1..))
                                .filter(|rest| !rest.is_empty());
                        }
                    }
                }

                if dump_state {
                    let snapshot = evaluator.context().snapshot();
                    let json = serde_json::to_string_pretty(&snapshot)
                        .context("Failed to serialize final state")?;
                    println!("{}", json);
                }

                if let Some(code) = exit_code {
                    std::process::exit(code);
                }

                info!("Program executed successfully");
            }

            None => {
                info!("No filepath provided for Run");
                println!("No input filepath was provided. Exiting...");
                std::process::exit(0);
            }
        },
    }

    Ok(())
}
