//! `tomlet` CLI — parse, validate, and format TOML files.
//!
//! ## Usage
//!
//! ```sh
//! # Parse and summarize the root keys
//! tomlet parse config.toml
//!
//! # Syntax-check with a quiet success
//! tomlet validate -q config.toml
//!
//! # Reformat to stdout with sorted keys
//! tomlet fmt --sort-keys config.toml
//!
//! # Reformat in place with 4-column indentation
//! tomlet fmt -i --indent 4 config.toml
//! ```
//!
//! Exit codes: 0 on success, 1 when the input fails to parse or validate,
//! 2 on I/O failures.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tomlet::FormatOptions;

#[derive(Parser)]
#[command(name = "tomlet", version, about = "TOML parser, validator, and formatter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print a summary of its root keys
    Parse {
        /// The TOML file to read
        file: String,
        /// Also print the value of each root key
        #[arg(short, long)]
        verbose: bool,
    },
    /// Check that a file is well-formed TOML
    Validate {
        /// The TOML file to read
        file: String,
        /// Print nothing on success
        #[arg(short, long)]
        quiet: bool,
    },
    /// Parse and re-serialize a file
    Fmt {
        /// The TOML file to read
        file: String,
        /// Overwrite the file instead of writing to stdout
        #[arg(short = 'i', long)]
        in_place: bool,
        /// Emit each table's keys in sorted order
        #[arg(short = 's', long)]
        sort_keys: bool,
        /// Columns per nesting level
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Runs a subcommand. `Ok` carries the process exit code for parse and
/// validation outcomes; `Err` means an I/O failure.
fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Parse { file, verbose } => {
            let source = read(&file)?;
            let root = match tomlet::parse_with_context(&source) {
                Ok(root) => root,
                Err(context) => {
                    eprintln!("{file}: {context}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            println!("{file}: {} root key(s)", root.len());
            for (key, value) in &root {
                if verbose {
                    println!("  {key}: {} = {value:?}", value.type_str());
                } else {
                    println!("  {key}: {}", value.type_str());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { file, quiet } => {
            let source = read(&file)?;
            match tomlet::parse_with_context(&source) {
                Ok(_) => {
                    if !quiet {
                        println!("{file}: valid TOML");
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(context) => {
                    eprintln!("{file}: {context}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Fmt {
            file,
            in_place,
            sort_keys,
            indent,
        } => {
            let source = read(&file)?;
            let root = match tomlet::parse_with_context(&source) {
                Ok(root) => root,
                Err(context) => {
                    eprintln!("{file}: {context}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            let options = FormatOptions::new()
                .with_sorted_keys(sort_keys)
                .with_indent(indent);
            let text = tomlet::stringify_with_options(&root, &options);
            if in_place {
                std::fs::write(&file, text)
                    .with_context(|| format!("failed to write {file}"))?;
            } else {
                print!("{text}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}
