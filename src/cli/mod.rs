//! CLI module for the MPP front-end
//!
//! This module provides the command-line interface over the tokenizer, classifier, and parser.
//!
//! ## Commands
//!
//! - `mpp <file>` - Parse and print the AST as S-expressions
//! - `check <file>` - Report every syntax error with source context
//! - `dump <file> [--json]` - Dump the AST as S-expressions or JSON
//! - `fmt <file|dir>` - Format MPP source files
//!
//! Debug flags `--lex`, `--lexemes`, and `--parse` print each pipeline stage.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::version::MPP_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Exit code for `mpp <file>` with no readable input.
const USAGE_EXIT_CODE: i32 = 2;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Streaming front-end for the MPP language
#[derive(Parser, Debug)]
#[command(name = "mpp")]
#[command(version = MPP_VERSION)]
#[command(about = "Tokenize, classify, and parse MPP source", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to parse (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with = "file")]
    pub lex_file: Option<PathBuf>,

    /// Tokenize and classify (debug)
    #[arg(long = "lexemes", value_name = "FILE", conflicts_with = "file")]
    pub lexemes_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "file")]
    pub parse_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report every syntax error in a file
    Check {
        /// Source file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Dump the AST
    Dump {
        /// Source file to dump
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Emit JSON instead of S-expressions
        #[arg(long)]
        json: bool,
    },

    /// Format MPP source files
    Fmt {
        /// File or directory to format
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
        /// Show diff of formatting changes
        #[arg(long)]
        diff: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.lexemes_file {
        return commands::lexemes_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file.to_string_lossy());
    }

    match cli.command {
        Some(Command::Check { file }) => commands::check_file(&file.to_string_lossy()),
        Some(Command::Dump { file, json }) => commands::dump_file(&file.to_string_lossy(), json),
        Some(Command::Fmt { path, check, diff }) => commands::format_files(&path.to_string_lossy(), check, diff),
        None => {
            // Default: parse the file if provided
            if let Some(file) = cli.file {
                commands::parse_file(&file.to_string_lossy())
            } else {
                Err(CliError::with_code(
                    "Usage: mpp <FILE> (see --help for subcommands)",
                    USAGE_EXIT_CODE,
                ))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default_file() {
        let cli = Cli::try_parse_from(["mpp", "script.mpp"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("script.mpp")));
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["mpp", "check", "script.mpp"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Check { .. })));
    }

    #[test]
    fn test_cli_parse_dump_json() {
        let cli = Cli::try_parse_from(["mpp", "dump", "script.mpp", "--json"]).unwrap();
        if let Some(Command::Dump { json, .. }) = cli.command {
            assert!(json);
        } else {
            panic!("Expected Dump command");
        }
    }

    #[test]
    fn test_cli_parse_fmt() {
        let cli = Cli::try_parse_from(["mpp", "fmt", "src/", "--check"]).unwrap();
        if let Some(Command::Fmt { check, diff, .. }) = cli.command {
            assert!(check);
            assert!(!diff);
        } else {
            panic!("Expected Fmt command");
        }
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["mpp", "--lex", "script.mpp"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["mpp", "--lexemes", "script.mpp"]).unwrap();
        assert!(cli.lexemes_file.is_some());

        let cli = Cli::try_parse_from(["mpp", "--parse", "script.mpp"]).unwrap();
        assert!(cli.parse_file.is_some());
    }

    #[test]
    fn test_cli_debug_flag_conflicts_with_file() {
        assert!(Cli::try_parse_from(["mpp", "a.mpp", "--lex", "b.mpp"]).is_err());
    }

    #[test]
    fn test_execute_without_input_is_usage_error() {
        let cli = Cli::try_parse_from(["mpp"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode(USAGE_EXIT_CODE));
    }
}
