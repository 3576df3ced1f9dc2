//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use mpp_syntax::ast::find_error_nodes;
use mpp_syntax::{classify, lexer, parser};

use crate::dump;
use crate::format::{format_diff, format_source};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected before any reading starts.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Source file extension picked up by `fmt` when walking directories.
const SOURCE_EXTENSION: &str = "mpp";

// ============================================================================
// Source reading
// ============================================================================

/// Check that `file_path` exists and is within `MAX_SOURCE_SIZE`.
fn check_size(file_path: &str) -> CliResult<()> {
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }
    Ok(())
}

/// Read a whole source file.
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    check_size(file_path)?;
    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Source file read lazily one line at a time, for feeding the tokenizer as chunks.
///
/// A read failure ends the stream early; it is kept in `error` for the caller to report once the
/// pipeline has drained.
pub struct SourceLines<R> {
    reader: R,
    error: Option<io::Error>,
}

impl<R: BufRead> SourceLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, error: None }
    }

    /// The read error that ended the stream, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: BufRead> Iterator for SourceLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                tracing::warn!(error = %e, "source read failed; ending stream");
                self.error = Some(e);
                None
            }
        }
    }
}

/// Open `file_path` as a line stream.
pub fn open_lines(file_path: &str) -> CliResult<SourceLines<BufReader<File>>> {
    check_size(file_path)?;
    let file = File::open(file_path).map_err(|e| CliError::failure(format!("Error opening file '{}': {}", file_path, e)))?;
    Ok(SourceLines::new(BufReader::new(file)))
}

/// Turn a read error left behind by a drained stream into a CLI failure.
fn finish_stream<R>(lines: &mut SourceLines<R>, file_path: &str) -> CliResult<ExitCode> {
    match lines.error.take() {
        Some(e) => Err(CliError::failure(format!("Error reading file '{}': {}", file_path, e))),
        None => Ok(ExitCode::SUCCESS),
    }
}

// ============================================================================
// Pipeline commands
// ============================================================================

/// Tokenize and display tokens.
#[tracing::instrument(skip_all, fields(file = file_path))]
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let mut lines = open_lines(file_path)?;
    for token in lexer::tokenize(&mut lines) {
        println!("{}", token);
    }
    finish_stream(&mut lines, file_path)
}

/// Tokenize, classify, and display lexemes.
#[tracing::instrument(skip_all, fields(file = file_path))]
pub fn lexemes_file(file_path: &str) -> CliResult<ExitCode> {
    let mut lines = open_lines(file_path)?;
    for lexeme in classify::classify(lexer::tokenize(&mut lines)) {
        println!("{}", lexeme);
    }
    finish_stream(&mut lines, file_path)
}

/// Parse and display the AST as S-expressions, one top-level statement per line as it is parsed.
#[tracing::instrument(skip_all, fields(file = file_path))]
pub fn parse_file(file_path: &str) -> CliResult<ExitCode> {
    let mut lines = open_lines(file_path)?;
    for node in parser::parse_chunks(&mut lines) {
        println!("{}", node);
    }
    finish_stream(&mut lines, file_path)
}

/// Report every syntax error in a file.
#[tracing::instrument(skip_all, fields(file = file_path))]
pub fn check_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let program = parser::parse_source(&source);
    let errors = find_error_nodes(&program);

    if errors.is_empty() {
        println!("✓ No syntax errors");
        return Ok(ExitCode::SUCCESS);
    }

    for error in &errors {
        let report = miette::Report::new(error.to_diagnostic(file_path, &source));
        eprintln!("{:?}", report);
    }
    Err(CliError::failure(format!("{} syntax error(s) in {}", errors.len(), file_path)))
}

/// Dump the AST as S-expressions or JSON.
#[tracing::instrument(skip_all, fields(file = file_path, json))]
pub fn dump_file(file_path: &str, json: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let program = parser::parse_source(&source);
    if json {
        println!("{}", dump::to_json_string(&program));
    } else {
        print!("{}", dump::to_sexp(&program));
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Formatting
// ============================================================================

/// Format MPP source files.
pub fn format_files(path: &str, check_mode: bool, diff_mode: bool) -> CliResult<ExitCode> {
    let path = Path::new(path);
    let files = collect_source_files(path);

    if files.is_empty() {
        return Err(CliError::failure(format!("No .{} files found", SOURCE_EXTENSION)));
    }

    let mut needs_formatting = false;
    let mut formatted_count = 0;
    let mut error_count = 0;

    for file_path in &files {
        let source = match read_source(&file_path.to_string_lossy()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", e);
                error_count += 1;
                continue;
            }
        };

        match format_source(&source) {
            Ok(formatted) => {
                let changed = source != formatted;

                if diff_mode && changed {
                    println!("--- {}", file_path.display());
                    if let Ok(Some(diff)) = format_diff(&source) {
                        print!("{}", diff);
                    }
                    println!();
                }

                if check_mode {
                    if changed {
                        println!("Would reformat: {}", file_path.display());
                        needs_formatting = true;
                    }
                } else if diff_mode {
                    if changed {
                        needs_formatting = true;
                    }
                } else if changed {
                    if let Err(e) = fs::write(file_path, &formatted) {
                        eprintln!("Error writing {}: {}", file_path.display(), e);
                        error_count += 1;
                    } else {
                        println!("Formatted: {}", file_path.display());
                        formatted_count += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("Error formatting {}: {}", file_path.display(), e);
                error_count += 1;
            }
        }
    }

    if check_mode || diff_mode {
        if needs_formatting {
            let msg = if diff_mode { "need formatting" } else { "would be reformatted" };
            return Err(CliError::failure(format!("\n{} file(s) {}", files.len(), msg)));
        }
        println!("✓ {} file(s) already formatted", files.len());
    } else {
        println!("\n✓ {} file(s) formatted, {} error(s)", formatted_count, error_count);
    }

    if error_count > 0 {
        return Err(CliError::new("", ExitCode::FAILURE));
    }

    Ok(ExitCode::SUCCESS)
}

fn collect_source_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.flatten() {
                let entry_path = entry.path();
                if entry_path.is_dir() {
                    let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    if !name.starts_with('.') && name != "target" {
                        files.extend(collect_source_files(&entry_path));
                    }
                } else if entry_path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
                    files.push(entry_path);
                }
            }
        }
    }

    files.sort();
    files
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_source_lines_yields_lines_with_newlines() {
        let lines: Vec<String> = SourceLines::new(Cursor::new("a;\nb;\nc;")).collect();
        assert_eq!(lines, vec!["a;\n", "b;\n", "c;"]);
    }

    #[test]
    fn test_source_lines_feed_the_parser() {
        let mut lines = SourceLines::new(Cursor::new("my $x = {\n  a => 1,\n};\nprint $x;\n"));
        let program: Vec<_> = parser::parse_chunks(&mut lines).collect();
        assert_eq!(program.len(), 2);
        assert!(lines.take_error().is_none());
    }

    #[test]
    fn test_source_lines_stop_on_invalid_utf8() {
        let bytes: &[u8] = b"ok;\n\xff\xfe;\n";
        let mut lines = SourceLines::new(Cursor::new(bytes));
        assert_eq!(lines.next().as_deref(), Some("ok;\n"));
        assert_eq!(lines.next(), None);
        assert!(lines.take_error().is_some());
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source("definitely/not/here.mpp").unwrap_err();
        assert!(err.message.contains("Cannot access file"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
