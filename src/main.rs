use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use linepatch::{apply_to_file, ApplyError, Document, EditRequest, FileError};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "linepatch")]
#[command(about = "Line-addressable batch file editing with staleness detection", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a file as tagged lines (LINE#HASH|content)
    Read {
        /// File to read
        file: PathBuf,

        /// First line to print (1-based)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        start_line: u32,

        /// Maximum number of lines to print
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        lines: Option<u32>,
    },

    /// Apply a JSON batch of edits to a file
    Apply {
        /// File to edit
        file: PathBuf,

        /// JSON file holding the edit batch (stdin if omitted)
        #[arg(short, long)]
        edits: Option<PathBuf>,

        /// Validate and report without writing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show a unified diff of the change
        #[arg(short, long)]
        diff: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Read {
            file,
            start_line,
            lines,
        } => cmd_read(file, start_line, lines),

        Commands::Apply {
            file,
            edits,
            dry_run,
            diff,
        } => cmd_apply(file, edits, dry_run, diff),
    }
}

fn cmd_read(file: PathBuf, start_line: u32, lines: Option<u32>) -> Result<()> {
    let raw = fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
    let doc = Document::decode(&raw);

    let rendered = linepatch::render_window(&doc, start_line as usize, lines.map(|n| n as usize));
    if !rendered.is_empty() {
        println!("{rendered}");
    }

    Ok(())
}

fn cmd_apply(
    file: PathBuf,
    edits_path: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
) -> Result<()> {
    let batch = load_edits(edits_path)?;
    let original =
        fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;

    let outcome = if dry_run {
        match linepatch::apply(&original, &batch) {
            Ok(outcome) => {
                println!(
                    "{} Would apply {} edit(s) to {}",
                    "✓".green(),
                    batch.len(),
                    file.display()
                );
                outcome
            }
            Err(e) => return fail(&FileError::Apply(e), &original),
        }
    } else {
        match apply_to_file(&file, &batch) {
            Ok(result) => {
                if result.written {
                    println!(
                        "{} Applied {} edit(s) to {}",
                        "✓".green(),
                        batch.len(),
                        file.display()
                    );
                } else {
                    println!(
                        "{} No changes: batch is a no-op for {}",
                        "⊙".yellow(),
                        file.display()
                    );
                }
                result.outcome
            }
            Err(e) => return fail(&e, &original),
        }
    };

    if !outcome.noop_edits.is_empty() {
        println!(
            "  {}",
            format!("no-op edits: {:?}", outcome.noop_edits).dimmed()
        );
    }
    if let Some(line) = outcome.first_changed_line {
        println!("  first changed line: {line}");
    }

    if show_diff && outcome.first_changed_line.is_some() {
        display_diff(
            &String::from_utf8_lossy(&original),
            &String::from_utf8_lossy(&outcome.bytes),
        );
    }

    Ok(())
}

/// Report an engine failure, with tag context for staleness so the caller
/// can refresh and retry.
fn fail(err: &FileError, original: &[u8]) -> Result<()> {
    eprintln!("{} {}", "✗".red(), err);

    if let FileError::Apply(ApplyError::Validation(validation)) = err {
        if let Some(index) = validation.line() {
            let doc = Document::decode(original);
            eprintln!();
            eprintln!("{}", "Current content at the reported line:".dimmed());
            eprintln!("{}", linepatch::render_mismatch_context(&doc.lines, index));
            eprintln!();
            eprintln!(
                "{}",
                "Re-read the file to refresh tags, then retry.".yellow()
            );
        }
    }

    anyhow::bail!("edit batch failed")
}

fn load_edits(path: Option<PathBuf>) -> Result<Vec<EditRequest>> {
    let text = match path {
        Some(p) => {
            fs::read_to_string(&p).with_context(|| format!("failed to read {}", p.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read edits from stdin")?;
            buf
        }
    };

    let edits: Vec<EditRequest> =
        serde_json::from_str(&text).context("invalid edit batch JSON")?;
    Ok(edits)
}

/// Show a unified diff between original and modified content.
fn display_diff(original: &str, modified: &str) {
    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", line);
    }
}
