//! CLI entry point for the contact list cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use lead_processing::{
    CanonicalRecord, FileKind, LeadError, LeadPipeline, PipelineConfig, RoleTokens,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Contact list cleaning: deduplicate, validate and filter leads",
    long_about = "Cleans contact lists (csv, txt, xls, xlsx) into a five-column CSV.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  LEADS_OUTPUT_DIR    Default output directory (overridden by --output)\n\n\
                  EXAMPLES:\n  \
                  # Deduplicate and validate emails\n  \
                  lead-processing valid -i contacts.csv\n\n  \
                  # Keep decision makers only\n  \
                  lead-processing filter -i contacts.xlsx --role CEO --role Founder\n\n  \
                  # Roles typed one per line in a text file\n  \
                  lead-processing filter -i contacts.csv --roles-file roles.txt\n\n  \
                  # Show the first rows of an earlier output\n  \
                  lead-processing preview valid_leads_20240101_120000.csv --limit 5"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output directory for cleaned files
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print the result as JSON instead of a human-readable summary
    ///
    /// Disables all logs so stdout carries only the JSON document.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deduplicate and validate emails, write valid leads
    Valid {
        /// Path to the contact list
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Like `valid`, then keep only records whose title matches a role
    Filter {
        /// Path to the contact list
        #[arg(short, long)]
        input: PathBuf,

        /// Role token to match (repeatable)
        #[arg(short, long = "role")]
        roles: Vec<String>,

        /// Text file with one role token per line (used when no --role is given)
        #[arg(long)]
        roles_file: Option<PathBuf>,
    },

    /// Show the first rows of a previously written output file
    Preview {
        /// Output file name (inside the output directory)
        file_name: String,

        /// Maximum rows to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// List the common role tokens
    Roles,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let output_dir = args
        .output
        .clone()
        .or_else(|| std::env::var("LEADS_OUTPUT_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PipelineConfig::default().output_dir);

    let config = PipelineConfig::builder().output_dir(&output_dir).build()?;
    let pipeline = LeadPipeline::builder().config(config).build()?;

    match run_command(&pipeline, &args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            } else {
                eprintln!("{}", e.user_message());
            }
            Err(anyhow!("{}", e.error_code()))
        }
    }
}

fn run_command(pipeline: &LeadPipeline, args: &Args) -> Result<(), LeadError> {
    match &args.command {
        Command::Valid { input } => {
            let ext = input_extension(input)?;
            let result = pipeline.run_valid_leads(input, &ext)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.summary_line());
                print_output_location(pipeline, &result.output_file_name);
                print_preview(&result.preview_rows, result.valid_count);
            }
        }
        Command::Filter {
            input,
            roles,
            roles_file,
        } => {
            let free_text = match roles_file {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => None,
            };
            let tokens = RoleTokens::resolve(roles.clone(), free_text.as_deref());
            let ext = input_extension(input)?;
            let result = pipeline.run_filtered_leads(input, &ext, &tokens)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.summary_line());
                print_output_location(pipeline, &result.output_file_name);
                print_preview(&result.preview_rows, result.matched_count);
            }
        }
        Command::Preview { file_name, limit } => {
            let rows = pipeline.preview(file_name, *limit)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                info!("Previewing {}", file_name);
                print_preview(&rows, rows.len());
            }
        }
        Command::Roles => {
            let tokens = RoleTokens::common();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for role in tokens.iter() {
                    println!("{}", role);
                }
            }
        }
    }

    Ok(())
}

/// Extension of the input file, validated against the allow-list.
fn input_extension(path: &Path) -> Result<String, LeadError> {
    FileKind::from_path(path)?;
    Ok(path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string())
}

fn print_output_location(pipeline: &LeadPipeline, file_name: &str) {
    println!(
        "Output: {}",
        pipeline.config().output_dir.join(file_name).display()
    );
}

/// Print preview rows as an aligned table.
///
/// Uses `println!` on purpose: this is the command's output, not a log line.
fn print_preview(rows: &[CanonicalRecord], total: usize) {
    println!();
    println!("Showing {} of {} rows", rows.len(), total);
    println!("{}", "-".repeat(100));
    println!(
        "{:<22} {:<30} {:<15} {:<15} {:<15}",
        "Name", "Email", "Phone", "Company", "Title"
    );
    println!("{}", "-".repeat(100));
    for row in rows {
        println!(
            "{:<22} {:<30} {:<15} {:<15} {:<15}",
            truncate_str(&row.name, 21),
            truncate_str(&row.email, 29),
            truncate_str(&row.phone, 14),
            truncate_str(&row.company, 14),
            truncate_str(&row.title, 14)
        );
    }
}

/// Truncate a string to max characters with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
