//! Cipherkey CLI - validate classical cipher keys
//!
//! Drives the form controller from the command line: pick a mode and an
//! algorithm, supply the key, and see whether the submission would be
//! allowed to reach the encryption service.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use zeroize::Zeroizing;

use cipherkey::catalog::{self, AlgorithmId, Mode};
use cipherkey::controller::{Event, FormInput, ModeController, SubmitOutcome};
use cipherkey::error::Result;
use cipherkey::key_source::{self, KeyReader, ReaderKeyReader, TerminalKeyReader};
use cipherkey::reporter::Submission;

/// Exit status when validation cancels the submission.
const EXIT_CANCELLED: i32 = 2;

#[derive(Parser)]
#[command(name = "cipherkey")]
#[command(version)]
#[command(about = "Validate classical cipher keys before submission.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a key the way the form does on submit
    #[command(alias = "c")]
    Check {
        /// Input mode: "text" or "file"
        #[arg(short, long, default_value = "text")]
        mode: Mode,

        /// Algorithm identifier (shift, substitution, affine, vigenere,
        /// hill, permutation, otp, playfair)
        #[arg(short, long)]
        algorithm: Option<AlgorithmId>,

        /// Key text
        #[arg(short, long, conflicts_with_all = ["key_stdin", "prompt_key"])]
        key: Option<String>,

        /// Read key text from stdin
        #[arg(long, conflicts_with = "prompt_key")]
        key_stdin: bool,

        /// Prompt for key text on the terminal without echo
        #[arg(long)]
        prompt_key: bool,

        /// Key file to hand to the service (only its presence is checked)
        #[arg(long, value_name = "FILE")]
        key_file: Option<PathBuf>,

        /// Data file to encrypt or decrypt in file mode
        #[arg(short, long, value_name = "FILE")]
        data_file: Option<PathBuf>,

        /// Hill matrix size (n for an n x n grid)
        #[arg(long, value_name = "N")]
        hill_size: Option<usize>,

        /// Hill matrix cells, row-major and comma-separated
        #[arg(long, value_name = "CELLS", value_delimiter = ',')]
        hill: Vec<String>,
    },

    /// List the algorithms offered for a mode
    #[command(alias = "ls")]
    Algorithms {
        /// Input mode: "text" or "file"
        #[arg(short, long, default_value = "text")]
        mode: Mode,
    },

    /// Show the first characters of a key file
    PreviewKey {
        /// Path to the key file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

struct CheckArgs {
    mode: Mode,
    algorithm: Option<AlgorithmId>,
    key: Option<String>,
    key_stdin: bool,
    prompt_key: bool,
    key_file: Option<PathBuf>,
    data_file: Option<PathBuf>,
    hill_size: Option<usize>,
    hill: Vec<String>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            mode,
            algorithm,
            key,
            key_stdin,
            prompt_key,
            key_file,
            data_file,
            hill_size,
            hill,
        } => check(CheckArgs {
            mode,
            algorithm,
            key,
            key_stdin,
            prompt_key,
            key_file,
            data_file,
            hill_size,
            hill,
        }),
        Commands::Algorithms { mode } => {
            list_algorithms(mode);
            Ok(true)
        }
        Commands::PreviewKey { path } => key_source::preview_key_file(&path).map(|preview| {
            println!("{}", preview);
            true
        }),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_CANCELLED),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether the submission was allowed.
fn check(args: CheckArgs) -> Result<bool> {
    let key = read_key(&args)?;
    let key_file = args
        .key_file
        .as_deref()
        .map(key_source::require_file)
        .transpose()?;
    let data_file = args
        .data_file
        .as_deref()
        .map(key_source::require_file)
        .transpose()?;

    let mut controller = ModeController::new();
    controller.dispatch(Event::SwitchMode(args.mode))?;
    if let Some(order) = args.hill_size {
        controller.dispatch(Event::ResizeHill(order))?;
    }
    controller.dispatch(Event::SelectAlgorithm {
        mode: args.mode,
        algorithm: args.algorithm,
    })?;

    let order = controller.hill_order();
    for (i, value) in args.hill.into_iter().enumerate() {
        controller
            .dispatch(Event::EditHillCell {
                row: i / order,
                col: i % order,
                value,
            })
            .map_err(|e| e.with_context(format!("invalid --hill value #{}", i + 1)))?;
    }

    let input = FormInput {
        key: &key,
        key_file: key_file.as_deref(),
        data_file: data_file.as_deref(),
    };
    match controller.submit(&input) {
        SubmitOutcome::Proceed(submission) => {
            print_submission(&submission);
            Ok(true)
        }
        SubmitOutcome::Cancelled(_) => {
            eprintln!("{}", controller.reporter().render());
            Ok(false)
        }
    }
}

fn read_key(args: &CheckArgs) -> Result<Zeroizing<String>> {
    if args.key_stdin {
        ReaderKeyReader::new(Box::new(std::io::stdin())).read_key()
    } else if args.prompt_key {
        TerminalKeyReader::new().read_key()
    } else {
        Ok(Zeroizing::new(args.key.clone().unwrap_or_default()))
    }
}

fn print_submission(submission: &Submission) {
    println!(
        "ok: {} ({}) in {} mode",
        submission.algorithm.display_name(),
        submission.algorithm,
        submission.mode
    );
    if !submission.key.is_empty() {
        println!("key: {} characters", submission.key.chars().count());
    }
    if let Some(name) = &submission.key_file {
        println!("key file: {}", name);
    }
    if let Some(name) = &submission.data_file {
        println!("data file: {}", name);
    }
    if !submission.hill_entries.is_empty() {
        println!("hill: {}", submission.hill_entries.join(","));
    }
}

fn list_algorithms(mode: Mode) {
    for id in catalog::algorithms_for(mode) {
        println!("{:<13} {:<20} {}", id.as_str(), id.display_name(), id.help_text());
    }
}
