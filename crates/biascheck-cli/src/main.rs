//! biascheck CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use biascheck_core::batch::GradeFloor;
use biascheck_core::model::QuestionType;

mod commands;

#[derive(Parser)]
#[command(
    name = "biascheck",
    version,
    about = "Answer length bias detection for multiple-choice question banks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a proposed answer set before saving it
    Analyze {
        /// JSON array of {text, is_correct, distractor_reason} objects
        #[arg(long)]
        answers: PathBuf,

        /// Question type: single, choose_n, select_all
        #[arg(long, default_value = "single")]
        question_type: QuestionType,

        /// Number of correct answers for choose_n questions
        #[arg(long)]
        choose_n: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Exit code 1 if the answer set fails
        #[arg(long)]
        strict: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze every question of one or more exam banks
    Exam {
        /// Path to .toml bank file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Include a per-question breakdown
        #[arg(long)]
        breakdown: bool,

        /// Output directory (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, sarif, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Exit with code 1 if any question grades D or F
        #[arg(long)]
        fail_on_failing: bool,
    },

    /// List the most biased questions with per-answer fix instructions
    Remediate {
        /// Path to .toml bank file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Include questions below this grade: F, D, C
        #[arg(long)]
        min_grade: Option<GradeFloor>,

        /// Maximum questions to return (1-100)
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print length targets and authoring advice for a new question
    Guidelines {
        /// Question type: single, choose_n, select_all
        #[arg(long, default_value = "single")]
        question_type: QuestionType,

        /// Number of answers to write
        #[arg(long, default_value = "4")]
        num_answers: usize,

        /// Target answer length in characters
        #[arg(long)]
        target_length: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("biascheck=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            answers,
            question_type,
            choose_n,
            format,
            strict,
            config,
        } => commands::analyze::execute(answers, question_type, choose_n, format, strict, config),
        Commands::Exam {
            bank,
            breakdown,
            output,
            format,
            config,
            fail_on_failing,
        } => commands::exam::execute(bank, breakdown, output, format, config, fail_on_failing),
        Commands::Remediate {
            bank,
            min_grade,
            limit,
            format,
            config,
        } => commands::remediate::execute(bank, min_grade, limit, format, config),
        Commands::Guidelines {
            question_type,
            num_answers,
            target_length,
            format,
            config,
        } => commands::guidelines::execute(question_type, num_answers, target_length, format, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
