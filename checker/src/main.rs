use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use checker::catalog::ExerciseCatalog;
use checker::error::CheckerError;
use checker::grader::Grader;
use checker::render;
use checker::report::CheckReport;
use checker::types::Submission;
use clap::{Parser, Subcommand, ValueEnum};
use common::{config, logger::init_logging};
use tracing::error;

#[derive(ValueEnum, Clone, Debug)]
enum InstructionFormat {
    Text,
    Html,
}

#[derive(Parser, Debug)]
#[command(version, about = "Classify student submissions against exercise strategies")]
struct Args {
    /// Exercise catalog (JSON). Defaults to CATALOG_PATH.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print when an exercise is refused and when it is accepted
    Instructions {
        exercise: String,
        #[arg(long, value_enum, default_value_t = InstructionFormat::Text)]
        format: InstructionFormat,
    },
    /// List the submitted files an exercise looks at
    Files { exercise: String },
    /// Check submissions against a checked-out repository and print the report as JSON
    Check {
        /// Exercise uids, in the order they were submitted
        #[arg(required = true)]
        exercises: Vec<String>,
        /// Checked-out repository. Defaults to ARTIFACT_ROOT.
        #[arg(long)]
        artifact_root: Option<PathBuf>,
        /// Commit hash of the checked-out repository
        #[arg(long)]
        checksum: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _log_guard = init_logging(
        &config::log_dir(),
        &config::log_file(),
        &config::log_level(),
        config::log_to_stdout(),
    );

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{} failed: {}", config::project_name(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CheckerError> {
    let catalog_path = args
        .catalog
        .unwrap_or_else(|| PathBuf::from(config::catalog_path()));
    let catalog = ExerciseCatalog::load(&catalog_path)?;

    match args.command {
        Command::Instructions { exercise, format } => {
            let instructions = catalog.get(&exercise)?.strategy.instructions(&exercise);
            match format {
                InstructionFormat::Text => print!("{}", render::instructions_to_text(&instructions)),
                InstructionFormat::Html => println!("{}", render::instructions_to_html(&instructions)),
            }
        }
        Command::Files { exercise } => {
            for file in catalog.get(&exercise)?.strategy.mentioned_files(&exercise) {
                println!("{file}");
            }
        }
        Command::Check {
            exercises,
            artifact_root,
            checksum,
        } => {
            let root = artifact_root.unwrap_or_else(config::artifact_root);
            let grader = Grader::new(Arc::new(catalog), root);
            let submissions = exercises.into_iter().map(Submission::new).collect();
            let result = grader.check_batch(submissions, &checksum).await;
            if let Some(outcome) = result.outcome {
                let report = CheckReport::new(outcome, Some(checksum))
                    .with_submissions(result.submissions);
                println!("{}", report.to_json()?);
            }
        }
    }
    Ok(())
}
