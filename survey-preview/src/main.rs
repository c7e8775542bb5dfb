use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use survey_logic::{
    Answers, Evaluator, EvaluatorOptions, Navigation, ReconciliationPolicy, ReferenceIssue,
    Runner, RunnerOptions, SessionState, SurveyDefinition, ValidationErrors, audit,
};

mod prompt;

use prompt::DialoguerRespondent;

#[derive(Parser)]
#[command(name = "survey-preview")]
#[command(about = "Preview, evaluate and check branching surveys", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a survey interactively
    Run(RunArgs),

    /// Evaluate stored answers against a survey
    Evaluate(EvaluateArgs),

    /// Report broken question references
    Check(CheckArgs),
}

#[derive(Args)]
struct EvaluatorArgs {
    /// Resolve conditions by question id only (no text reconciliation)
    #[arg(long)]
    strict_ids: bool,

    /// Validate questions hidden by display logic too
    #[arg(long)]
    validate_hidden: bool,
}

impl EvaluatorArgs {
    fn options(&self) -> EvaluatorOptions {
        EvaluatorOptions {
            reconciliation: if self.strict_ids {
                ReconciliationPolicy::Strict
            } else {
                ReconciliationPolicy::TextSnapshot
            },
            validate_hidden_questions: self.validate_hidden,
        }
    }
}

#[derive(Args)]
struct RunArgs {
    /// Survey definition (JSON)
    survey: PathBuf,

    /// Session state file; resumed when present, saved after every section
    #[arg(long)]
    state: Option<PathBuf>,

    /// Use the plain theme (no colors)
    #[arg(long)]
    plain: bool,

    /// Give up after this many section submits
    #[arg(long, default_value_t = RunnerOptions::default().max_steps)]
    max_steps: usize,

    #[command(flatten)]
    evaluator: EvaluatorArgs,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Survey definition (JSON)
    survey: PathBuf,

    /// Answer map (JSON object of question id to answer)
    #[arg(long)]
    answers: PathBuf,

    /// Section to submit (0-based)
    #[arg(long, default_value_t = 0)]
    section: usize,

    #[command(flatten)]
    evaluator: EvaluatorArgs,
}

#[derive(Args)]
struct CheckArgs {
    /// Survey definition (JSON)
    survey: PathBuf,
}

#[derive(Serialize)]
struct Evaluation<'a> {
    visible: Vec<&'a str>,
    hidden: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    navigation: Option<Navigation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    ok: bool,
    issues: &'a [ReferenceIssue],
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Evaluate(args) => evaluate(args),
        Commands::Check(args) => check(args),
    }
}

fn load_definition(path: &Path) -> Result<SurveyDefinition> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read survey {}", path.display()))?;
    SurveyDefinition::from_json(&json)
        .with_context(|| format!("Invalid survey definition {}", path.display()))
}

fn run(args: RunArgs) -> Result<ExitCode> {
    let definition = load_definition(&args.survey)?;
    let state = match &args.state {
        Some(path) if path.exists() => {
            info!("Resuming session from {}", path.display());
            SessionState::load(path)?
        }
        _ => SessionState::default(),
    };
    let options = RunnerOptions {
        evaluator: args.evaluator.options(),
        max_steps: args.max_steps,
    };

    let mut respondent = if args.plain {
        DialoguerRespondent::plain()
    } else {
        DialoguerRespondent::new()
    };
    let result = Runner::resume(&definition, state, options).run(&mut respondent, |state| {
        match &args.state {
            Some(path) => state.save(path),
            None => Ok(()),
        }
    });

    match result {
        Ok(state) => {
            println!("{}", serde_json::to_string_pretty(&state.answers)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.is_cancelled() => {
            warn!("Survey cancelled");
            Ok(ExitCode::from(130))
        }
        Err(err) => Err(err.into()),
    }
}

fn evaluate(args: EvaluateArgs) -> Result<ExitCode> {
    let definition = load_definition(&args.survey)?;
    let json = fs::read_to_string(&args.answers)
        .with_context(|| format!("Failed to read answers {}", args.answers.display()))?;
    let answers: Answers = serde_json::from_str(&json)
        .with_context(|| format!("Invalid answers {}", args.answers.display()))?;

    let evaluator = Evaluator::with_options(&definition, args.evaluator.options());
    let visibility = evaluator.visibility(&answers);
    let (visible, hidden) = visibility.partition(&definition);

    let (navigation, errors) = match evaluator.next_section(args.section, &answers) {
        Ok(navigation) => (Some(navigation), None),
        Err(errors) => (None, Some(errors)),
    };
    let blocked = errors.is_some();

    let evaluation = Evaluation {
        visible: visible.into_iter().map(|id| id.as_str()).collect(),
        hidden: hidden.into_iter().map(|id| id.as_str()).collect(),
        navigation,
        errors,
    };
    println!("{}", serde_json::to_string_pretty(&evaluation)?);

    if blocked {
        info!("Section {} does not validate", args.section);
    }
    Ok(ExitCode::SUCCESS)
}

fn check(args: CheckArgs) -> Result<ExitCode> {
    let definition = load_definition(&args.survey)?;
    let issues = audit(&definition);
    for issue in &issues {
        warn!("Question '{}': {issue:?}", issue.owner());
    }

    let report = CheckReport {
        ok: issues.is_empty(),
        issues: &issues,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if issues.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
