//! Cardiorisk: heart disease risk screening
//!
//! Main entry point for the command-line application.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiorisk::adapters::{FsArtifactStore, LogisticModel};
use cardiorisk::config::LogMode;
use cardiorisk::domain::{AnswerForm, Field};
use cardiorisk::{PredictionService, Settings, DISCLAIMER};

#[derive(Parser)]
#[command(name = "cardiorisk")]
#[command(about = "Heart disease risk screening from a short questionnaire")]
#[command(version)]
struct Cli {
    /// Directory holding model.json and the optional artifacts
    /// (overrides CARDIORISK_MODEL_DIR)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the chance of heart disease
    Predict {
        #[command(flatten)]
        answers: AnswerArgs,

        /// Print the full diagnosis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the feature vector the classifier would receive
    Features {
        #[command(flatten)]
        answers: AnswerArgs,
    },
}

/// Questionnaire answers. Omitted fields count as "I don't know".
#[derive(Args)]
struct AnswerArgs {
    /// JSON answer form; individual flags override its fields
    #[arg(long = "answers", value_name = "FILE")]
    answers_file: Option<PathBuf>,

    /// Age in years
    #[arg(long)]
    age: Option<String>,
    /// Female | Male
    #[arg(long)]
    sex: Option<String>,
    /// Typical Angina | Atypical Angina | Non-anginal Pain | Asymptomatic
    #[arg(long)]
    cp: Option<String>,
    /// Resting blood pressure (mm Hg)
    #[arg(long)]
    trestbps: Option<String>,
    /// Serum cholesterol (mg/dl)
    #[arg(long)]
    chol: Option<String>,
    /// Fasting blood sugar > 120 mg/dl: No | Yes
    #[arg(long)]
    fbs: Option<String>,
    /// Normal | ST-T abnormality | Left ventricular hypertrophy
    #[arg(long)]
    restecg: Option<String>,
    /// Maximum heart rate achieved
    #[arg(long)]
    thalach: Option<String>,
    /// Exercise induced angina: No | Yes
    #[arg(long)]
    exang: Option<String>,
    /// ST depression induced by exercise
    #[arg(long)]
    oldpeak: Option<String>,
    /// Upsloping | Flat | Downsloping
    #[arg(long)]
    slope: Option<String>,
    /// Major vessels coloured by fluoroscopy: 0 to 3
    #[arg(long)]
    ca: Option<String>,
    /// Normal | Fixed defect | Reversible defect
    #[arg(long)]
    thal: Option<String>,
}

impl AnswerArgs {
    fn to_form(&self) -> Result<AnswerForm> {
        let mut form = match &self.answers_file {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read answers from {path:?}"))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("Invalid answer form in {path:?}"))?
            }
            None => AnswerForm::default(),
        };

        let flags = [
            (Field::Age, &self.age),
            (Field::Sex, &self.sex),
            (Field::Cp, &self.cp),
            (Field::Trestbps, &self.trestbps),
            (Field::Chol, &self.chol),
            (Field::Fbs, &self.fbs),
            (Field::Restecg, &self.restecg),
            (Field::Thalach, &self.thalach),
            (Field::Exang, &self.exang),
            (Field::Oldpeak, &self.oldpeak),
            (Field::Slope, &self.slope),
            (Field::Ca, &self.ca),
            (Field::Thal, &self.thal),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                form.set(field, value.as_str());
            }
        }

        Ok(form)
    }
}

fn init_logging(settings: &Settings) -> Result<WorkerGuard> {
    let (writer, guard) = match settings.log_mode {
        LogMode::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogMode::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogMode::File => {
            if let Some(parent) = settings.log_file.parent() {
                // Best-effort: an unwritable directory surfaces on open below.
                let _ = fs::create_dir_all(parent);
            }
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&settings.log_file)
                .with_context(|| format!("Failed to open log file {:?}", settings.log_file))?;
            tracing_appender::non_blocking(file)
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(settings.log_mode == LogMode::Stderr),
        )
        .init();

    Ok(guard)
}

fn load_service(
    model_dir: &Path,
    require_manifest: bool,
) -> Result<PredictionService<LogisticModel>> {
    let store = FsArtifactStore::open(model_dir, require_manifest)
        .with_context(|| format!("Failed to open model directory {model_dir:?}"))?;
    PredictionService::from_store(&store).context("Failed to load model artifacts")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(dir) = cli.model_dir {
        settings.model_dir = dir;
    }

    let _guard = init_logging(&settings)?;
    tracing::info!("Starting Cardiorisk...");

    let service = load_service(&settings.model_dir, settings.require_manifest)?;

    match cli.command {
        Commands::Predict { answers, json } => {
            let answers = answers.to_form()?.collect()?;
            let diagnosis = service.predict(&answers)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&diagnosis)?);
            } else {
                println!("{}", diagnosis.message());
                if !diagnosis.imputed_fields.is_empty() {
                    let names: Vec<&str> =
                        diagnosis.imputed_fields.iter().map(|f| f.name()).collect();
                    println!("Assumed typical values for: {}", names.join(", "));
                }
                println!();
                println!("{DISCLAIMER}");
            }
        }
        Commands::Features { answers } => {
            let answers = answers.to_form()?.collect()?;
            let prepared = service.prepare(&answers)?;

            for (column, value) in prepared.vector.iter() {
                println!("{column} = {value}");
            }
            println!();
            println!("scaling: {}", prepared.scaling);
            if prepared.sanitized > 0 {
                println!("sanitized: {}", prepared.sanitized);
            }
        }
    }

    tracing::info!("Cardiorisk finished.");
    Ok(())
}
