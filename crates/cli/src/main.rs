use clap::{Parser, Subcommand};
use consult_core::config::{
    admin_username_from_env_value, data_dir_from_env_value, logo_path_from_env_value,
};
use consult_core::{
    assess, render_summary, Answers, ConsultService, CoreConfig, SymptomReport, Username,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod interactive;

#[derive(Parser)]
#[command(name = "consult")]
#[command(about = "Dental self-consultation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose a saved set of answers
    Diagnose {
        /// JSON file with patient answers
        #[arg(long)]
        answers: PathBuf,
        /// Also list the rules that fired
        #[arg(long)]
        explain: bool,
    },
    /// Print a full markdown report for a set of answers
    Report {
        /// JSON file with patient answers
        #[arg(long)]
        answers: PathBuf,
        /// Clinician named on the report
        #[arg(long)]
        user: String,
    },
    /// Run an interactive step-by-step consultation
    Consult {
        /// Clinician running the consultation
        #[arg(long)]
        user: String,
    },
    /// List saved consultations (the admin user sees all)
    History {
        #[arg(long)]
        user: String,
    },
    /// Register a clinician
    AddUser { username: String, password: String },
    /// Score general symptoms against known conditions
    Assess {
        /// Symptoms (comma-separated)
        symptoms: String,
        /// Patient age
        #[arg(long)]
        age: Option<u32>,
        /// Existing condition (repeatable)
        #[arg(long = "comorbidity")]
        comorbidities: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("consult_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = CoreConfig::new(
        data_dir_from_env_value(std::env::var("CONSULT_DATA_DIR").ok()),
        &admin_username_from_env_value(std::env::var("CONSULT_ADMIN_USER").ok()),
        logo_path_from_env_value(std::env::var("CONSULT_LOGO_PATH").ok()),
    )?;
    let service = ConsultService::new(Arc::new(cfg));

    match cli.command {
        Some(Commands::Diagnose { answers, explain }) => {
            let answers = read_answers(&answers)?;
            let eval = service.evaluate(&answers);
            println!("{}", render_summary(&eval.result));
            if explain {
                println!("\nRules fired:");
                for rule in &eval.fired_rules {
                    println!("- {rule}");
                }
            }
        }
        Some(Commands::Report { answers, user }) => {
            let answers = read_answers(&answers)?;
            let user = Username::new(&user)?;
            let result = service.diagnose(&answers);
            println!("{}", service.report(&user, &answers, &result));
        }
        Some(Commands::Consult { user }) => {
            let user = Username::new(&user)?;
            let stdin = std::io::stdin();
            let mut prompter = interactive::Prompter::new(stdin.lock(), std::io::stdout());
            if interactive::run_consultation(&mut prompter, &service, &user)?.is_none() {
                println!("Consultation not saved.");
            }
        }
        Some(Commands::History { user }) => {
            let user = Username::new(&user)?;
            let records = service.history(&user)?;
            if records.is_empty() {
                println!("No consultations found.");
            }
            for r in records {
                println!(
                    "{} | {} | {} | {} | {} | {}",
                    r.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    r.username,
                    r.patient_name.as_deref().unwrap_or("-"),
                    r.complaint.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
                    r.urgency_level,
                    r.summary
                );
            }
        }
        Some(Commands::AddUser { username, password }) => {
            let username = Username::new(&username)?;
            match service.credentials().register(&username, &password) {
                Ok(()) => println!("Added user: {username}"),
                Err(e) => eprintln!("Error adding user: {e}"),
            }
        }
        Some(Commands::Assess {
            symptoms,
            age,
            comorbidities,
        }) => {
            let report = SymptomReport {
                symptoms: symptoms
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                age,
                comorbidities,
            };
            let assessment = assess(&report);
            println!("Diagnosis: {}", assessment.diagnosis);
            println!("Treatment: {}", assessment.treatment);
            println!("Lab exams: {}", assessment.lab_exams);
            for d in assessment.differential_diagnoses {
                println!("  - {} ({})", d.condition, d.confidence);
            }
        }
        None => {
            println!("Use 'consult --help' for commands");
        }
    }

    Ok(())
}

fn read_answers(path: &Path) -> anyhow::Result<Answers> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}
