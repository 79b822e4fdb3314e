use chrono::Utc;
use clap::{Parser, Subcommand};
use medrisk_core::{
    ElasticsearchStore, HttpNoteStore, HttpPatientDirectory, ReportPipeline,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "medrisk", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Elasticsearch base URL
    #[arg(long, default_value = "http://localhost:9200")]
    elasticsearch_url: String,

    /// Notes index name
    #[arg(long, default_value = "medical_notes")]
    index: String,

    /// Gateway base URL serving the patient and note APIs
    #[arg(long, default_value = "http://localhost:5000")]
    gateway_url: String,
}

#[derive(Subcommand)]
enum Command {
    /// Create the notes index with its mapping if it does not exist.
    EnsureIndex,
    /// Compute and print the diabetes-risk report for one patient.
    Report {
        /// Patient id
        #[arg(long)]
        patient_id: i32,
        /// Print the report as JSON instead of plain text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let store = ElasticsearchStore::new(&cli.elasticsearch_url, &cli.index)
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        "medrisk boot"
    );

    match cli.command {
        Command::EnsureIndex => {
            store
                .ensure_index()
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            println!("index '{}' is ready", cli.index);
        }
        Command::Report { patient_id, json } => {
            let patients = HttpPatientDirectory::new(&cli.gateway_url)
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            let notes = HttpNoteStore::new(&cli.gateway_url)
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            let pipeline = ReportPipeline::new(patients, notes, store);

            let report = pipeline
                .risk_report(patient_id)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            match report {
                None => {
                    println!("patient {patient_id} not found");
                    std::process::exit(1);
                }
                Some(report) if json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                Some(report) => {
                    println!("patient: {}", report.patient_id);
                    println!("risk level: {}", report.risk_level.as_str());
                    if report.trigger_terms.is_empty() {
                        println!("triggers: none");
                    } else {
                        println!("triggers ({}):", report.trigger_terms.len());
                        for term in &report.trigger_terms {
                            println!("  - {term}");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
