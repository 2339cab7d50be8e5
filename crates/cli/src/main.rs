use clap::{Parser, Subcommand};
use mch_core::config::data_dir_from_env_value;
use mch_core::repositories::FileStores;
use mch_core::services::{
    DashboardService, MedicalRecordService, MotherService, SubjectRef, VitalsInput,
};
use mch_core::{CoreConfig, ShardableUuid};
use mch_predictor::{PredictorClient, PredictorConfig};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mch")]
#[command(about = "Maternal health record system CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all mothers, newest first
    Mothers,
    /// Show one mother by national identity number
    Mother {
        /// National identity card number
        nic: String,
    },
    /// List a mother's medical records
    Records {
        /// Mother profile id
        mother_id: String,
    },
    /// Print the dashboard aggregates as JSON
    Dashboard,
    /// Run a risk prediction for a mother
    Predict {
        /// National identity card number of the mother
        #[arg(long)]
        nic: String,
        /// Age in years (derived from date of birth when omitted)
        #[arg(long)]
        age: Option<u32>,
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Blood pressure as SYS/DIA
        #[arg(long)]
        bp: Option<String>,
        /// Blood sugar in mg/dL
        #[arg(long)]
        sugar: Option<f64>,
        /// Store a medical record with the result
        #[arg(long)]
        save: bool,
    },
}

fn stores() -> Result<FileStores, Box<dyn std::error::Error>> {
    let cfg = CoreConfig::ensure_data_dir(data_dir_from_env_value(
        std::env::var("MCH_DATA_DIR").ok(),
    ))?;
    Ok(FileStores::open(&cfg))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Mothers) => {
            let service = MotherService::new(stores()?.mothers);
            let mothers = service.list();
            if mothers.is_empty() {
                println!("No mothers found.");
            } else {
                for mother in mothers {
                    println!(
                        "ID: {}, NIC: {}, DOB: {}, Registered: {}",
                        mother.id,
                        mother.nic_number,
                        mother
                            .dob
                            .map_or_else(|| "-".to_string(), |d| d.to_string()),
                        mother.created_at
                    );
                }
            }
        }
        Some(Commands::Mother { nic }) => {
            let service = MotherService::new(stores()?.mothers);
            match service.by_nic(&nic) {
                Ok(mother) => println!("{}", serde_json::to_string_pretty(&mother)?),
                Err(e) => eprintln!("Error looking up mother: {}", e),
            }
        }
        Some(Commands::Records { mother_id }) => {
            let mother_id = ShardableUuid::parse(mother_id.trim())?;
            let service = record_service(None)?;
            let records = service.list_by_mother(&mother_id)?;
            if records.is_empty() {
                println!("No medical records found.");
            } else {
                for record in records {
                    println!(
                        "ID: {}, BP: {}, Sugar: {}, Risk: {}, Recorded: {}",
                        record.id,
                        record.blood_pressure.as_deref().unwrap_or("-"),
                        record
                            .sugar_level
                            .map_or_else(|| "-".to_string(), |s| s.to_string()),
                        record
                            .risk
                            .map_or_else(|| "-".to_string(), |r| r.to_string()),
                        record.recorded_at
                    );
                }
            }
        }
        Some(Commands::Dashboard) => {
            let stores = stores()?;
            let service = DashboardService::new(stores.mothers, stores.medical_records);
            match service.dashboard() {
                Ok(dashboard) => println!("{}", serde_json::to_string_pretty(&dashboard)?),
                Err(e) => eprintln!("Error building dashboard: {}", e),
            }
        }
        Some(Commands::Predict {
            nic,
            age,
            height,
            weight,
            bp,
            sugar,
            save,
        }) => {
            let predictor = PredictorConfig::from_env_values(
                std::env::var("PREDICT_API_BASE").ok(),
                std::env::var("PREDICT_API_TIMEOUT_MS").ok(),
            )?;
            let service = record_service(Some(PredictorClient::new(&predictor)?))?;
            let vitals = VitalsInput {
                age,
                height,
                weight,
                blood_pressure: bp,
                sugar_level: sugar,
                persist: save,
                ..VitalsInput::default()
            };
            match service
                .create_and_predict(&SubjectRef::NationalId(nic), vitals)
                .await
            {
                Ok(outcome) => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Err(e) => eprintln!("Error running prediction: {}", e),
            }
        }
        None => {
            println!("Use 'mch --help' for commands");
        }
    }

    Ok(())
}

/// Builds the record service. Commands that never predict get a client with default settings.
fn record_service(
    predictor: Option<PredictorClient>,
) -> Result<MedicalRecordService, Box<dyn std::error::Error>> {
    let predictor = match predictor {
        Some(client) => client,
        None => PredictorClient::new(&PredictorConfig::from_env_values(None, None)?)?,
    };
    let stores = stores()?;
    Ok(MedicalRecordService::new(
        stores.mothers,
        stores.medical_records,
        Arc::new(predictor),
    ))
}
