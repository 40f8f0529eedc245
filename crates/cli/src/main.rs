use clap::{Parser, Subcommand};
use std::path::PathBuf;
use utoipa::OpenApi;
use wardflow_core::roster::load_roster;

#[derive(Parser)]
#[command(name = "wardflow")]
#[command(about = "wardflow clinical coordination CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a patient roster file
    ValidateRoster {
        /// Path to the roster JSON file
        path: PathBuf,
    },
    /// Print the REST API's OpenAPI document as JSON
    Openapi,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::ValidateRoster { path }) => match load_roster(&path) {
            Ok(patients) => {
                println!("Roster OK: {} patient(s)", patients.len());
                for patient in patients {
                    println!(
                        "  {} — {} (room {}, {})",
                        patient.mrn, patient.name, patient.room, patient.attending_doctor
                    );
                }
            }
            Err(e) => {
                eprintln!("Roster invalid: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Openapi) => {
            println!("{}", api_rest::ApiDoc::openapi().to_pretty_json()?);
        }
        None => {
            println!("Use 'wardflow --help' for commands");
        }
    }

    Ok(())
}
