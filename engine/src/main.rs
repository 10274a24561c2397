// Engine main entry point: authenticate against the login table, render
// the contracts dashboard for the default UG selection and hand the view
// to the presentation layer as JSON on stdout.
use painel_engine::auth;
use painel_engine::config::settings::Settings;
use painel_engine::data::datasets::DatasetCatalog;
use painel_engine::services::dashboard::contracts::{self, ContractsRequest};
use std::path::Path;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    info!("Starting Painel do Gestor engine...");

    let settings = Settings::from_file(Path::new("settings.json"))?;
    let catalog = DatasetCatalog::new(&settings);

    // Credentials come from the environment; there is no CLI surface.
    let username = std::env::var("PAINEL_USUARIO").unwrap_or_default();
    let password = std::env::var("PAINEL_SENHA").unwrap_or_default();

    let logins = catalog.load_login_data()?;
    let session = match auth::login(&logins, &username, &password)? {
        Some(session) => session,
        None => {
            eprintln!("Usuário ou senha incorretos.");
            std::process::exit(1);
        }
    };

    let request = ContractsRequest {
        selected_ugs: settings.default_ugs.clone(),
        ..ContractsRequest::default()
    };
    let view = contracts::render(&session, &catalog, &request)?;

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
