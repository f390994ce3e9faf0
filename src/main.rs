// src/main.rs
mod api;
mod baseline;
mod catalog;
mod config;
mod evaluation;
mod geometry;
mod model;
mod recommender;
mod sizing;
mod types;

use catalog::ReferenceData;
use config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();

    println!("🚀 Eco-Pack service starting...");
    let catalog = match ReferenceData::load(
        app_config.data.products_path(),
        app_config.data.materials_path(),
    ) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("❌ Could not load reference data: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = catalog.lookup_material(&app_config.sizing.baseline_material_id) {
        eprintln!("❌ Baseline packaging material is not in the catalog: {}", err);
        std::process::exit(1);
    }

    println!(
        "📚 Loaded {} products and {} packaging materials",
        catalog.products().len(),
        catalog.materials().len()
    );

    api::start_api_server(
        app_config.api,
        catalog,
        app_config.sizing,
        app_config.evaluation,
    )
    .await;
}
