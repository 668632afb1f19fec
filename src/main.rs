use dotenvy::dotenv;
use store_catalog::{
    config::{catalog, database},
    core::{category, product},
    errors::Result,
    media::MediaStorage,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    // 3. Load the catalog configuration
    let config = catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load catalog configuration: {}", e))?;
    let media = MediaStorage::from_config(&config.media);
    tokio::fs::create_dir_all(media.root()).await?;
    info!("Media root: {}", media.root().display());

    // 4. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Seed configured categories
    category::seed_categories(&db, &config.categories)
        .await
        .inspect_err(|e| error!("Failed to seed categories: {}", e))?;

    let categories = category::get_all_categories(&db).await?;
    let available = product::get_available_products(&db).await?;
    info!(
        "Catalog ready: {} categories, {} available products",
        categories.len(),
        available.len()
    );

    Ok(())
}
