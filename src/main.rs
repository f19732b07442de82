use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use medslot_api::{ApiState, config::ApiConfig};
use medslot_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    let state = match &config.database_url {
        Some(database_url) => {
            // Create database connection pool
            let db_pool = create_pool(database_url).await?;

            // Initialize database schema
            initialize_database(&db_pool).await?;

            ApiState::postgres(db_pool)
        }
        // Nothing survives a restart in this mode
        None => ApiState::memory(),
    };

    // Start API server
    medslot_api::start_server(config, Arc::new(state)).await?;

    Ok(())
}
