use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use medslot_db::schema::initialize_database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Get database connection string from environment variable
    let database_url =
        std::env::var("DATABASE_URL").wrap_err("DATABASE_URL must be set to run migrations")?;

    println!("Connecting to database...");
    // Create database connection pool
    let db_pool = medslot_db::create_pool(&database_url).await?;

    // Initialize database schema
    println!("Initializing time slot schema...");
    initialize_database(&db_pool).await?;
    println!("Time slot schema initialized successfully.");

    Ok(())
}
