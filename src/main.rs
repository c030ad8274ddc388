use clap::Parser;
use dotenvy::dotenv;
use gradebook::{
    cli::{self, Cli, Context},
    config::{database, seed},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; DATABASE_URL may also be set externally
    dotenv().ok();

    let args = Cli::parse();

    // 3. Load the school configuration
    let config = seed::load_config(&args.config)
        .inspect(|_| info!("Loaded configuration from {}", args.config.display()))
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Initialize database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Run the command
    let ctx = Context {
        db: &db,
        config: &config,
        today: chrono::Local::now().date_naive(),
    };
    let output = cli::execute(args.command, &ctx)
        .await
        .inspect_err(|e| error!("{}", e))?;
    print!("{output}");

    Ok(())
}
