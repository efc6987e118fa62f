use clap::Parser;
use dotenvy::dotenv;
use order_desk::{
    cli::{self, AppData, Cli},
    config::{database, settings},
    core::catalog,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible); stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Load the application configuration
    let app_config = settings::load_config(&cli.config)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the sample menu into an empty catalog
    catalog::seed_sample_dishes(&db, &app_config.dishes)
        .await
        .inspect_err(|e| error!("Failed to seed sample dishes: {}", e))?;

    // 6. Run the command
    let data = AppData::new(db, app_config);
    let mut stdout = std::io::stdout();
    cli::run(cli.command, &data, &mut stdout).await
}
