use clap::Parser;
use tracing_subscriber::EnvFilter;

use dailyquotes::cli::{self, Cli, Command};
use dailyquotes::config::Config;
use dailyquotes::db;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();
    let config = Config::from_env()?;
    let pool = db::init_pool(&config.database_url).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => dailyquotes::serve(config, pool).await,
        Command::Import { file } => cli::import_data(&pool, &file).await,
        Command::Reflections { tag } => cli::print_reflections(&pool, tag).await,
        Command::Tags => cli::print_tags(&pool).await,
    }
}
