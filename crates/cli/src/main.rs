use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use reqwest::Url;
use tawseek_misr::Language;
mod commands;

#[derive(Parser)]
#[command(name = "tawseek-misr")]
#[command(about = "A CLI tool for finding government offices and booking appointments in Egypt")]
#[command(version)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "TAWSEEK_BASE_URL", global = true)]
    base_url: Option<Url>,

    /// Bearer token for authenticated requests
    #[arg(long, env = "TAWSEEK_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Language of messages sent back by the server and printed here (ar, en)
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// Preferences file
    #[arg(long, env = "TAWSEEK_PREFERENCES", global = true)]
    preferences: Option<PathBuf>,

    #[command(subcommand)]
    subcommand: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the startup checks and load the lookup lists
    Landing(commands::landing::Args),
    /// List offices, optionally filtered and sorted by distance
    ListOffices(commands::list_offices::Args),
    /// List governments
    ListGovernments(commands::list_governments::Args),
    /// List the transaction classifications of an office
    Classifications(commands::classifications::Args),
    /// List the transaction types of a classification
    Types(commands::types::Args),
    /// Show the available dates and slots of an office
    OfficeAgenda(commands::office_agenda::Args),
    /// Book an appointment
    Book(commands::book::Args),
    /// Look up the reservations of a national ID
    Inquire(commands::inquire::Args),
    /// Show or change stored preferences
    Prefs(commands::prefs::Args),
}

#[tokio::main]
async fn main() -> anyhow::Result<commands::ExitCode> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.base_url, cli.token, cli.lang, cli.preferences).await?;

    Ok(match cli.subcommand {
        Commands::Landing(args) => commands::landing::main(&ctx, args).await?,
        Commands::ListOffices(args) => commands::list_offices::main(&ctx, args).await?,
        Commands::ListGovernments(args) => commands::list_governments::main(&ctx, args).await?,
        Commands::Classifications(args) => commands::classifications::main(&ctx, args).await?,
        Commands::Types(args) => commands::types::main(&ctx, args).await?,
        Commands::OfficeAgenda(args) => commands::office_agenda::main(&ctx, args).await?,
        Commands::Book(args) => commands::book::main(&ctx, args).await?,
        Commands::Inquire(args) => commands::inquire::main(&ctx, args).await?,
        Commands::Prefs(args) => commands::prefs::main(&ctx, args).await?,
    })
}
