use anyhow::Result;
use clap::{Parser, Subcommand};
use tally_core::LedgerStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod state;
mod telegram;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Telegram bot that records income and expenses into a spreadsheet"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the bot (default when no command is given)
    Run,

    /// Inspect or create ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Ledger diagnostics
    Ledger {
        #[command(subcommand)]
        command: LedgerCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum LedgerCommand {
    /// Connect to the configured ledger and print its row count
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let cfg = config::load_config()?;
            bot::run(&cfg).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg)?);
            }
        },

        Command::Ledger { command } => match command {
            LedgerCommand::Check => {
                let cfg = config::load_config()?;
                let ledger = bot::open_ledger(&cfg.ledger).await?;
                let rows = ledger.row_count().await?;
                println!("Ledger OK: {} transactions, next id {}", rows, rows + 1);
            }
        },
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info,tally_core=info,tally_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
