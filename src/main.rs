// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;
use std::fs::{self, OpenOptions};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use rala_bank::{format_currency, BankClient, ClientConfig, Session};

fn main() -> Result<()> {
    let config = ClientConfig::from_env().context("invalid configuration")?;
    init_logging(&config)?;

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("balance") => run_balance(&config)?,
        Some("transactions") => run_transactions(&config)?,
        Some(other) => bail!("unknown command '{other}' (expected: balance, transactions)"),
        // UI mode (default)
        None => run_ui_mode(&config)?,
    }

    Ok(())
}

/// Logs go to a file so they never draw over the terminal UI
fn init_logging(config: &ClientConfig) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();

    Ok(())
}

fn session_from(config: &ClientConfig) -> Result<Session> {
    match config.token.as_deref() {
        Some(token) if !token.is_empty() => Ok(Session::new(token, None)),
        _ => bail!("RALA_TOKEN is not set; sign in first"),
    }
}

fn run_balance(config: &ClientConfig) -> Result<()> {
    let session = session_from(config)?;
    let client = BankClient::new(config)?;
    let rt = Runtime::new()?;

    let balance = rt
        .block_on(client.fetch_balance(&session.token))
        .context("Não foi possível carregar seu saldo")?;

    println!("💰 Saldo: {}", format_currency(balance));
    Ok(())
}

fn run_transactions(config: &ClientConfig) -> Result<()> {
    let session = session_from(config)?;
    let client = BankClient::new(config)?;
    let rt = Runtime::new()?;

    let transactions = rt
        .block_on(client.fetch_transactions(&session.token))
        .context("Não foi possível carregar suas transações")?;

    if transactions.is_empty() {
        println!("Nenhuma transação encontrada");
        return Ok(());
    }

    println!("📊 {} transações", transactions.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for tx in &transactions {
        println!(
            "{} {}  {:<30}  {:<24}  {}",
            tx.direction().arrow(),
            tx.display_date(),
            tx.description,
            tx.counterparty_label(),
            tx.signed_amount()
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &ClientConfig) -> Result<()> {
    use rala_bank::SqliteFlagStore;

    let store = SqliteFlagStore::open(&config.flag_store_path())
        .with_context(|| format!("failed to open {}", config.flag_store_path().display()))?;
    let client = BankClient::new(config)?;
    let session = Session::new(config.token.clone().unwrap_or_default(), None);

    let mut app = ui::App::new(client, store, session)?;
    ui::run_ui(&mut app)?;

    println!("\n✅ Até logo!");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &ClientConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: rala balance | rala transactions");
    std::process::exit(1);
}
