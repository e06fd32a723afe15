//! bankdesk CLI - Teller for a toy banking backend
//!
//! Deposit, withdraw and check balances from the terminal, either through an
//! interactive menu or one command at a time.

mod config;
mod prompt;

use anyhow::{bail, Context, Result};
use bankdesk::{Action, HttpAccountService, StatusKind, StatusMessage, Teller};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Select};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config::Config;
use prompt::CliPrompt;

#[derive(Parser)]
#[command(name = "bankdesk")]
#[command(about = "bankdesk - deposit, withdraw and check balances", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config and BANKDESK_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// How to answer "create a new account?" without a terminal
#[derive(clap::Args, Clone, Copy)]
struct CreateFlags {
    /// Create the account if it does not exist
    #[arg(short, long, conflicts_with = "no_create")]
    yes: bool,
    /// Never create a missing account
    #[arg(long)]
    no_create: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Interactive,

    /// Deposit into an account
    Deposit {
        account: String,
        #[arg(value_parser = finite_amount)]
        amount: Option<f64>,
        #[command(flatten)]
        create: CreateFlags,
    },

    /// Withdraw from an account
    Withdraw {
        account: String,
        #[arg(value_parser = finite_amount)]
        amount: Option<f64>,
        #[command(flatten)]
        create: CreateFlags,
    },

    /// Show an account's balance
    Balance {
        account: String,
        #[command(flatten)]
        create: CreateFlags,
    },

    /// List ledger rows, newest first
    History {
        /// Only rows for this account
        #[arg(short, long)]
        account: Option<String>,
        /// Max rows
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Check that the backend is reachable
    Ping,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the backend base URL
    SetUrl { url: String },
    /// Set the request timeout in seconds
    SetTimeout { secs: u64 },
    /// Answer the creation prompt automatically: yes, no or ask
    SetAutoCreate { answer: String },
}

type CliTeller = Teller<HttpAccountService, CliPrompt>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_url = cli.base_url.as_deref();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => cmd_interactive(base_url).await,
        Commands::Deposit {
            account,
            amount,
            create,
        } => cmd_submit(base_url, Action::Deposit, account, amount, create).await,
        Commands::Withdraw {
            account,
            amount,
            create,
        } => cmd_submit(base_url, Action::Withdraw, account, amount, create).await,
        Commands::Balance { account, create } => {
            cmd_submit(base_url, Action::ViewBalance, account, None, create).await
        }
        Commands::History { account, limit } => {
            cmd_history(base_url, account.as_deref(), limit).await
        }
        Commands::Ping => cmd_ping(base_url).await,
        Commands::Config { action } => cmd_config(base_url, action.unwrap_or(ConfigAction::Show)),
    }
}

fn build_teller(config: &Config, base_url: Option<&str>, prompt: CliPrompt) -> Result<CliTeller> {
    let url = config.resolve_base_url(base_url);
    let service = HttpAccountService::with_timeout(&url, config.timeout())
        .context("Failed to set up HTTP client")?;
    Ok(Teller::new(Arc::new(service), prompt))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_submit(
    base_url: Option<&str>,
    action: Action,
    account: String,
    amount: Option<f64>,
    create: CreateFlags,
) -> Result<()> {
    let config = Config::load()?;
    let prompt = CliPrompt::from_flags(create.yes, create.no_create, config.auto_create);
    let mut teller = build_teller(&config, base_url, prompt)?;

    teller.select_action(action)?;
    teller.set_account_number(account);
    teller.set_amount(amount);

    let status = teller.submit().await?;
    print_status(&status);

    Ok(())
}

async fn cmd_interactive(base_url: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let prompt = CliPrompt::from_flags(false, false, config.auto_create);
    let mut teller = build_teller(&config, base_url, prompt)?;

    const MENU: [&str; 5] = ["Deposit", "Withdraw", "View Balance", "History", "Quit"];

    println!("{}", "bankdesk".bold());

    loop {
        let choice = Select::new()
            .with_prompt("Choose an action")
            .items(&MENU)
            .default(0)
            .interact_opt()
            .context("Failed to read selection")?;

        let action = match choice {
            Some(i) if i < Action::ALL.len() => Action::ALL[i],
            Some(3) => {
                let account = read_account_number()?;
                let filter = (!account.is_empty()).then_some(account.as_str());
                print_history(&teller, filter, 20).await?;
                continue;
            }
            _ => break,
        };

        teller.select_action(action)?;
        println!("\n{}", action.to_string().cyan().bold());

        teller.set_account_number(read_account_number()?);
        if action.needs_amount() {
            teller.set_amount(read_amount()?);
        }

        let status = submit_with_progress(&mut teller).await?;
        print_status(&status);
        println!();
    }

    Ok(())
}

/// Submit while echoing the teller's submit label whenever it turns busy
async fn submit_with_progress(teller: &mut CliTeller) -> Result<StatusMessage> {
    let mut phase = teller.subscribe();
    let submit = teller.submit();
    tokio::pin!(submit);

    loop {
        tokio::select! {
            status = &mut submit => return Ok(status?),
            Ok(()) = phase.changed() => {
                let current = *phase.borrow_and_update();
                if current.is_busy() {
                    println!("{}", current.submit_label().dimmed());
                }
            }
        }
    }
}

fn read_account_number() -> Result<String> {
    let account: String = Input::new()
        .with_prompt("Account Number")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read account number")?;
    Ok(account.trim().to_string())
}

/// Blank input means "no amount"
fn read_amount() -> Result<Option<f64>> {
    let raw: String = Input::new()
        .with_prompt("Amount")
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &'static str> {
            match parse_amount(input) {
                Ok(_) => Ok(()),
                Err(_) => Err("Enter a number"),
            }
        })
        .interact_text()
        .context("Failed to read amount")?;

    parse_amount(&raw)
}

fn parse_amount(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let amount = trimmed
        .parse::<f64>()
        .with_context(|| format!("Invalid amount: {}", trimmed))?;
    if !amount.is_finite() {
        bail!("Invalid amount: {}", trimmed);
    }
    Ok(Some(amount))
}

/// clap parser for the amount argument
fn finite_amount(raw: &str) -> std::result::Result<f64, String> {
    match parse_amount(raw) {
        Ok(Some(amount)) => Ok(amount),
        Ok(None) => Err("amount is empty".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

async fn cmd_history(base_url: Option<&str>, account: Option<&str>, limit: usize) -> Result<()> {
    let config = Config::load()?;
    let teller = build_teller(&config, base_url, CliPrompt::from_flags(false, true, None))?;
    print_history(&teller, account, limit).await
}

async fn print_history(teller: &CliTeller, account: Option<&str>, limit: usize) -> Result<()> {
    let records = teller
        .history(account)
        .await
        .context("Failed to fetch transactions")?;

    if records.is_empty() {
        match account {
            Some(a) => println!("No transactions for account {}", a.cyan()),
            None => println!("No transactions found."),
        }
        return Ok(());
    }

    println!("{}", "Transactions:".bold());
    for record in records.iter().take(limit) {
        let signed = record.signed_amount();
        let amount = if signed < 0.0 {
            format!("{:>12.2}", signed).red()
        } else {
            format!("{:>12.2}", signed).green()
        };

        println!(
            "  {} {} {:<8} {} {}",
            format!("#{}", record.id).dimmed(),
            record.transaction_date.format("%Y-%m-%d %H:%M:%S"),
            record.account_number.cyan(),
            amount,
            record.transaction_type.dimmed()
        );
    }

    if records.len() > limit {
        println!("  {}", format!("... {} more", records.len() - limit).dimmed());
    }

    Ok(())
}

async fn cmd_ping(base_url: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let url = config.resolve_base_url(base_url);
    let teller = build_teller(&config, base_url, CliPrompt::from_flags(false, true, None))?;

    print!("Testing connection to {}... ", url);

    match teller.ping().await {
        Ok(welcome) => {
            println!("{}", "OK".green());
            println!("  {}", welcome.trim().dimmed());
            Ok(())
        }
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not reach the bank API: {}", e);
        }
    }
}

fn print_status(status: &StatusMessage) {
    if status.is_empty() {
        return;
    }

    let line = match status.kind {
        StatusKind::Success => status.text().green(),
        StatusKind::Error => status.text().red(),
        StatusKind::Info => status.text().normal(),
    };
    println!("{}", line);
}

fn cmd_config(base_url: Option<&str>, action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!("  Base URL: {}", config.resolve_base_url(base_url));
            println!("  Timeout: {}s", config.timeout_secs);
            println!(
                "  Create missing accounts: {}",
                match config.auto_create {
                    Some(true) => "yes".green(),
                    Some(false) => "no".red(),
                    None => "ask".cyan(),
                }
            );
        }

        ConfigAction::SetUrl { url } => {
            config.set_base_url(url);
            config.save()?;
            println!("{} Base URL set to {}", "✓".green(), config.base_url);
        }

        ConfigAction::SetTimeout { secs } => {
            if secs == 0 {
                bail!("Timeout must be at least 1 second");
            }
            config.set_timeout(secs);
            config.save()?;
            println!("{} Timeout set to {}s", "✓".green(), secs);
        }

        ConfigAction::SetAutoCreate { answer } => {
            config.auto_create = match answer.to_lowercase().as_str() {
                "yes" | "true" => Some(true),
                "no" | "false" => Some(false),
                "ask" => None,
                other => bail!("Expected yes, no or ask, got '{}'", other),
            };
            config.save()?;
            println!("{} Create missing accounts: {}", "✓".green(), answer);
        }
    }

    Ok(())
}
