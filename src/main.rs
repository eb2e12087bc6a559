use clap::{Args, Parser, Subcommand};
use miette::Result;
use pocketbank::{AccountId, Backend, BankContext, Config, telemetry};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the account data and settings.json
    #[arg(long, env = "POCKETBANK_DATA_DIR", default_value = ".pocketbank", global = true)]
    data_dir: PathBuf,

    /// Storage backend; overrides settings.json and POCKETBANK_BACKEND
    #[arg(long, value_enum, global = true)]
    backend: Option<Backend>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Credentials {
    /// Account owner name
    #[arg(long)]
    name: String,

    /// Account secret
    #[arg(long, env = "POCKETBANK_SECRET", hide_env_values = true)]
    secret: String,
}

#[derive(Subcommand)]
enum Command {
    /// Open a new account
    Register {
        #[command(flatten)]
        credentials: Credentials,

        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        opening_balance: Decimal,
    },
    /// Check credentials and show the account number and balance
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Add funds to the account
    Deposit {
        #[command(flatten)]
        credentials: Credentials,

        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Take funds out of the account
    Withdraw {
        #[command(flatten)]
        credentials: Credentials,

        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Move funds to another account number
    Transfer {
        #[command(flatten)]
        credentials: Credentials,

        /// Destination account number
        #[arg(long)]
        to: u64,

        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Show the current balance
    Balance {
        #[command(flatten)]
        credentials: Credentials,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json);

    let mut config = Config::load(&cli.data_dir)?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    let bank = BankContext::open(&config)?;

    match cli.command {
        Command::Register {
            credentials,
            opening_balance,
        } => {
            let id = bank
                .credentials
                .register(&credentials.name, &credentials.secret, opening_balance)
                .await?;
            println!("registered account {id}");
        }
        Command::Login { credentials } => {
            let account = bank
                .credentials
                .authenticate(&credentials.name, &credentials.secret)
                .await?;
            println!("account {} balance {}", account.id, account.balance);
        }
        Command::Deposit {
            credentials,
            amount,
        } => {
            let mut account = bank
                .credentials
                .authenticate(&credentials.name, &credentials.secret)
                .await?;
            let balance = bank.ledger.deposit(&mut account, amount).await?;
            println!("balance {balance}");
        }
        Command::Withdraw {
            credentials,
            amount,
        } => {
            let mut account = bank
                .credentials
                .authenticate(&credentials.name, &credentials.secret)
                .await?;
            let balance = bank.ledger.withdraw(&mut account, amount).await?;
            println!("balance {balance}");
        }
        Command::Transfer {
            credentials,
            to,
            amount,
        } => {
            let mut account = bank
                .credentials
                .authenticate(&credentials.name, &credentials.secret)
                .await?;
            let receipt = bank
                .ledger
                .transfer(&mut account, AccountId(to), amount)
                .await?;
            println!(
                "transferred {} from {} to {}",
                receipt.amount, receipt.source, receipt.destination
            );
            println!("balance {}", receipt.source_balance);
        }
        Command::Balance { credentials } => {
            let account = bank
                .credentials
                .authenticate(&credentials.name, &credentials.secret)
                .await?;
            let balance = bank.ledger.current_balance(&account).await?;
            println!("balance {balance}");
        }
    }

    Ok(())
}
