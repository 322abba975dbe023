use wallet::{Wallet, Account, Payment, PaymentStatus, AccountId, Money,
    backend::history_to_files};

use std::path::PathBuf;
use anyhow::Context;
use colored::Colorize;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Dump directory the wallet is imported from and exported back to
    #[clap(value_parser)]
    dir: PathBuf,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Register a new account
    Register(Register),
    /// Deposit money into an account
    Deposit(Deposit),
    /// Pay from an account
    Pay(Pay),
    /// Reject a payment, returning its amount to the account
    Reject(PaymentRef),
    /// Make a payment again
    Repeat(PaymentRef),
    /// Save a payment as a named favorite
    Favorite(FavoritePayment),
    /// Pay using a favorite
    PayFavorite(FavoriteRef),
    /// List accounts and balances
    Accounts,
    /// List all payments
    Payments,
    /// List favorites
    Favorites,
    /// Write the payment history of an account into paged dump files
    History(History),
    /// Write all accounts into a single pipe-separated file
    ExportFlat(FlatPath),
    /// Register the accounts listed in a pipe-separated file
    ImportFlat(FlatPath),
}

impl Subcommands {
    fn mutates(&self) -> bool {
        !matches!(self, Self::Accounts | Self::Payments | Self::Favorites | Self::History(_) | Self::ExportFlat(_))
    }
}

#[derive(Args, Debug)]
struct Register {
    /// Phone number of the account holder
    #[clap(value_parser)]
    phone: String
}

#[derive(Args, Debug)]
struct Deposit {
    #[clap(short='a', long, value_parser)]
    account: AccountId,

    /// Amount in minor units
    #[clap(short='m', long, value_parser)]
    amount: Money,
}

#[derive(Args, Debug)]
struct Pay {
    #[clap(short='a', long, value_parser)]
    account: AccountId,

    /// Amount in minor units
    #[clap(short='m', long, value_parser)]
    amount: Money,

    #[clap(short='c', long, value_parser)]
    category: String,
}

#[derive(Args, Debug)]
struct PaymentRef {
    #[clap(value_parser)]
    payment: String,
}

#[derive(Args, Debug)]
struct FavoritePayment {
    #[clap(value_parser)]
    payment: String,

    /// Name of the new favorite
    #[clap(short='n', long, value_parser)]
    name: String,
}

#[derive(Args, Debug)]
struct FavoriteRef {
    #[clap(value_parser)]
    favorite: String,
}

#[derive(Args, Debug)]
struct History {
    #[clap(short='a', long, value_parser)]
    account: AccountId,

    /// Directory to write the history files into
    #[clap(short='o', long, value_parser)]
    out: PathBuf,

    /// Maximum number of payments per file
    #[clap(short='r', long, value_parser, default_value_t = 100)]
    records: usize,
}

#[derive(Args, Debug)]
struct FlatPath {
    #[clap(value_parser)]
    path: PathBuf,
}

fn print_account(account: &Account) {
    let balance = if account.balance > 0 {
        account.balance.to_string().green()
    } else {
        account.balance.to_string().normal()
    };
    println!("{}: {}", account, balance);
}

fn print_payment(payment: &Payment) {
    let status = match payment.status {
        PaymentStatus::Fail => payment.status.to_string().bright_red(),
        PaymentStatus::Ok => payment.status.to_string().green(),
        PaymentStatus::InProgress => payment.status.to_string().yellow(),
    };
    println!("{}: #{} {} {} {}", payment.id, payment.account_id, payment.amount, payment.category, status);
}

fn run(wallet: &mut Wallet, action: Subcommands) -> anyhow::Result<()> {
    match action {
        Subcommands::Register(register) => {
            print_account(wallet.register_account(&register.phone)?);
        },
        Subcommands::Deposit(deposit) => {
            wallet.deposit(deposit.account, deposit.amount)?;
            print_account(wallet.find_account_by_id(deposit.account)?);
        },
        Subcommands::Pay(pay) => {
            print_payment(wallet.pay(pay.account, pay.amount, &pay.category)?);
        },
        Subcommands::Reject(reject) => {
            wallet.reject(&reject.payment)?;
            print_payment(wallet.find_payment_by_id(&reject.payment)?);
        },
        Subcommands::Repeat(repeat) => {
            print_payment(wallet.repeat(&repeat.payment)?);
        },
        Subcommands::Favorite(favorite) => {
            println!("{}", wallet.favorite_payment(&favorite.payment, &favorite.name)?);
        },
        Subcommands::PayFavorite(favorite) => {
            print_payment(wallet.pay_from_favorite(&favorite.favorite)?);
        },
        Subcommands::Accounts => {
            wallet.accounts().for_each(print_account);
        },
        Subcommands::Payments => {
            wallet.payments().for_each(print_payment);
        },
        Subcommands::Favorites => {
            for favorite in wallet.favorites() {
                println!("{}", favorite);
            }
        },
        Subcommands::History(history) => {
            let payments = wallet.export_account_history(history.account)?;
            for path in history_to_files(&payments, &history.out, history.records)? {
                println!("{}", path.display());
            }
        },
        Subcommands::ExportFlat(flat) => {
            wallet.export_to_file(&flat.path)
                .with_context(|| format!("failed to export accounts to {}", flat.path.display()))?;
        },
        Subcommands::ImportFlat(flat) => {
            wallet.import_from_file(&flat.path)
                .with_context(|| format!("failed to import accounts from {}", flat.path.display()))?;
        },
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let mut wallet = Wallet::new();
    wallet.import(&args.dir)
        .with_context(|| format!("failed to import {}", args.dir.display()))?;

    let mutates = args.action.mutates();
    run(&mut wallet, args.action)?;

    if mutates {
        wallet.export(&args.dir)
            .with_context(|| format!("failed to export {}", args.dir.display()))?;
    }
    Ok(())
}
