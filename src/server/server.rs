mod server_config;
mod error;

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use server_config::AppConfig;
use error::ServerError;
use wallet::{Wallet, Account, Payment, Favorite, AccountId, Money, backend::history_to_files};

const SERVER_CONFIG: &str = "resources/server.toml";

/// The wallet is only ever touched by one request at a time.
#[derive(Clone)]
struct AppState {
    wallet: Arc<Mutex<Wallet>>,
    config: Arc<AppConfig>,
}

impl AppState {
    fn new(wallet: Wallet, config: AppConfig) -> Self {
        AppState { wallet: Arc::new(Mutex::new(wallet)), config: Arc::new(config) }
    }

    fn wallet(&self) -> Result<MutexGuard<'_, Wallet>, ServerError> {
        self.wallet.lock()
            .map_err(|_| ServerError::InternalError(anyhow::anyhow!("wallet lock poisoned")))
    }
}

type JsonResult<T> = Result<Json<T>, ServerError>;

#[derive(Deserialize)]
struct NewAccount {
    phone: String,
}

#[derive(Deserialize)]
struct NewDeposit {
    amount: Money,
}

#[derive(Deserialize)]
struct NewPayment {
    amount: Money,
    category: String,
}

#[derive(Deserialize)]
struct NewFavorite {
    name: String,
}

async fn register_account(State(state): State<AppState>, Json(body): Json<NewAccount>) -> JsonResult<Account> {
    let mut wallet = state.wallet()?;
    Ok(Json(wallet.register_account(&body.phone)?.clone()))
}

async fn list_accounts(State(state): State<AppState>) -> JsonResult<Vec<Account>> {
    let wallet = state.wallet()?;
    Ok(Json(wallet.accounts().cloned().collect()))
}

async fn get_account(State(state): State<AppState>, Path(account_id): Path<AccountId>) -> JsonResult<Account> {
    let wallet = state.wallet()?;
    Ok(Json(wallet.find_account_by_id(account_id)?.clone()))
}

async fn deposit(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Json(body): Json<NewDeposit>,
) -> JsonResult<Account> {
    let mut wallet = state.wallet()?;
    wallet.deposit(account_id, body.amount)?;
    Ok(Json(wallet.find_account_by_id(account_id)?.clone()))
}

async fn pay(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Json(body): Json<NewPayment>,
) -> JsonResult<Payment> {
    let mut wallet = state.wallet()?;
    Ok(Json(wallet.pay(account_id, body.amount, &body.category)?.clone()))
}

async fn account_history(State(state): State<AppState>, Path(account_id): Path<AccountId>) -> JsonResult<Vec<Payment>> {
    let wallet = state.wallet()?;
    Ok(Json(wallet.export_account_history(account_id)?))
}

/// Pages the account's history into `<dump_dir>/history/<account id>/`.
async fn write_history(State(state): State<AppState>, Path(account_id): Path<AccountId>) -> JsonResult<Vec<String>> {
    let payments = state.wallet()?.export_account_history(account_id)?;
    let storage = &state.config.storage;
    let dir = storage.dump_dir.join("history").join(account_id.to_string());

    let paths = history_to_files(&payments, &dir, storage.history_records)?;
    Ok(Json(paths.iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()))
}

async fn get_payment(State(state): State<AppState>, Path(payment_id): Path<String>) -> JsonResult<Payment> {
    let wallet = state.wallet()?;
    Ok(Json(wallet.find_payment_by_id(&payment_id)?.clone()))
}

async fn reject_payment(State(state): State<AppState>, Path(payment_id): Path<String>) -> JsonResult<Payment> {
    let mut wallet = state.wallet()?;
    wallet.reject(&payment_id)?;
    Ok(Json(wallet.find_payment_by_id(&payment_id)?.clone()))
}

async fn repeat_payment(State(state): State<AppState>, Path(payment_id): Path<String>) -> JsonResult<Payment> {
    let mut wallet = state.wallet()?;
    Ok(Json(wallet.repeat(&payment_id)?.clone()))
}

async fn favorite_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Json(body): Json<NewFavorite>,
) -> JsonResult<Favorite> {
    let mut wallet = state.wallet()?;
    Ok(Json(wallet.favorite_payment(&payment_id, &body.name)?.clone()))
}

async fn get_favorite(State(state): State<AppState>, Path(favorite_id): Path<String>) -> JsonResult<Favorite> {
    let wallet = state.wallet()?;
    Ok(Json(wallet.find_favorite_by_id(&favorite_id)?.clone()))
}

async fn pay_from_favorite(State(state): State<AppState>, Path(favorite_id): Path<String>) -> JsonResult<Payment> {
    let mut wallet = state.wallet()?;
    Ok(Json(wallet.pay_from_favorite(&favorite_id)?.clone()))
}

async fn export(State(state): State<AppState>) -> JsonResult<Value> {
    let wallet = state.wallet()?;
    wallet.export(&state.config.storage.dump_dir)?;
    Ok(Json(json!({
        "accounts": wallet.num_accounts(),
        "payments": wallet.num_payments(),
        "favorites": wallet.num_favorites(),
    })))
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/accounts", get(list_accounts).post(register_account))
        .route("/accounts/:id", get(get_account))
        .route("/accounts/:id/deposit", post(deposit))
        .route("/accounts/:id/payments", get(account_history).post(pay))
        .route("/accounts/:id/history", post(write_history))
        .route("/payments/:id", get(get_payment))
        .route("/payments/:id/reject", post(reject_payment))
        .route("/payments/:id/repeat", post(repeat_payment))
        .route("/payments/:id/favorite", post(favorite_payment))
        .route("/favorites/:id", get(get_favorite))
        .route("/favorites/:id/pay", post(pay_from_favorite))
        .route("/export", post(export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| SERVER_CONFIG.to_owned());
    let config = AppConfig::read(&config_path)?;

    let mut wallet = Wallet::new();
    wallet.import(&config.storage.dump_dir)
        .with_context(|| format!("failed to import {}", config.storage.dump_dir.display()))?;
    info!("loaded {} accounts from {}", wallet.num_accounts(), config.storage.dump_dir.display());

    let listener = tokio::net::TcpListener::bind(config.bind).await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("listening on {}", config.bind);
    axum::serve(listener, app(AppState::new(wallet, config))).await?;
    Ok(())
}
