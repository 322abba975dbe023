use axum::{
    http::StatusCode,
    response::{IntoResponse, Response}
};
use anyhow;

use wallet::{WalletError, backend::BackendError};

#[derive(Debug)]
pub(crate) enum ServerError{
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    InternalError(anyhow::Error)
}

impl ServerError {
    fn from_wallet(err: WalletError) -> Self {
        match err {
            WalletError::AccountNotFound
            | WalletError::PaymentNotFound
            | WalletError::FavoriteNotFound => Self::NotFound(err.to_string()),
            WalletError::PhoneAlreadyRegistered
            | WalletError::FavoriteAlreadyRegistered
            | WalletError::PaymentAlreadyFinalized => Self::Conflict(err.to_string()),
            WalletError::AmountMustBePositive
            | WalletError::InsufficientBalance
            | WalletError::BalanceOverflow => Self::Unprocessable(err.to_string()),
        }
    }

    fn from_backend(err: BackendError) -> Self {
        match err {
            BackendError::Wallet(err) => Self::from_wallet(err),
            err @ BackendError::MinRecordsRequired => Self::Unprocessable(err.to_string()),
            err @ BackendError::Io(_) => Self::InternalError(err.into()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(msg) =>
                (StatusCode::NOT_FOUND, format!("Resource not found: {}", msg)).into_response(),
            Self::Conflict(msg) =>
                (StatusCode::CONFLICT, format!("Conflict: {}", msg)).into_response(),
            Self::Unprocessable(msg) =>
                (StatusCode::UNPROCESSABLE_ENTITY, format!("Rejected: {}", msg)).into_response(),
            Self::InternalError(err) =>
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", err)).into_response()
        }
    }
}

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>
{
    fn from(err: E) -> Self {
        let err = err.into();
        let err = match err.downcast::<WalletError>() {
            Ok(wallet_err) => return Self::from_wallet(wallet_err),
            Err(err) => err,
        };
        match err.downcast::<BackendError>() {
            Ok(backend_err) => Self::from_backend(backend_err),
            Err(err) => Self::InternalError(err),
        }
    }
}
