use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WalletError {
    /// Occurs when registering a phone that already
    /// belongs to an account.
    #[error("phone already registered")]
    PhoneAlreadyRegistered,
    /// Occurs when a favorite name is already taken.
    #[error("favorite already registered")]
    FavoriteAlreadyRegistered,
    #[error("amount must be greater than zero")]
    AmountMustBePositive,
    #[error("account not found")]
    AccountNotFound,
    /// Occurs when a payment would drive a balance below zero.
    #[error("not enough balance")]
    InsufficientBalance,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("favorite not found")]
    FavoriteNotFound,
    /// Occurs when a credit would push a balance
    /// past the largest representable amount.
    #[error("balance overflow")]
    BalanceOverflow,
    /// Occurs when rejecting a payment that is no longer in progress,
    /// e.g. one that was already rejected.
    #[error("payment already finalized")]
    PaymentAlreadyFinalized,
}

pub type WalletResult<T> = Result<T, WalletError>;
