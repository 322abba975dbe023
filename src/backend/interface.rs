use thiserror::Error;

use crate::core::{Wallet, WalletError};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A record could be read but not applied to the wallet.
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("write at least 1 record")]
    MinRecordsRequired,
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// A place a wallet can be saved to and loaded back from.
pub trait WalletStore {
    /// Merges the stored state into `wallet`.
    fn load_into(&self, wallet: &mut Wallet) -> Result<()>;
    fn save(&self, wallet: &Wallet) -> Result<()>;
}
