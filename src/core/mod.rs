pub mod error;
pub mod registry;
pub mod account;
pub mod payment;
pub mod favorite;
pub mod wallet;

pub use error::{WalletError, WalletResult};
pub use account::{Account, AccountId, Money, Phone};
pub use payment::{Payment, PaymentCategory, PaymentStatus};
pub use favorite::Favorite;
pub use wallet::Wallet;
