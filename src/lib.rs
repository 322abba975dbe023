mod core;
pub mod backend;

pub use crate::core::{Wallet, WalletError, WalletResult};
pub use crate::core::{Account, AccountId, Money, Phone};
pub use crate::core::{Payment, PaymentCategory, PaymentStatus, Favorite};
pub use crate::core::{account, payment, favorite, registry, wallet};
