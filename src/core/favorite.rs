use std::fmt;

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::core::account::{AccountId, Money};
use crate::core::payment::{Payment, PaymentCategory};
use crate::core::registry::Keyed;

/// A named template of a payment's account, amount and category.
/// It is a copy, so later changes to the source payment don't reach it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub account_id: AccountId,
    pub name: String,
    pub amount: Money,
    pub category: PaymentCategory,
}

impl Favorite {
    pub fn from_payment(payment: &Payment, name: &str) -> Favorite {
        Favorite {
            id: Uuid::new_v4().to_string(),
            account_id: payment.account_id,
            name: name.to_owned(),
            amount: payment.amount,
            category: payment.category.clone(),
        }
    }
}

impl Keyed for Favorite {
    type Key = String;
    fn key(&self) -> &String {
        &self.id
    }
}

impl fmt::Display for Favorite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): #{} pays {} for {}",
            self.name, self.id, self.account_id, self.amount, self.category)
    }
}
