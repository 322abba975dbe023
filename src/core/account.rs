use std::fmt;

use serde::{Serialize, Deserialize};

use crate::core::registry::Keyed;

/// Amount of money in minor currency units (e.g. cents).
pub type Money = i64;
pub type AccountId = i64;
pub type Phone = String;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub phone: Phone,
    pub balance: Money,
}

impl Account {
    pub fn new(id: AccountId, phone: &str) -> Account {
        Account { id, phone: phone.to_owned(), balance: 0 }
    }
}

impl Keyed for Account {
    type Key = AccountId;
    fn key(&self) -> &AccountId {
        &self.id
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.phone)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account #{} {} ({})", self.id, self.phone, self.balance)
    }
}
