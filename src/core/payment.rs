use std::{fmt, str::FromStr};

use serde::{Serialize, Deserialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::account::{AccountId, Money};
use crate::core::registry::Keyed;

pub type PaymentCategory = String;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "INPROGRESS")]
    InProgress,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::InProgress => "INPROGRESS",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown payment status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(Self::Ok),
            "FAIL" => Ok(Self::Fail),
            "INPROGRESS" => Ok(Self::InProgress),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub account_id: AccountId,
    pub amount: Money,
    pub category: PaymentCategory,
    pub status: PaymentStatus,
}

impl Payment {
    /// A fresh in-progress payment under a newly generated id.
    pub fn new(account_id: AccountId, amount: Money, category: &str) -> Payment {
        Payment {
            id: Uuid::new_v4().to_string(),
            account_id,
            amount,
            category: category.to_owned(),
            status: PaymentStatus::InProgress,
        }
    }
}

impl Keyed for Payment {
    type Key = String;
    fn key(&self) -> &String {
        &self.id
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: #{} paid {} for {} [{}]",
            self.id, self.account_id, self.amount, self.category, self.status)
    }
}
