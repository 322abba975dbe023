//! Line encoding of wallet entities.
//!
//! Every entity is written as its fields in declaration order, joined by
//! [`FIELD_SEPARATOR`]. Field values are not escaped.
//!
//! Reading is lenient: records with fewer than [`MIN_FIELDS`] fields
//! (blank lines left by a trailing newline, mostly) are skipped silently,
//! other records that fail to decode are skipped with a warning.

use std::str::FromStr;

use log::warn;
use thiserror::Error;

use crate::core::{Account, Favorite, Payment, PaymentStatus};

pub const FIELD_SEPARATOR: char = ';';
pub const MIN_FIELDS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("too few fields: {0}")]
    TooShort(usize),
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

pub trait Record: Sized {
    /// Name of the record kind, also the stem of its dump file.
    const KIND: &'static str;
    const NUM_FIELDS: usize;

    fn fields(&self) -> Vec<String>;
    fn from_fields(fields: &[&str]) -> Result<Self, DecodeError>;

    fn encode(&self) -> String {
        let separator = FIELD_SEPARATOR.to_string();
        self.fields().join(separator.as_str())
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < MIN_FIELDS {
            return Err(DecodeError::TooShort(fields.len()));
        }
        if fields.len() != Self::NUM_FIELDS {
            return Err(DecodeError::FieldCount { expected: Self::NUM_FIELDS, found: fields.len() });
        }
        Self::from_fields(&fields)
    }
}

/// Encodes each record followed by `terminator`.
pub fn encode_all<'a, T, I>(records: I, terminator: char) -> String
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut text = String::new();
    for record in records {
        text.push_str(&record.encode());
        text.push(terminator);
    }
    return text;
}

/// Decodes every record in `text`, split on `separator`,
/// skipping what can't be decoded. A trailing `\r` is dropped
/// from each record, so CRLF dumps read the same as LF ones.
pub fn decode_all<T: Record>(text: &str, separator: char) -> Vec<T> {
    text.split(separator)
        .map(|line| line.trim_end_matches('\r'))
        .filter_map(|line| match T::decode(line) {
            Ok(record) => Some(record),
            Err(DecodeError::TooShort(_)) => None,
            Err(err) => {
                warn!("skipping {} record {:?}: {}", T::KIND, line, err);
                None
            }
        })
        .collect()
}

fn parse<T: FromStr>(field: &'static str, value: &str) -> Result<T, DecodeError> {
    value.parse()
        .map_err(|_| DecodeError::InvalidField { field, value: value.to_owned() })
}

impl Record for Account {
    const KIND: &'static str = "accounts";
    const NUM_FIELDS: usize = 3;

    fn fields(&self) -> Vec<String> {
        vec![self.id.to_string(), self.phone.clone(), self.balance.to_string()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, DecodeError> {
        Ok(Account {
            id: parse("account id", fields[0])?,
            phone: fields[1].to_owned(),
            balance: parse("balance", fields[2])?,
        })
    }
}

impl Record for Payment {
    const KIND: &'static str = "payments";
    const NUM_FIELDS: usize = 5;

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.account_id.to_string(),
            self.amount.to_string(),
            self.category.clone(),
            self.status.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, DecodeError> {
        Ok(Payment {
            id: fields[0].to_owned(),
            account_id: parse("account id", fields[1])?,
            amount: parse("amount", fields[2])?,
            category: fields[3].to_owned(),
            status: parse::<PaymentStatus>("status", fields[4])?,
        })
    }
}

impl Record for Favorite {
    const KIND: &'static str = "favorites";
    const NUM_FIELDS: usize = 5;

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.account_id.to_string(),
            self.name.clone(),
            self.amount.to_string(),
            self.category.clone(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, DecodeError> {
        Ok(Favorite {
            id: fields[0].to_owned(),
            account_id: parse("account id", fields[1])?,
            name: fields[2].to_owned(),
            amount: parse("amount", fields[3])?,
            category: fields[4].to_owned(),
        })
    }
}
