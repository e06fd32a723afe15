//! TransactionRecord - one row of the backend's ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A ledger row as listed by `GET /transactions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: i64,
    pub account_number: String,
    /// "initial" for account openings, otherwise the posted transaction type
    pub transaction_type: String,
    pub amount: f64,
    #[serde(with = "ledger_timestamp")]
    pub transaction_date: NaiveDateTime,
}

impl TransactionRecord {
    /// Whether this row opened the account
    pub fn is_opening(&self) -> bool {
        self.transaction_type.eq_ignore_ascii_case("initial")
    }

    /// Amount with the sign it had on the balance
    pub fn signed_amount(&self) -> f64 {
        if self.transaction_type.eq_ignore_ascii_case("withdraw") {
            -self.amount
        } else {
            self.amount
        }
    }
}

mod ledger_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
