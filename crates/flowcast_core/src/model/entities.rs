use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountId, EntityId, JobId, SecurityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Person,
    Company,
    Government,
}

/// A party that owns sources or receives payments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub kind: EntityKind,
}

/// Employment of a person by a company; pay lands in `default_sink`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub employer: EntityId,
    pub employee: EntityId,
    pub default_sink: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub security: SecurityId,
    pub shares: Decimal,
}

/// A cash account that receives cash flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub owner: EntityId,
    pub opening_date: Date,
    #[serde(default)]
    pub opening_cash: Decimal,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

/// A traded security with its known prices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    pub id: SecurityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prices: BTreeMap<Date, Decimal>,
}
