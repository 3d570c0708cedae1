//! Domain registration records, raw and validated.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record as delivered by a source, before any validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDomainRecord {
    #[serde(default)]
    pub domain: Option<String>,
    /// Kept loose so a malformed amount rejects only its own record.
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub registration_date: Option<String>,
    pub expiry_date: Option<String>,
}

/// A validated record. Amounts are non-negative and dates are real calendar
/// dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRecord {
    pub domain: String,
    pub amount: f64,
    pub currency: String,
    pub registration_date: Option<NaiveDate>,
    /// Set when the registration date was estimated rather than read.
    pub registration_estimated: bool,
    pub expiry_date: NaiveDate,
}

impl DomainRecord {
    /// Registration date, or the expiry date when none is known.
    pub fn effective_registration_date(&self) -> NaiveDate {
        self.registration_date.unwrap_or(self.expiry_date)
    }
}

impl RawDomainRecord {
    /// Validates the raw fields. `default_currency` fills in a missing code.
    pub fn parse(&self, default_currency: &str) -> Result<DomainRecord> {
        let amount = self.parse_amount()?;

        let expiry_date = match self.expiry_date.as_deref() {
            Some(s) => parse_date(s)?,
            None => return Err(anyhow!("Missing expiry date")),
        };
        let registration_date = self
            .registration_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(parse_date)
            .transpose()?;

        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(default_currency)
            .to_uppercase();

        Ok(DomainRecord {
            domain: self.domain.clone().unwrap_or_default(),
            amount,
            currency,
            registration_date,
            registration_estimated: false,
            expiry_date,
        })
    }

    /// Accepts a JSON number or a numeric string such as `"12.50"`.
    fn parse_amount(&self) -> Result<f64> {
        let amount = match &self.amount {
            None | Some(Value::Null) => return Err(anyhow!("Missing amount")),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        match amount {
            Some(a) if a.is_finite() && a >= 0.0 => Ok(a),
            _ => Err(anyhow!(
                "Invalid amount: {}",
                self.amount.as_ref().map(Value::to_string).unwrap_or_default()
            )),
        }
    }

    pub fn label(&self) -> &str {
        self.domain.as_deref().unwrap_or("<unnamed>")
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|_| anyhow!("Invalid date: '{s}'"))
}
