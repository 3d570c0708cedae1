//! Static-table currency conversion routed through a reference currency.

use crate::core::record::DomainRecord;
use std::collections::HashMap;
use tracing::debug;

/// Rates used when the configuration does not provide its own table.
/// Values are units of USD per unit of the listed currency.
pub const DEFAULT_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 1.08),
    ("GBP", 1.27),
    ("CAD", 0.74),
    ("AUD", 0.66),
    ("JPY", 0.0067),
    ("INR", 0.012),
    ("CHF", 1.13),
];

/// A fixed mapping from currency code to units of the reference currency per
/// unit of that currency.
#[derive(Debug, Clone)]
pub struct RateTable {
    reference: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Builds a table around `reference`. The reference currency always maps
    /// to 1.0 regardless of what `rates` says about it.
    pub fn new<I, S>(reference: &str, rates: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let reference = normalize_code(reference);
        let mut rates: HashMap<String, f64> = rates
            .into_iter()
            .map(|(code, rate)| (normalize_code(code.as_ref()), rate))
            .collect();
        rates.insert(reference.clone(), 1.0);
        RateTable { reference, rates }
    }

    /// Default USD-based table.
    pub fn with_default_rates() -> Self {
        Self::new("USD", DEFAULT_RATES.iter().copied())
    }

    /// Re-expresses every rate relative to a new reference currency.
    pub fn rebase(&self, reference: &str) -> Self {
        let reference = normalize_code(reference);
        let pivot = self.rate_or_par(&reference);
        Self::new(
            &reference,
            self.rates
                .iter()
                .map(|(code, rate)| (code.as_str(), rate / pivot)),
        )
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&normalize_code(code)).copied()
    }

    /// Converts `amount` from one currency to another.
    ///
    /// Unknown codes are treated as a 1:1 rate to the reference currency.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        let from = normalize_code(from);
        let to = normalize_code(to);
        if from == to {
            return amount;
        }

        let in_reference = amount * self.rate_or_par(&from);
        if to == self.reference {
            return in_reference;
        }
        in_reference / self.rate_or_par(&to)
    }

    /// Re-expresses a record's amount in the reference currency.
    pub fn normalize(&self, record: DomainRecord) -> DomainRecord {
        let amount = self.convert(record.amount, &record.currency, &self.reference);
        DomainRecord {
            amount,
            currency: self.reference.clone(),
            ..record
        }
    }

    fn rate_or_par(&self, code: &str) -> f64 {
        match self.rates.get(code) {
            Some(rate) => *rate,
            None => {
                debug!("No rate for {code}, converting at par");
                1.0
            }
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::with_default_rates()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
