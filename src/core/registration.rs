//! Estimating registration dates for records whose source omits them.
//!
//! Estimates are a best guess, not ground truth. Records that receive one are
//! flagged with `registration_estimated`.

use crate::core::record::DomainRecord;
use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum RegistrationPolicy {
    /// Leave the date missing; aggregation falls back to the expiry date.
    #[default]
    None,
    /// Registered a fixed number of whole years before expiry.
    Fixed { years: u32 },
    /// Registered 1 to 3 whole years before expiry, drawn from a seeded RNG.
    Seeded { seed: u64 },
}

pub struct RegistrationEstimator {
    policy: RegistrationPolicy,
    rng: Option<StdRng>,
}

impl RegistrationEstimator {
    pub fn new(policy: RegistrationPolicy) -> Self {
        let rng = match policy {
            RegistrationPolicy::Seeded { seed } => Some(StdRng::seed_from_u64(seed)),
            _ => None,
        };
        RegistrationEstimator { policy, rng }
    }

    /// Fills in a missing registration date according to the policy.
    pub fn enrich(&mut self, record: DomainRecord) -> DomainRecord {
        if record.registration_date.is_some() {
            return record;
        }

        let years = match (self.policy, self.rng.as_mut()) {
            (RegistrationPolicy::Fixed { years }, _) => years,
            (RegistrationPolicy::Seeded { .. }, Some(rng)) => rng.random_range(1..=3),
            _ => return record,
        };

        match years_before(record.expiry_date, years) {
            Some(estimate) => DomainRecord {
                registration_date: Some(estimate),
                registration_estimated: true,
                ..record
            },
            None => record,
        }
    }
}

fn years_before(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(years.checked_mul(12)?))
}
