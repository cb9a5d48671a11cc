use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One financial transaction submitted for risk evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub location: String,
}

impl TransactionEvent {
    pub fn new(amount: Decimal, timestamp: DateTime<Utc>, location: impl Into<String>) -> Self {
        Self {
            amount,
            timestamp,
            location: location.into(),
        }
    }
}

/// Locations treated as automatically high risk. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denylist(BTreeSet<String>);

impl Denylist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, location: &str) -> bool {
        self.0.contains(location)
    }

    pub fn insert(&mut self, location: impl Into<String>) -> bool {
        self.0.insert(location.into())
    }

    pub fn extend<I, S>(&mut self, locations: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(locations.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Denylist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Flags and score produced for a single evaluated transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub is_fraudulent: bool,
    pub is_blocked: bool,
    pub verification_required: bool,
    pub risk_score: u32,
}

impl Decision {
    /// Collapse the flags into the action a caller should take. Blocking wins over verification.
    pub const fn disposition(&self) -> Disposition {
        if self.is_blocked {
            Disposition::Block
        } else if self.verification_required || self.is_fraudulent {
            Disposition::Verify
        } else {
            Disposition::Approve
        }
    }

    pub fn summary(&self) -> String {
        let mut flags = Vec::new();
        if self.is_fraudulent {
            flags.push("fraudulent");
        }
        if self.is_blocked {
            flags.push("blocked");
        }
        if self.verification_required {
            flags.push("verification required");
        }

        if flags.is_empty() {
            format!("{} (score {})", self.disposition().label(), self.risk_score)
        } else {
            format!(
                "{} (score {}): {}",
                self.disposition().label(),
                self.risk_score,
                flags.join(", ")
            )
        }
    }
}

/// Downstream action implied by a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Approve,
    Verify,
    Block,
}

impl Disposition {
    pub const fn label(self) -> &'static str {
        match self {
            Disposition::Approve => "approve",
            Disposition::Verify => "verify",
            Disposition::Block => "block",
        }
    }
}
