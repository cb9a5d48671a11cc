mod config;
mod rules;

pub use config::{RiskRules, RuleError};

use super::domain::{Decision, Denylist, TransactionEvent};
use serde::{Deserialize, Serialize};

/// Stateless evaluator applying the risk rules to a transaction and its prior activity.
///
/// Rules run in a fixed order and all of them always run:
///
/// 1. high value: amount strictly above the threshold flags fraud and requires verification;
/// 2. excessive activity: more than the tolerated number of prior events at most the activity
///    window old blocks the transaction;
/// 3. rapid location change: the last history entry is strictly inside the location window and
///    at a different location, which flags fraud and requires verification;
/// 4. denylisted location: blocks and *replaces* the accumulated score with the denylist score.
///
/// # History contract
///
/// `history` must be ordered oldest to newest and precede `current`. The evaluator does not
/// sort or validate it: the last element is taken as the most recent transaction, and entries
/// later than `current` are counted as recent. Use [`super::EventGuard`] at the boundary to
/// reject malformed input.
#[derive(Debug, Clone, Default)]
pub struct RiskEvaluator {
    rules: RiskRules,
}

impl RiskEvaluator {
    pub fn new(rules: RiskRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RiskRules {
        &self.rules
    }

    pub fn evaluate(
        &self,
        current: &TransactionEvent,
        history: &[TransactionEvent],
        denylist: &Denylist,
    ) -> Decision {
        self.assess(current, history, denylist).decision
    }

    /// Like [`RiskEvaluator::evaluate`] but keeps the trail of rules that fired.
    pub fn assess(
        &self,
        current: &TransactionEvent,
        history: &[TransactionEvent],
        denylist: &Denylist,
    ) -> RiskAssessment {
        let (decision, hits) = rules::score_event(current, history, denylist, &self.rules);
        RiskAssessment { decision, hits }
    }
}

/// Rules known to the evaluator, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRule {
    HighValue,
    ExcessiveActivity,
    RapidLocationChange,
    DenylistedLocation,
}

impl RiskRule {
    pub const fn label(self) -> &'static str {
        match self {
            RiskRule::HighValue => "high value",
            RiskRule::ExcessiveActivity => "excessive activity",
            RiskRule::RapidLocationChange => "rapid location change",
            RiskRule::DenylistedLocation => "denylisted location",
        }
    }
}

/// How a rule moves the running score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum ScoreEffect {
    Add(u32),
    Override(u32),
}

/// A rule that fired, kept so decisions can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHit {
    pub rule: RiskRule,
    pub effect: ScoreEffect,
    pub notes: String,
}

/// Decision plus the rule trail that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(flatten)]
    pub decision: Decision,
    pub hits: Vec<RuleHit>,
}

impl RiskAssessment {
    pub fn fired(&self, rule: RiskRule) -> bool {
        self.hits.iter().any(|hit| hit.rule == rule)
    }
}
