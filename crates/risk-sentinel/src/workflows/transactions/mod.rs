//! Transaction risk screening: the rule evaluator, its boundary guard, CSV adapters, and the
//! service that ties them to a configured denylist.

pub mod domain;
pub mod evaluation;
pub mod guard;
pub mod import;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Decision, Denylist, Disposition, TransactionEvent};
pub use evaluation::{
    RiskAssessment, RiskEvaluator, RiskRule, RiskRules, RuleError, RuleHit, ScoreEffect,
};
pub use guard::{EventGuard, EventViolation};
pub use import::ImportError;
pub use service::{RiskScreeningService, ScreeningError, ScreeningRequest};
