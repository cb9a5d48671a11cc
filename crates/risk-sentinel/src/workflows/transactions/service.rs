use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{Denylist, Disposition, TransactionEvent};
use super::evaluation::{RiskAssessment, RiskEvaluator, RiskRules};
use super::guard::{EventGuard, EventViolation};
use super::import::{self, ImportError};
use crate::config::ScreeningConfig;

/// Transaction plus the subject's prior activity, as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRequest {
    pub current: TransactionEvent,
    #[serde(default)]
    pub history: Vec<TransactionEvent>,
    /// Overrides the service denylist for this request when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denylist: Option<Denylist>,
}

/// Service composing the boundary guard, the evaluator, and the configured denylist.
#[derive(Debug, Clone)]
pub struct RiskScreeningService {
    guard: EventGuard,
    evaluator: RiskEvaluator,
    denylist: Arc<Denylist>,
}

impl RiskScreeningService {
    pub fn new(guard: EventGuard, rules: RiskRules, denylist: Denylist) -> Self {
        Self {
            guard,
            evaluator: RiskEvaluator::new(rules),
            denylist: Arc::new(denylist),
        }
    }

    /// Build a service from environment configuration, merging the inline denylist with the
    /// CSV store when one is configured.
    pub fn from_config(config: &ScreeningConfig) -> Result<Self, ImportError> {
        let mut denylist: Denylist = config.denylist.iter().cloned().collect();
        if let Some(path) = &config.denylist_path {
            let stored = import::denylist_from_path(path)?;
            denylist.extend(stored.iter().map(str::to_string));
        }

        info!(
            locations = denylist.len(),
            max_history = config.max_history,
            activity_window_minutes = config.rules.activity_window_minutes,
            "transaction screening configured"
        );

        Ok(Self::new(
            EventGuard::new(config.max_history),
            config.rules.clone(),
            denylist,
        ))
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    pub fn evaluator(&self) -> &RiskEvaluator {
        &self.evaluator
    }

    /// Validate the request, then evaluate it.
    pub fn screen(&self, request: &ScreeningRequest) -> Result<RiskAssessment, ScreeningError> {
        self.guard.check(&request.current, &request.history)?;

        let denylist = request.denylist.as_ref().unwrap_or(&*self.denylist);
        let assessment = self
            .evaluator
            .assess(&request.current, &request.history, denylist);

        let decision = &assessment.decision;
        match decision.disposition() {
            Disposition::Block => warn!(
                location = %request.current.location,
                risk_score = decision.risk_score,
                rules = assessment.hits.len(),
                "transaction blocked"
            ),
            Disposition::Verify => info!(
                location = %request.current.location,
                risk_score = decision.risk_score,
                "transaction requires verification"
            ),
            Disposition::Approve => debug!(
                history = request.history.len(),
                "transaction approved"
            ),
        }

        Ok(assessment)
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error(transparent)]
    Violation(#[from] EventViolation),
}
