use chrono::TimeDelta;

use super::super::domain::{Decision, Denylist, TransactionEvent};
use super::config::RiskRules;
use super::{RiskRule, RuleHit, ScoreEffect};

/// Run every rule in order and fold the hits into a decision. No rule short-circuits another.
pub(crate) fn score_event(
    current: &TransactionEvent,
    history: &[TransactionEvent],
    denylist: &Denylist,
    rules: &RiskRules,
) -> (Decision, Vec<RuleHit>) {
    let hits: Vec<RuleHit> = [
        high_value(current, rules),
        excessive_activity(current, history, rules),
        rapid_location_change(current, history, rules),
        denylisted_location(current, denylist, rules),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut decision = Decision::default();
    for hit in &hits {
        apply_hit(&mut decision, hit);
    }

    (decision, hits)
}

fn apply_hit(decision: &mut Decision, hit: &RuleHit) {
    match hit.rule {
        RiskRule::HighValue | RiskRule::RapidLocationChange => {
            decision.is_fraudulent = true;
            decision.verification_required = true;
        }
        RiskRule::ExcessiveActivity | RiskRule::DenylistedLocation => {
            decision.is_blocked = true;
        }
    }

    decision.risk_score = match hit.effect {
        ScoreEffect::Add(points) => decision.risk_score.saturating_add(points),
        ScoreEffect::Override(score) => score,
    };
}

fn elapsed_since(current: &TransactionEvent, earlier: &TransactionEvent) -> TimeDelta {
    current.timestamp.signed_duration_since(earlier.timestamp)
}

fn high_value(current: &TransactionEvent, rules: &RiskRules) -> Option<RuleHit> {
    if current.amount <= rules.high_value_threshold {
        return None;
    }

    Some(RuleHit {
        rule: RiskRule::HighValue,
        effect: ScoreEffect::Add(rules.high_value_points),
        notes: format!(
            "amount {} exceeds {}",
            current.amount, rules.high_value_threshold
        ),
    })
}

// Entries later than `current` have negative elapsed time and still count.
fn excessive_activity(
    current: &TransactionEvent,
    history: &[TransactionEvent],
    rules: &RiskRules,
) -> Option<RuleHit> {
    let window = rules.activity_window();
    let recent = history
        .iter()
        .filter(|entry| elapsed_since(current, entry) <= window)
        .count();

    if recent <= rules.max_recent_events {
        return None;
    }

    Some(RuleHit {
        rule: RiskRule::ExcessiveActivity,
        effect: ScoreEffect::Add(rules.activity_points),
        notes: format!(
            "{recent} transactions within {} minutes (limit {})",
            rules.activity_window_minutes, rules.max_recent_events
        ),
    })
}

fn rapid_location_change(
    current: &TransactionEvent,
    history: &[TransactionEvent],
    rules: &RiskRules,
) -> Option<RuleHit> {
    let last = history.last()?;
    let elapsed = elapsed_since(current, last);

    if elapsed >= rules.location_change_window() || last.location == current.location {
        return None;
    }

    Some(RuleHit {
        rule: RiskRule::RapidLocationChange,
        effect: ScoreEffect::Add(rules.location_change_points),
        notes: format!(
            "moved from {} to {} in {} minutes",
            last.location,
            current.location,
            elapsed.num_minutes()
        ),
    })
}

fn denylisted_location(
    current: &TransactionEvent,
    denylist: &Denylist,
    rules: &RiskRules,
) -> Option<RuleHit> {
    if !denylist.contains(&current.location) {
        return None;
    }

    Some(RuleHit {
        rule: RiskRule::DenylistedLocation,
        effect: ScoreEffect::Override(rules.denylist_score),
        notes: format!("location {} is denylisted", current.location),
    })
}
