use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::*;
use crate::workflows::transactions::evaluation::{
    RiskEvaluator, RiskRule, RiskRules, RuleError, ScoreEffect,
};

#[test]
fn amount_at_threshold_is_not_high_value() {
    let decision = evaluator().evaluate(&current(dec!(10000), "Lisbon"), &[], &no_denylist());

    assert!(!decision.is_fraudulent);
    assert!(!decision.verification_required);
    assert_eq!(decision.risk_score, 0);
}

#[test]
fn amount_just_above_threshold_is_high_value() {
    let decision = evaluator().evaluate(&current(dec!(10000.01), "Lisbon"), &[], &no_denylist());

    assert!(decision.is_fraudulent);
    assert!(decision.verification_required);
    assert!(!decision.is_blocked);
    assert_eq!(decision.risk_score, 50);
}

#[test]
fn amounts_up_to_threshold_never_score() {
    let engine = evaluator();
    for amount in [dec!(0), dec!(0.01), dec!(999.99), dec!(9999.999), dec!(10000.00)] {
        let assessment = engine.assess(&current(amount, "Lisbon"), &[], &no_denylist());
        assert!(
            !assessment.fired(RiskRule::HighValue),
            "amount {amount} should not be high value"
        );
        assert_eq!(assessment.decision.risk_score, 0);
    }
}

#[test]
fn ten_recent_transactions_do_not_block() {
    let history = burst(10, 50, "Lisbon");
    let decision = evaluator().evaluate(&current(dec!(40), "Lisbon"), &history, &no_denylist());

    assert!(!decision.is_blocked);
    assert_eq!(decision.risk_score, 0);
}

#[test]
fn eleven_recent_transactions_block() {
    let history = burst(11, 50, "Lisbon");
    let assessment = evaluator().assess(&current(dec!(40), "Lisbon"), &history, &no_denylist());

    assert!(assessment.decision.is_blocked);
    assert!(!assessment.decision.is_fraudulent);
    assert_eq!(assessment.decision.risk_score, 30);
    let hit = &assessment.hits[0];
    assert_eq!(hit.rule, RiskRule::ExcessiveActivity);
    assert_eq!(hit.effect, ScoreEffect::Add(30));
    assert!(hit.notes.starts_with("11 transactions"));
}

#[test]
fn activity_window_includes_exactly_sixty_minutes() {
    let mut history = vec![prior(60, "Lisbon")];
    history.extend(burst(10, 20, "Lisbon"));

    let decision = evaluator().evaluate(&current(dec!(40), "Lisbon"), &history, &no_denylist());

    assert!(decision.is_blocked, "entry exactly 60 minutes old is recent");
}

#[test]
fn activity_window_excludes_older_entries() {
    let mut history = vec![
        event_at(dec!(25), now() - Duration::minutes(60) - Duration::seconds(1), "Lisbon"),
        prior(90, "Lisbon"),
    ];
    history.sort_by_key(|event| event.timestamp);
    history.extend(burst(10, 20, "Lisbon"));

    let decision = evaluator().evaluate(&current(dec!(40), "Lisbon"), &history, &no_denylist());

    assert!(!decision.is_blocked);
}

#[test]
fn later_dated_history_counts_as_recent() {
    let history: Vec<_> = (1..=11)
        .map(|minutes| event_at(dec!(5), now() + Duration::minutes(minutes), "Lisbon"))
        .collect();

    let decision = evaluator().evaluate(&current(dec!(40), "Lisbon"), &history, &no_denylist());

    assert!(decision.is_blocked);
}

#[test]
fn location_change_inside_window_flags_fraud() {
    let history = vec![prior(29, "Porto")];
    let assessment = evaluator().assess(&current(dec!(60), "Lisbon"), &history, &no_denylist());

    assert!(assessment.decision.is_fraudulent);
    assert!(assessment.decision.verification_required);
    assert_eq!(assessment.decision.risk_score, 20);
    assert!(assessment.hits[0].notes.contains("Porto to Lisbon"));
}

#[test]
fn location_change_at_exactly_thirty_minutes_is_ignored() {
    let history = vec![prior(30, "Porto")];
    let decision = evaluator().evaluate(&current(dec!(60), "Lisbon"), &history, &no_denylist());

    assert_eq!(decision, Default::default());
}

#[test]
fn same_location_never_counts_as_a_change() {
    let history = vec![prior(1, "Lisbon")];
    let decision = evaluator().evaluate(&current(dec!(60), "Lisbon"), &history, &no_denylist());

    assert!(!decision.is_fraudulent);
}

#[test]
fn location_comparison_is_case_sensitive() {
    let history = vec![prior(5, "lisbon")];
    let assessment = evaluator().assess(&current(dec!(60), "Lisbon"), &history, &no_denylist());

    assert!(assessment.fired(RiskRule::RapidLocationChange));
}

#[test]
fn location_change_reads_the_last_history_entry() {
    // Out of order: the newest entry (Porto, 5 minutes) is not last.
    let history = vec![prior(5, "Porto"), prior(45, "Lisbon")];
    let decision = evaluator().evaluate(&current(dec!(60), "Lisbon"), &history, &no_denylist());

    assert!(!decision.is_fraudulent);
}

#[test]
fn location_change_ignores_amount() {
    let history = vec![prior(10, "Porto")];
    let engine = evaluator();

    for amount in [dec!(1), dec!(500), dec!(9999)] {
        let assessment = engine.assess(&current(amount, "Lisbon"), &history, &no_denylist());
        assert!(assessment.fired(RiskRule::RapidLocationChange));
        assert_eq!(assessment.decision.risk_score, 20);
    }
}

#[test]
fn custom_rules_move_thresholds() {
    let rules = RiskRules {
        high_value_threshold: Decimal::from(500),
        high_value_points: 15,
        max_recent_events: 2,
        activity_points: 5,
        ..RiskRules::default()
    };
    let engine = RiskEvaluator::new(rules);
    let history = burst(3, 10, "Lisbon");

    let decision = engine.evaluate(&current(dec!(501), "Lisbon"), &history, &no_denylist());

    assert!(decision.is_fraudulent);
    assert!(decision.is_blocked);
    assert_eq!(decision.risk_score, 20);
}

#[test]
fn rules_deserialize_with_defaults_for_missing_fields() {
    let rules: RiskRules =
        serde_json::from_str(r#"{ "high_value_threshold": "2500", "denylist_score": 90 }"#)
            .expect("rules parse");

    assert_eq!(rules.high_value_threshold, dec!(2500));
    assert_eq!(rules.denylist_score, 90);
    assert_eq!(rules.activity_window_minutes, 60);
    assert_eq!(rules.max_recent_events, 10);
}

#[test]
fn unrepresentable_windows_saturate_instead_of_panicking() {
    let rules = RiskRules {
        activity_window_minutes: i64::MAX,
        max_recent_events: 0,
        location_change_minutes: i64::MAX,
        ..RiskRules::default()
    };
    let five_years = 5 * 365 * 24 * 60;
    let history = vec![prior(five_years, "Porto")];

    let decision = RiskEvaluator::new(rules.clone()).evaluate(
        &current(dec!(80), "Lisbon"),
        &history,
        &no_denylist(),
    );

    assert!(decision.is_blocked);
    assert!(decision.is_fraudulent);
    assert_eq!(decision.risk_score, 50);
    assert_eq!(
        rules.validate(),
        Err(RuleError::WindowOutOfRange {
            field: "activity_window_minutes",
            minutes: i64::MAX,
        })
    );
}

#[test]
fn negative_windows_match_nothing_and_fail_validation() {
    let rules = RiskRules {
        activity_window_minutes: i64::MIN,
        max_recent_events: 0,
        location_change_minutes: -1,
        ..RiskRules::default()
    };
    let history = vec![prior(1, "Porto")];

    let decision = RiskEvaluator::new(rules.clone()).evaluate(
        &current(dec!(80), "Lisbon"),
        &history,
        &no_denylist(),
    );

    assert_eq!(decision.risk_score, 0);
    assert!(!decision.is_blocked);
    assert!(matches!(
        rules.validate(),
        Err(RuleError::NegativeWindow {
            field: "activity_window_minutes",
            ..
        })
    ));
    assert_eq!(RiskRules::default().validate(), Ok(()));
    assert_eq!(RiskRules::default().activity_window(), Duration::minutes(60));
}
