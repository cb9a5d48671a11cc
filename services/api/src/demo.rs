use chrono::{DateTime, Duration, Utc};
use clap::Args;
use risk_sentinel::config::AppConfig;
use risk_sentinel::error::AppError;
use risk_sentinel::telemetry;
use risk_sentinel::workflows::transactions::import::{denylist_from_path, history_from_path};
use risk_sentinel::workflows::transactions::{
    Decision, Denylist, RiskAssessment, RiskEvaluator, RiskScreeningService, ScreeningRequest,
    TransactionEvent,
};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Transaction amount (decimal)
    #[arg(long, value_parser = crate::infra::parse_amount)]
    pub(crate) amount: Decimal,
    /// Transaction location, matched exactly against the denylist
    #[arg(long)]
    pub(crate) location: String,
    /// Transaction time (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) timestamp: Option<DateTime<Utc>>,
    /// CSV of prior transactions (amount,timestamp,location), oldest first
    #[arg(long)]
    pub(crate) history_csv: Option<PathBuf>,
    /// CSV of denylisted locations; replaces the configured denylist
    #[arg(long)]
    pub(crate) denylist_csv: Option<PathBuf>,
    /// Additional denylisted location (repeatable); replaces the configured denylist
    #[arg(long = "deny")]
    pub(crate) deny: Vec<String>,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print each scenario's assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        amount,
        location,
        timestamp,
        history_csv,
        denylist_csv,
        deny,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;
    let service = RiskScreeningService::from_config(&config.screening)?;

    let history = match history_csv {
        Some(path) => history_from_path(path)?,
        None => Vec::new(),
    };

    let denylist = if denylist_csv.is_some() || !deny.is_empty() {
        let mut denylist = match denylist_csv {
            Some(path) => denylist_from_path(path)?,
            None => Denylist::new(),
        };
        denylist.extend(deny);
        Some(denylist)
    } else {
        None
    };

    let request = ScreeningRequest {
        current: TransactionEvent::new(amount, timestamp.unwrap_or_else(Utc::now), location),
        history,
        denylist,
    };
    let assessment = service.screen(&request)?;

    if json {
        print_json(&assessment);
    } else {
        render_assessment(&request.current, &assessment);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let evaluator = RiskEvaluator::default();
    let now = Utc::now();

    println!("Transaction risk screening demo");
    for scenario in reference_scenarios(now) {
        let assessment = evaluator.assess(&scenario.current, &scenario.history, &scenario.denylist);

        println!("\n{}", scenario.title);
        if args.json {
            print_json(&assessment);
        } else {
            render_assessment(&scenario.current, &assessment);
        }

        if assessment.decision != scenario.expected {
            println!(
                "  ! expected {} but evaluated {}",
                scenario.expected.summary(),
                assessment.decision.summary()
            );
        }
    }

    Ok(())
}

fn print_json(assessment: &RiskAssessment) {
    match serde_json::to_string_pretty(assessment) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("assessment unavailable: {}", err),
    }
}

fn render_assessment(current: &TransactionEvent, assessment: &RiskAssessment) {
    println!(
        "- {} at {} ({})",
        current.amount,
        current.location,
        current.timestamp.to_rfc3339()
    );
    println!("  Decision: {}", assessment.decision.summary());

    if assessment.hits.is_empty() {
        println!("  Rules fired: none");
    } else {
        println!("  Rules fired:");
        for hit in &assessment.hits {
            println!("    - {}: {:?} ({})", hit.rule.label(), hit.effect, hit.notes);
        }
    }
}

pub(crate) struct Scenario {
    pub(crate) title: &'static str,
    pub(crate) current: TransactionEvent,
    pub(crate) history: Vec<TransactionEvent>,
    pub(crate) denylist: Denylist,
    pub(crate) expected: Decision,
}

pub(crate) fn reference_scenarios(now: DateTime<Utc>) -> Vec<Scenario> {
    let minutes_ago = |minutes: i64| now - Duration::minutes(minutes);

    vec![
        Scenario {
            title: "Routine purchase, no prior activity",
            current: TransactionEvent::new(Decimal::from(1_000), now, "Curitiba"),
            history: Vec::new(),
            denylist: Denylist::new(),
            expected: Decision::default(),
        },
        Scenario {
            title: "High-value purchase",
            current: TransactionEvent::new(Decimal::from(15_000), now, "Curitiba"),
            history: Vec::new(),
            denylist: Denylist::new(),
            expected: Decision {
                is_fraudulent: true,
                verification_required: true,
                risk_score: 50,
                ..Decision::default()
            },
        },
        Scenario {
            title: "Eleven purchases in the last sixteen minutes",
            current: TransactionEvent::new(Decimal::from(300), now, "Curitiba"),
            history: (0..11)
                .map(|index| {
                    TransactionEvent::new(
                        Decimal::from(20),
                        minutes_ago(16 - index as i64),
                        "Curitiba",
                    )
                })
                .collect(),
            denylist: Denylist::new(),
            expected: Decision {
                is_blocked: true,
                risk_score: 30,
                ..Decision::default()
            },
        },
        Scenario {
            title: "São Paulo to Rio de Janeiro in ten minutes",
            current: TransactionEvent::new(Decimal::from(250), now, "Rio de Janeiro"),
            history: vec![TransactionEvent::new(
                Decimal::from(90),
                minutes_ago(10),
                "São Paulo",
            )],
            denylist: Denylist::new(),
            expected: Decision {
                is_fraudulent: true,
                verification_required: true,
                risk_score: 20,
                ..Decision::default()
            },
        },
        Scenario {
            title: "Purchase from a denylisted location",
            current: TransactionEvent::new(Decimal::from(40), now, "Pyongyang"),
            history: Vec::new(),
            denylist: ["Pyongyang"].into_iter().collect(),
            expected: Decision {
                is_blocked: true,
                risk_score: 100,
                ..Decision::default()
            },
        },
    ]
}
