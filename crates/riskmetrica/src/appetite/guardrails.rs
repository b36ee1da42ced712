use std::fmt;

use serde::{Deserialize, Serialize};

use super::engine::AppetiteResult;

/// Business rule gating a decision on a minimum dimension score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub decision: String,
    pub dimension: String,
    #[serde(default)]
    pub min_score: f64,
    #[serde(default)]
    pub note: String,
}

impl Guard {
    pub fn new(
        decision: impl Into<String>,
        dimension: impl Into<String>,
        min_score: f64,
        note: impl Into<String>,
    ) -> Self {
        Self {
            decision: decision.into(),
            dimension: dimension.into(),
            min_score,
            note: note.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GuardStatus {
    Ok,
    Breach,
}

impl GuardStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Breach => "BREACH",
        }
    }
}

impl fmt::Display for GuardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of checking one guard against a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardEvaluation {
    pub decision: String,
    pub dimension: String,
    pub min_score: f64,
    pub actual: Option<f64>,
    pub status: GuardStatus,
    pub note: String,
}

/// Guardrails seeded into every new assessment.
pub fn default_guards() -> Vec<Guard> {
    vec![
        Guard::new(
            "New SME Loan Approvals",
            "Capital Adequacy",
            0.5,
            "Pause approvals if below",
        ),
        Guard::new(
            "Marketing Spend Increase",
            "Earnings Volatility",
            0.45,
            "Require CFO approval if below",
        ),
    ]
}

/// Checks each guard against the result's contributions, in guard order.
///
/// Dimension names match exactly (case-sensitive). A guard naming a
/// dimension the result does not contain is a breach with no actual score.
pub fn evaluate_guardrails(result: &AppetiteResult, guards: &[Guard]) -> Vec<GuardEvaluation> {
    guards
        .iter()
        .map(|guard| {
            let actual = result
                .contribution(&guard.dimension)
                .map(|contribution| contribution.score);
            let status = match actual {
                Some(score) if score >= guard.min_score => GuardStatus::Ok,
                _ => GuardStatus::Breach,
            };

            GuardEvaluation {
                decision: guard.decision.clone(),
                dimension: guard.dimension.clone(),
                min_score: guard.min_score,
                actual,
                status,
                note: guard.note.clone(),
            }
        })
        .collect()
}

/// True when any evaluation breached.
pub fn has_breach(evaluations: &[GuardEvaluation]) -> bool {
    evaluations
        .iter()
        .any(|evaluation| evaluation.status == GuardStatus::Breach)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appetite::bands::BandSet;
    use crate::appetite::domain::{AppetiteRequest, AssessmentCategory, Context, Dimension};
    use crate::appetite::engine::calculate;

    fn result_with(dimensions: Vec<Dimension>) -> AppetiteResult {
        let context = Context {
            organisation: "Example Bank".to_string(),
            strategic_objective: "Grow SME lending profitably".to_string(),
            time_horizon_months: 12,
            risk_domain: "Credit Risk".to_string(),
            category: AssessmentCategory::Financial,
        };
        let request = AppetiteRequest::new(context, dimensions).expect("valid request");
        calculate(&request, &BandSet::default())
    }

    #[test]
    fn passes_when_score_meets_minimum() {
        let result = result_with(vec![Dimension::new("Capital Adequacy", 0.6, 0.5)]);
        let report = evaluate_guardrails(
            &result,
            &[Guard::new("Lend", "Capital Adequacy", 0.5, "Pause if below")],
        );
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].status, GuardStatus::Ok);
        assert_eq!(report[0].actual, Some(0.6));
        assert_eq!(report[0].note, "Pause if below");
    }

    #[test]
    fn equal_score_is_not_a_breach() {
        let result = result_with(vec![Dimension::new("Liquidity", 0.45, 1.0)]);
        let report = evaluate_guardrails(&result, &[Guard::new("Spend", "Liquidity", 0.45, "")]);
        assert_eq!(report[0].status, GuardStatus::Ok);
    }

    #[test]
    fn breaches_when_score_below_minimum() {
        let result = result_with(vec![Dimension::new("Earnings Volatility", 0.4, 1.0)]);
        let report = evaluate_guardrails(&result, &default_guards());
        assert_eq!(report[1].dimension, "Earnings Volatility");
        assert_eq!(report[1].status, GuardStatus::Breach);
        assert_eq!(report[1].actual, Some(0.4));
        assert!(has_breach(&report));
    }

    #[test]
    fn missing_dimension_always_breaches() {
        let result = result_with(vec![Dimension::new("Capital Adequacy", 1.0, 1.0)]);
        for min_score in [0.1, 0.0, -1.0] {
            let report =
                evaluate_guardrails(&result, &[Guard::new("Expand", "Nonexistent", min_score, "")]);
            assert_eq!(report[0].status, GuardStatus::Breach);
            assert_eq!(report[0].actual, None);
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        let result = result_with(vec![Dimension::new("Capital Adequacy", 0.9, 1.0)]);
        let report =
            evaluate_guardrails(&result, &[Guard::new("Lend", "capital adequacy", 0.1, "")]);
        assert_eq!(report[0].status, GuardStatus::Breach);
        assert_eq!(report[0].actual, None);
    }

    #[test]
    fn preserves_guard_order_and_leaves_inputs_untouched() {
        let result = result_with(vec![
            Dimension::new("Capital Adequacy", 0.6, 0.5),
            Dimension::new("Earnings Volatility", 0.5, 0.5),
        ]);
        let guards = vec![
            Guard::new("Second", "Earnings Volatility", 0.45, ""),
            Guard::new("First", "Capital Adequacy", 0.7, ""),
        ];
        let before = (result.clone(), guards.clone());
        let report = evaluate_guardrails(&result, &guards);
        let decisions: Vec<&str> = report.iter().map(|e| e.decision.as_str()).collect();
        assert_eq!(decisions, ["Second", "First"]);
        assert_eq!(report[0].status, GuardStatus::Ok);
        assert_eq!(report[1].status, GuardStatus::Breach);
        assert_eq!((result, guards), before);
    }

    #[test]
    fn status_serializes_in_upper_case() {
        let json = serde_json::to_string(&GuardStatus::Breach).expect("serializes");
        assert_eq!(json, "\"BREACH\"");
        let guard: Guard =
            serde_json::from_str(r#"{"decision":"Lend","dimension":"Capital"}"#).expect("parses");
        assert_eq!(guard.min_score, 0.0);
        assert!(guard.note.is_empty());
    }
}
