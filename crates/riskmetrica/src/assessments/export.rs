use crate::appetite::{AppetiteResult, GuardEvaluation};

use super::domain::AssessmentDocument;

/// Board-pack Markdown: context header, appetite band and score, the
/// statement, one line per contribution and the pretty-printed audit.
pub fn render_markdown(document: &AssessmentDocument) -> Result<String, serde_json::Error> {
    let context = &document.context;
    let result = document.result.as_ref();

    let mut md = String::from("# Risk Appetite Statement\n\n");
    md.push_str(&format!("**Organisation:** {}  \n", context.organisation));
    md.push_str(&format!("**Objective:** {}  \n", context.strategic_objective));
    md.push_str(&format!("**Domain:** {}  \n", context.risk_domain));
    md.push_str(&format!(
        "**Horizon:** {} months  \n",
        context.time_horizon_months
    ));
    md.push_str(&format!("**Category:** {}\n\n", context.category));

    md.push_str("## Appetite\n");
    match result {
        Some(result) => {
            md.push_str(&format!("- **Band:** {}\n", result.band));
            md.push_str(&format!(
                "- **Weighted Score:** {}\n\n",
                decimal(result.weighted_score)
            ));
            md.push_str(&format!("> {}\n\n", result.statement));
        }
        None => {
            md.push_str("- **Band:** not calculated\n");
            md.push_str("- **Weighted Score:** not calculated\n\n");
        }
    }

    md.push_str("## Contributions\n");
    for contribution in result.map(|r| r.contributions.as_slice()).unwrap_or_default() {
        md.push_str(&format!(
            "- {}: score {}, weight {:.2}, contribution {:.3}\n",
            contribution.name,
            decimal(contribution.score),
            contribution.weight,
            contribution.contribution
        ));
    }

    let audit = match result {
        Some(result) => serde_json::to_string_pretty(&result.audit)?,
        None => "{}".to_string(),
    };
    md.push_str("\n## Audit\n");
    md.push_str(&format!("```json\n{audit}\n```\n"));

    Ok(md)
}

/// Shortest decimal form, keeping a trailing `.0` on whole numbers.
fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Machine-readable rendering of a result.
pub fn render_result_json(result: &AppetiteResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Plain-text guardrail table for terminals.
pub fn render_guardrail_report(evaluations: &[GuardEvaluation]) -> String {
    let mut out = String::new();
    for evaluation in evaluations {
        let actual = evaluation
            .actual
            .map(|score| format!("{score:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "- [{}] {}: {} {} vs minimum {:.2}",
            evaluation.status, evaluation.decision, evaluation.dimension, actual, evaluation.min_score
        ));
        if !evaluation.note.is_empty() {
            out.push_str(&format!(" ({})", evaluation.note));
        }
        out.push('\n');
    }
    out
}
