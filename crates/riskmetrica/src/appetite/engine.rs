use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bands::{load_bands, save_bands, BandConfigError, BandSet};
use super::domain::AppetiteRequest;
use super::normalizer::{normalize_weights, raw_weight_total};
use super::statement::generate_statement;

/// One dimension's share of the weighted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub name: String,
    pub score: f64,
    /// Normalized weight.
    pub weight: f64,
    pub contribution: f64,
}

/// Per-dimension line of the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationStep {
    pub name: String,
    pub score: f64,
    pub norm_weight: f64,
    pub contribution: f64,
}

/// Snapshot of every input and intermediate value behind a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub bands: BandSet,
    pub normalised_weights_sum: f64,
    pub raw_weight_sum: f64,
    pub inputs: AppetiteRequest,
    pub calculation: Vec<CalculationStep>,
    pub weighted_score: f64,
    pub band: String,
}

/// Outcome of an appetite calculation. Self-contained: exports render from
/// it without recomputing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppetiteResult {
    pub weighted_score: f64,
    pub band: String,
    pub statement: String,
    pub contributions: Vec<Contribution>,
    pub audit: AuditRecord,
}

impl AppetiteResult {
    pub fn contribution(&self, name: &str) -> Option<&Contribution> {
        self.contributions
            .iter()
            .find(|contribution| contribution.name == name)
    }
}

/// Scores a validated request against the given bands.
pub fn calculate(request: &AppetiteRequest, bands: &BandSet) -> AppetiteResult {
    let mut weighted_score = 0.0;
    let mut contributions = Vec::with_capacity(request.dimensions().len());

    for (dimension, weight) in normalize_weights(request.dimensions()) {
        let contribution = dimension.score * weight;
        weighted_score += contribution;
        contributions.push(Contribution {
            name: dimension.name.clone(),
            score: dimension.score,
            weight,
            contribution,
        });
    }

    let band = bands.classify(weighted_score).name.clone();
    let context = request.context();
    let statement = generate_statement(
        &context.organisation,
        &context.strategic_objective,
        &context.risk_domain,
        context.time_horizon_months,
        &band,
        weighted_score,
    );

    let audit = AuditRecord {
        bands: bands.clone(),
        normalised_weights_sum: round6(contributions.iter().map(|c| c.weight).sum()),
        raw_weight_sum: round6(raw_weight_total(request.dimensions())),
        inputs: request.clone(),
        calculation: contributions
            .iter()
            .map(|c| CalculationStep {
                name: c.name.clone(),
                score: c.score,
                norm_weight: c.weight,
                contribution: c.contribution,
            })
            .collect(),
        weighted_score,
        band: band.clone(),
    };

    debug!(
        organisation = %context.organisation,
        dimensions = contributions.len(),
        weighted_score,
        band = %band,
        "appetite calculated"
    );

    AppetiteResult {
        weighted_score,
        band,
        statement,
        contributions,
        audit,
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Calculator bound to a band configuration file. Bands are re-read for
/// every calculation so operator edits apply immediately.
#[derive(Debug, Clone, Default)]
pub struct AppetiteCalculator {
    bands_path: Option<PathBuf>,
}

impl AppetiteCalculator {
    pub fn new(bands_path: Option<PathBuf>) -> Self {
        Self { bands_path }
    }

    pub fn bands_path(&self) -> Option<&std::path::Path> {
        self.bands_path.as_deref()
    }

    pub fn bands(&self) -> BandSet {
        load_bands(self.bands_path())
    }

    pub fn calculate(&self, request: &AppetiteRequest) -> AppetiteResult {
        calculate(request, &self.bands())
    }

    /// Replaces the band file this calculator reads. Later calculations pick
    /// up the new bands.
    pub fn store_bands(&self, raw: &str) -> Result<BandSet, BandConfigError> {
        let path = self.bands_path().ok_or(BandConfigError::NoPath)?;
        save_bands(path, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appetite::bands::Band;
    use crate::appetite::domain::{AssessmentCategory, Context, Dimension};

    fn context() -> Context {
        Context {
            organisation: "Example Bank".to_string(),
            strategic_objective: "Grow SME lending profitably".to_string(),
            time_horizon_months: 12,
            risk_domain: "Credit Risk".to_string(),
            category: AssessmentCategory::Financial,
        }
    }

    fn request(dimensions: Vec<Dimension>) -> AppetiteRequest {
        AppetiteRequest::new(context(), dimensions).expect("valid request")
    }

    fn five_dimensions() -> Vec<Dimension> {
        vec![
            Dimension::new("A", 0.6, 0.25),
            Dimension::new("B", 0.4, 0.20),
            Dimension::new("C", 0.7, 0.20),
            Dimension::new("D", 0.35, 0.20),
            Dimension::new("E", 0.55, 0.15),
        ]
    }

    #[test]
    fn single_full_dimension_is_seeking() {
        let result = calculate(&request(vec![Dimension::new("A", 1.0, 1.0)]), &BandSet::default());
        assert_eq!(result.contributions[0].weight, 1.0);
        assert_eq!(result.weighted_score, 1.0);
        assert_eq!(result.band, "Seeking");
    }

    #[test]
    fn five_dimension_mix_is_balanced() {
        let result = calculate(&request(five_dimensions()), &BandSet::default());
        assert!((result.weighted_score - 0.5225).abs() < 1e-9);
        assert_eq!(result.band, "Balanced");
        let names: Vec<&str> = result.contributions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
        assert!((result.contribution("E").expect("E present").contribution - 0.0825).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_score_zero_and_are_averse() {
        let result = calculate(&request(vec![Dimension::new("A", 0.5, 0.0)]), &BandSet::default());
        assert_eq!(result.contributions[0].weight, 0.0);
        assert_eq!(result.weighted_score, 0.0);
        assert_eq!(result.band, "Averse");
        assert_eq!(result.audit.normalised_weights_sum, 0.0);
        assert_eq!(result.audit.raw_weight_sum, 0.0);
    }

    #[test]
    fn normalized_weights_sum_to_one_and_score_matches_contributions() {
        let cases = vec![
            five_dimensions(),
            vec![Dimension::new("X", 0.9, 0.1), Dimension::new("Y", 0.1, 0.3)],
            vec![
                Dimension::new("P", 0.33, 0.07),
                Dimension::new("Q", 0.66, 0.91),
                Dimension::new("R", 0.01, 0.44),
                Dimension::new("S", 1.0, 0.0),
            ],
        ];

        for dims in cases {
            let result = calculate(&request(dims), &BandSet::default());
            let weight_sum: f64 = result.contributions.iter().map(|c| c.weight).sum();
            assert!((weight_sum - 1.0).abs() < 1e-6);
            let recomputed: f64 = result
                .contributions
                .iter()
                .map(|c| c.score * c.weight)
                .sum();
            assert!((result.weighted_score - recomputed).abs() < 1e-12);
            assert_eq!(result.audit.normalised_weights_sum, 1.0);
        }
    }

    #[test]
    fn audit_captures_inputs_bands_and_breakdown() {
        let dims = vec![Dimension::new("X", 0.9, 0.1), Dimension::new("Y", 0.1, 0.3)];
        let req = request(dims);
        let result = calculate(&req, &BandSet::default());

        assert_eq!(result.audit.inputs, req);
        assert_eq!(result.audit.bands, BandSet::default());
        assert_eq!(result.audit.raw_weight_sum, 0.4);
        assert_eq!(result.audit.band, result.band);
        assert_eq!(result.audit.weighted_score, result.weighted_score);
        assert_eq!(result.audit.calculation.len(), 2);
        assert_eq!(result.audit.calculation[1].name, "Y");
        assert!((result.audit.calculation[1].norm_weight - 0.75).abs() < 1e-12);
    }

    #[test]
    fn audit_serializes_with_plain_keys() {
        let result = calculate(&request(five_dimensions()), &BandSet::default());
        let json = serde_json::to_value(&result).expect("serializes");
        let audit = &json["audit"];
        assert!(audit["bands"].is_array());
        assert!(audit["normalised_weights_sum"].is_number());
        assert!(audit["raw_weight_sum"].is_number());
        assert_eq!(audit["inputs"]["context"]["organisation"], "Example Bank");
        let norm_weight = audit["calculation"][0]["norm_weight"]
            .as_f64()
            .expect("numeric weight");
        assert!((norm_weight - 0.25).abs() < 1e-9);
        assert_eq!(audit["band"], "Balanced");

        let restored: AppetiteResult = serde_json::from_value(json).expect("deserializes");
        assert_eq!(restored.band, result.band);
        assert_eq!(restored.audit.inputs, result.audit.inputs);
        assert_eq!(restored.contributions.len(), 5);
    }

    #[test]
    fn calculation_is_deterministic() {
        let req = request(five_dimensions());
        let first = calculate(&req, &BandSet::default());
        let second = calculate(&req, &BandSet::default());
        assert_eq!(first, second);
        assert_eq!(first.weighted_score.to_bits(), second.weighted_score.to_bits());
    }

    #[test]
    fn custom_bands_drive_classification() {
        let bands = BandSet::new(vec![
            Band::new("Tight", 0.6, "Below sixty percent"),
            Band::new("Loose", 1.0, "Everything else"),
        ])
        .expect("valid bands");
        let result = calculate(&request(five_dimensions()), &bands);
        assert_eq!(result.band, "Tight");
        assert!(result.statement.contains("'Tight'"));
    }

    #[test]
    fn calculator_without_source_uses_default_bands() {
        let calculator = AppetiteCalculator::default();
        let result = calculator.calculate(&request(five_dimensions()));
        assert_eq!(result.band, "Balanced");
        assert_eq!(result.audit.bands, BandSet::default());
    }
}
