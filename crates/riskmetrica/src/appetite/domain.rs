use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_HORIZON_MONTHS: u16 = 1;
pub const MAX_HORIZON_MONTHS: u16 = 120;

/// Business area an assessment is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssessmentCategory {
    #[default]
    Financial,
    #[serde(rename = "Safety & HR")]
    SafetyAndHr,
    Reputational,
    Compliance,
    Operational,
    Strategic,
}

impl AssessmentCategory {
    pub const ALL: [AssessmentCategory; 6] = [
        Self::Financial,
        Self::SafetyAndHr,
        Self::Reputational,
        Self::Compliance,
        Self::Operational,
        Self::Strategic,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Financial => "Financial",
            Self::SafetyAndHr => "Safety & HR",
            Self::Reputational => "Reputational",
            Self::Compliance => "Compliance",
            Self::Operational => "Operational",
            Self::Strategic => "Strategic",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for AssessmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Organisational framing for one appetite calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub organisation: String,
    pub strategic_objective: String,
    pub time_horizon_months: u16,
    pub risk_domain: String,
    #[serde(default)]
    pub category: AssessmentCategory,
}

/// A scored, weighted risk dimension. Weights are relative units and are
/// normalized by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

impl Dimension {
    pub fn new(name: impl Into<String>, score: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            score,
            weight,
        }
    }
}

/// Reasons a request is rejected before it reaches the scoring engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("time horizon must be between 1 and 120 months (found {0})")]
    HorizonOutOfRange(u16),
    #[error("provide at least one dimension")]
    NoDimensions,
    #[error("dimension {index} has an empty name")]
    UnnamedDimension { index: usize },
    #[error("score for '{name}' must be within 0.0..=1.0 (found {value})")]
    ScoreOutOfRange { name: String, value: f64 },
    #[error("weight for '{name}' must be within 0.0..=1.0 (found {value})")]
    WeightOutOfRange { name: String, value: f64 },
}

/// Unvalidated request as received from callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppetiteRequestPayload {
    pub context: Context,
    pub dimensions: Vec<Dimension>,
}

/// A request that satisfied every input constraint. The only way to obtain
/// one is through [`AppetiteRequest::new`] or `TryFrom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AppetiteRequestPayload")]
pub struct AppetiteRequest {
    context: Context,
    dimensions: Vec<Dimension>,
}

impl AppetiteRequest {
    pub fn new(context: Context, dimensions: Vec<Dimension>) -> Result<Self, ValidationError> {
        let horizon = context.time_horizon_months;
        if !(MIN_HORIZON_MONTHS..=MAX_HORIZON_MONTHS).contains(&horizon) {
            return Err(ValidationError::HorizonOutOfRange(horizon));
        }

        if dimensions.is_empty() {
            return Err(ValidationError::NoDimensions);
        }

        for (index, dimension) in dimensions.iter().enumerate() {
            if dimension.name.trim().is_empty() {
                return Err(ValidationError::UnnamedDimension { index });
            }
            if !is_unit_interval(dimension.score) {
                return Err(ValidationError::ScoreOutOfRange {
                    name: dimension.name.clone(),
                    value: dimension.score,
                });
            }
            if !is_unit_interval(dimension.weight) {
                return Err(ValidationError::WeightOutOfRange {
                    name: dimension.name.clone(),
                    value: dimension.weight,
                });
            }
        }

        Ok(Self {
            context,
            dimensions,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }
}

impl TryFrom<AppetiteRequestPayload> for AppetiteRequest {
    type Error = ValidationError;

    fn try_from(payload: AppetiteRequestPayload) -> Result<Self, Self::Error> {
        Self::new(payload.context, payload.dimensions)
    }
}

fn is_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
