use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::appetite::{
    default_guards, AppetiteRequest, AppetiteResult, AssessmentCategory, Context, Dimension,
    Guard, ValidationError,
};

/// Identifier assigned to a saved assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub Uuid);

impl AssessmentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for AssessmentId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}

/// Review state recorded alongside an assessment. Free to move in any
/// direction; there is no approval workflow behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkflowStatus {
    #[default]
    Draft,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
    Rejected,
}

impl WorkflowStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Persisted assessment: the editable inputs plus the last calculated result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AssessmentId>,
    #[serde(default)]
    pub title: String,
    pub context: Context,
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub result: Option<AppetiteResult>,
    #[serde(default)]
    pub status: WorkflowStatus,
    /// Comma-separated approver roles.
    #[serde(default)]
    pub approvers: String,
    #[serde(default)]
    pub guards: Vec<Guard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl AssessmentDocument {
    /// Starting point for a fresh session: an SME lending assessment with
    /// five dimensions and the standard guardrails.
    pub fn seeded() -> Self {
        Self {
            id: None,
            title: "SME Lending Appetite 2025".to_string(),
            context: Context {
                organisation: "Example Bank".to_string(),
                strategic_objective: "Grow SME lending profitably".to_string(),
                time_horizon_months: 12,
                risk_domain: "Credit Risk".to_string(),
                category: AssessmentCategory::Financial,
            },
            dimensions: vec![
                Dimension::new("Capital Adequacy", 0.60, 0.25),
                Dimension::new("Earnings Volatility", 0.40, 0.20),
                Dimension::new("Liquidity Buffer", 0.70, 0.20),
                Dimension::new("Concentration Risk", 0.35, 0.20),
                Dimension::new("Regulatory Headroom", 0.55, 0.15),
            ],
            result: None,
            status: WorkflowStatus::Draft,
            approvers: "CRO, CFO, Head of Credit".to_string(),
            guards: default_guards(),
            saved_at: None,
        }
    }

    /// Validated request built from the current inputs.
    pub fn request(&self) -> Result<AppetiteRequest, ValidationError> {
        AppetiteRequest::new(self.context.clone(), self.dimensions.clone())
    }

    /// Title shown in listings: the explicit title, else the objective.
    pub fn display_title(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }
        if !self.context.strategic_objective.trim().is_empty() {
            return self.context.strategic_objective.clone();
        }
        "(no title)".to_string()
    }

    pub fn approver_list(&self) -> Vec<&str> {
        self.approvers
            .split(',')
            .map(str::trim)
            .filter(|approver| !approver.is_empty())
            .collect()
    }

    /// Listing entry; `None` until the document has been saved.
    pub fn summary(&self) -> Option<AssessmentSummary> {
        Some(AssessmentSummary {
            id: self.id?,
            title: self.display_title(),
            category: self.context.category,
            saved_at: self.saved_at?,
        })
    }
}

/// Row returned when listing saved assessments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub id: AssessmentId,
    pub title: String,
    pub category: AssessmentCategory,
    pub saved_at: DateTime<Utc>,
}
