use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::appetite::{
    default_guards, evaluate_guardrails, AppetiteCalculator, AppetiteRequest,
    AppetiteRequestPayload, AppetiteResult, AssessmentCategory, BandConfigError, BandSet, Context,
    Dimension, Guard, GuardEvaluation, ValidationError,
};

use super::domain::{AssessmentDocument, AssessmentId, AssessmentSummary};
use super::export::render_markdown;
use super::repository::{AssessmentRepository, RepositoryError};

/// Calculation plus guardrail check in one call. Omitted guards fall back
/// to the standard set.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub context: Context,
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub guards: Option<Vec<Guard>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub result: AppetiteResult,
    pub guardrails: Vec<GuardEvaluation>,
}

/// Service composing the calculator and the assessment store.
pub struct AssessmentService<R> {
    repository: Arc<R>,
    calculator: AppetiteCalculator,
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>, calculator: AppetiteCalculator) -> Self {
        Self {
            repository,
            calculator,
        }
    }

    pub fn calculator(&self) -> &AppetiteCalculator {
        &self.calculator
    }

    /// Bands currently in effect.
    pub fn bands(&self) -> BandSet {
        self.calculator.bands()
    }

    /// Validates and stores a replacement band file.
    pub fn update_bands(&self, raw: &str) -> Result<BandSet, AssessmentServiceError> {
        Ok(self.calculator.store_bands(raw)?)
    }

    pub fn calculate(
        &self,
        payload: AppetiteRequestPayload,
    ) -> Result<AppetiteResult, AssessmentServiceError> {
        let request = AppetiteRequest::try_from(payload)?;
        Ok(self.calculator.calculate(&request))
    }

    pub fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<EvaluationReport, AssessmentServiceError> {
        let guards = request.guards.unwrap_or_else(default_guards);
        let result = self.calculate(AppetiteRequestPayload {
            context: request.context,
            dimensions: request.dimensions,
        })?;
        let guardrails = evaluate_guardrails(&result, &guards);
        Ok(EvaluationReport { result, guardrails })
    }

    /// Stores the document as a new version.
    pub fn save(
        &self,
        mut document: AssessmentDocument,
    ) -> Result<AssessmentDocument, AssessmentServiceError> {
        document.id = None;
        document.saved_at = None;
        Ok(self.repository.save(document)?)
    }

    pub fn list(
        &self,
        category: Option<AssessmentCategory>,
    ) -> Result<Vec<AssessmentSummary>, AssessmentServiceError> {
        Ok(self.repository.list(category)?)
    }

    pub fn get(&self, id: &AssessmentId) -> Result<AssessmentDocument, AssessmentServiceError> {
        self.repository
            .load(id)?
            .ok_or(AssessmentServiceError::NotFound(*id))
    }

    /// Markdown board pack for a stored assessment.
    pub fn report(&self, id: &AssessmentId) -> Result<String, AssessmentServiceError> {
        let document = self.get(id)?;
        Ok(render_markdown(&document)?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("assessment {0} not found")]
    NotFound(AssessmentId),
    #[error(transparent)]
    Bands(#[from] BandConfigError),
    #[error("report could not be rendered: {0}")]
    Render(#[from] serde_json::Error),
    #[error("background task failed: {0}")]
    Worker(String),
}
