use crate::appetite::{
    evaluate_guardrails, AppetiteCalculator, AppetiteResult, Context, Dimension, Guard,
    GuardEvaluation, ValidationError,
};

use super::domain::{AssessmentDocument, AssessmentId, WorkflowStatus};
use super::repository::{AssessmentRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("calculate appetite first")]
    NotCalculated,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("assessment {0} not found")]
    NotFound(AssessmentId),
}

/// One user's in-progress assessment. Edits mutate the buffer, a
/// calculation replaces the stored result wholesale, and loading swaps the
/// whole document.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    current: AssessmentDocument,
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self::from_document(AssessmentDocument::seeded())
    }

    pub fn from_document(document: AssessmentDocument) -> Self {
        Self { current: document }
    }

    pub fn current(&self) -> &AssessmentDocument {
        &self.current
    }

    pub fn into_document(self) -> AssessmentDocument {
        self.current
    }

    pub fn result(&self) -> Option<&AppetiteResult> {
        self.current.result.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.current.title = title.into();
    }

    pub fn set_context(&mut self, context: Context) {
        self.current.context = context;
    }

    pub fn set_dimensions(&mut self, dimensions: Vec<Dimension>) {
        self.current.dimensions = dimensions;
    }

    pub fn set_guards(&mut self, guards: Vec<Guard>) {
        self.current.guards = guards;
    }

    pub fn set_status(&mut self, status: WorkflowStatus) {
        self.current.status = status;
    }

    pub fn set_approvers(&mut self, approvers: impl Into<String>) {
        self.current.approvers = approvers.into();
    }

    /// Validates the current inputs and stores a fresh result.
    pub fn calculate(
        &mut self,
        calculator: &AppetiteCalculator,
    ) -> Result<&AppetiteResult, SessionError> {
        let request = self.current.request()?;
        let result = self.current.result.insert(calculator.calculate(&request));
        Ok(&*result)
    }

    /// Replaces the generated statement with user-edited text.
    pub fn refine_statement(&mut self, statement: impl Into<String>) -> Result<(), SessionError> {
        let result = self
            .current
            .result
            .as_mut()
            .ok_or(SessionError::NotCalculated)?;
        result.statement = statement.into();
        Ok(())
    }

    /// Checks the session's guards against the last calculated result.
    pub fn evaluate_guardrails(&self) -> Result<Vec<GuardEvaluation>, SessionError> {
        let result = self.result().ok_or(SessionError::NotCalculated)?;
        Ok(evaluate_guardrails(result, &self.current.guards))
    }

    /// Saves the buffer as a new version and returns its id. The buffer keeps
    /// editing the saved copy.
    pub fn save<R: AssessmentRepository + ?Sized>(
        &mut self,
        repository: &R,
    ) -> Result<AssessmentId, SessionError> {
        let mut document = self.current.clone();
        document.id = None;
        document.saved_at = None;

        let stored = repository.save(document)?;
        let id = stored
            .id
            .ok_or_else(|| RepositoryError::Unavailable("repository did not assign an id".into()))?;
        self.current = stored;
        Ok(id)
    }

    /// Replaces the buffer with a stored assessment.
    pub fn load<R: AssessmentRepository + ?Sized>(
        &mut self,
        repository: &R,
        id: &AssessmentId,
    ) -> Result<(), SessionError> {
        let document = repository.load(id)?.ok_or(SessionError::NotFound(*id))?;
        self.current = document;
        Ok(())
    }
}
