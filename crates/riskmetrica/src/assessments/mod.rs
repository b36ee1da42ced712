//! Saved assessments: the editable document, the per-user session buffer,
//! file-backed storage, board-pack export and the HTTP surface over them.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{AssessmentDocument, AssessmentId, AssessmentSummary, WorkflowStatus};
pub use export::{render_guardrail_report, render_markdown, render_result_json};
pub use repository::{AssessmentRepository, FileAssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use service::{
    AssessmentService, AssessmentServiceError, EvaluationReport, EvaluationRequest,
};
pub use session::{AssessmentSession, SessionError};
