//! Appetite scoring core: band configuration, weight normalization, the
//! scoring engine, statement rendering and guardrail checks.

pub mod bands;
pub mod domain;
pub mod engine;
pub mod guardrails;
pub mod normalizer;
pub mod statement;

pub use bands::{load_bands, save_bands, Band, BandConfigError, BandSet};
pub use domain::{
    AppetiteRequest, AppetiteRequestPayload, AssessmentCategory, Context, Dimension,
    ValidationError,
};
pub use engine::{
    calculate, AppetiteCalculator, AppetiteResult, AuditRecord, CalculationStep, Contribution,
};
pub use guardrails::{
    default_guards, evaluate_guardrails, has_breach, Guard, GuardEvaluation, GuardStatus,
};
pub use normalizer::normalize_weights;
pub use statement::generate_statement;
