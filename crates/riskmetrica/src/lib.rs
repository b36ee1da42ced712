//! Risk appetite scoring: weighted dimensions in, appetite band, statement,
//! audit trail and guardrail report out.

pub mod appetite;
pub mod assessments;
pub mod config;
pub mod error;
pub mod telemetry;
