//! fw-validate: read-only integrity reporting over a merged graph.
//!
//! Produces a structured [`ValidationReport`] — statistics, border
//! integrity, schema compliance and critical-connection checks. Findings
//! are diagnostic PASS/WARNING only, never errors; rendering the report
//! for humans is a collaborator's job.

pub mod config;
pub mod report;
pub mod schema;
pub mod validator;

pub use config::{CriticalConnectionSpec, SchemaMapping, ValidationConfig};
pub use report::{
    BorderIntegrity, CheckStatus, CriticalConnections, SchemaCompliance, Statistics,
    ValidationReport,
};
pub use schema::apply_schema_mapping;
pub use validator::GraphValidator;
