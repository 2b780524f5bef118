//! One-shot migration from the legacy single-table product model
//!
//! Run through the `merch-migrate` binary. Safe to re-run.

pub mod engine;
pub mod legacy;
pub mod report;
pub mod transform;

pub use engine::run;
pub use legacy::{LegacySnapshot, LegacySource, PgLegacySource};
pub use report::{MigrationFailure, MigrationReport, MigrationStep, StepCounts};
