//! Migration report

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStep {
    Users,
    CatalogProducts,
    Variants,
    Stores,
    Listings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCounts {
    pub created: usize,
    pub skipped_existing: usize,
    pub failed: usize,
}

/// A per-entity problem; never aborts the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationFailure {
    pub step: MigrationStep,
    pub entity: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub users_promoted: u64,
    pub catalog_products: StepCounts,
    pub variants: StepCounts,
    pub stores: StepCounts,
    pub listings: StepCounts,
    pub overrides_written: usize,
    /// Inline `data:` images blanked out; they must be uploaded again
    pub images_needing_reupload: usize,
    pub failures: Vec<MigrationFailure>,
}

impl MigrationReport {
    pub fn record_failure(
        &mut self,
        step: MigrationStep,
        entity: impl Into<String>,
        message: impl Into<String>,
    ) {
        let failure = MigrationFailure {
            step,
            entity: entity.into(),
            message: message.into(),
        };
        tracing::warn!(
            step = ?failure.step,
            entity = %failure.entity,
            message = %failure.message,
            "Migration entity failure"
        );
        self.failures.push(failure);
    }
}
