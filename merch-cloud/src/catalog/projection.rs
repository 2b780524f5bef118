//! `variants_summary` synchronizer
//!
//! Every listing write path ends in [`Synchronizer::sync`], which resolves the
//! listing and replaces its cached summary. Syncs of one listing are serialized
//! so a sync always observes every write that completed before it was triggered.

use std::sync::Arc;

use dashmap::DashMap;
use shared::models::ResolvedVariant;
use tokio::sync::Mutex;

use super::resolve::resolve_listing;
use crate::db::{RepoError, RepoResult, Repository};

pub struct Synchronizer {
    repo: Arc<dyn Repository>,
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl Synchronizer {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self {
            repo,
            locks: DashMap::new(),
        }
    }

    /// Recompute and persist the summary of one listing.
    ///
    /// Returns the written summary; a listing deleted meanwhile yields an empty one.
    pub async fn sync(&self, listing_id: i64) -> RepoResult<Vec<ResolvedVariant>> {
        let lock = self.lock_for(listing_id);
        let result = {
            let _guard = lock.lock().await;
            self.sync_locked(listing_id).await
        };
        drop(lock);
        self.locks
            .remove_if(&listing_id, |_, l| Arc::strong_count(l) == 1);
        result
    }

    /// Re-sync every listing of a catalog product; returns how many were synced
    pub async fn resync_catalog_product(&self, catalog_product_id: i64) -> RepoResult<usize> {
        let listings = self
            .repo
            .list_listings_by_catalog_product(catalog_product_id)
            .await?;
        for listing in &listings {
            self.sync(listing.id).await?;
        }
        tracing::debug!(
            catalog_product_id,
            listings = listings.len(),
            "Re-synced listings after catalog change"
        );
        Ok(listings.len())
    }

    /// Number of listings with a held or pending sync
    pub fn in_flight(&self) -> usize {
        self.locks.len()
    }

    fn lock_for(&self, listing_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(listing_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn sync_locked(&self, listing_id: i64) -> RepoResult<Vec<ResolvedVariant>> {
        let Some(listing) = self.repo.find_listing(listing_id).await? else {
            tracing::debug!(listing_id, "Listing gone before sync");
            return Ok(Vec::new());
        };
        let resolution = resolve_listing(self.repo.as_ref(), &listing).await?;
        match self
            .repo
            .write_variants_summary(listing_id, &resolution.variants)
            .await
        {
            Err(RepoError::NotFound(_)) => return Ok(Vec::new()),
            other => other?,
        }
        tracing::debug!(
            listing_id,
            variants = resolution.variants.len(),
            dangling = resolution.dangling,
            "variants_summary synced"
        );
        Ok(resolution.variants)
    }
}
