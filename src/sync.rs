//! Content sync: validate everything, then write the published bundle.
//!
//! This is the gate between authoring and publication. The reader never sees a
//! document that has not passed [`crate::validate`].
//!
//! ## Output
//!
//! ```text
//! dist/
//! ├── zines.json      # published zines, issue order
//! └── precache.json   # { cache_name, version, urls } for the offline reader
//! ```
//!
//! `version` is the SHA-256 of the written `zines.json`, so the reader's
//! offline cache is invalidated whenever published content changes and left
//! alone when it doesn't.
//!
//! ## Rejections
//!
//! With `sync.strict` (the default) a single rejected document aborts the sync
//! before anything is written. Without it, rejected documents are reported in
//! [`SyncResult::rejected`] and simply left out of the bundle.

use crate::config::PipelineConfig;
use crate::store::{self, Rejection, StoreError};
use crate::types::{LocalizedString, Zine, ZineStatus};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const ZINES_FILENAME: &str = "zines.json";
pub const PRECACHE_FILENAME: &str = "precache.json";

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("{} document(s) failed validation", .0.len())]
    Rejected(Vec<Rejection>),
}

/// What the offline reader pre-fetches, and under which cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecacheManifest {
    pub cache_name: String,
    pub version: String,
    pub urls: Vec<String>,
}

/// Inventory line for one published zine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZineSummary {
    pub slug: String,
    pub issue_number: u32,
    pub title: LocalizedString,
    pub status: ZineStatus,
    pub pages: usize,
    pub blocks: usize,
}

impl From<&Zine> for ZineSummary {
    fn from(zine: &Zine) -> Self {
        Self {
            slug: zine.slug.clone(),
            issue_number: zine.metadata.issue_number,
            title: zine.metadata.title.clone(),
            status: zine.metadata.status,
            pages: zine.pages.len(),
            blocks: zine.block_count(),
        }
    }
}

#[derive(Debug)]
pub struct SyncResult {
    pub published: Vec<ZineSummary>,
    /// Drafts left out because `sync.include_drafts` is off.
    pub skipped_drafts: usize,
    /// Only non-empty when `sync.strict` is off.
    pub rejected: Vec<Rejection>,
    pub precache: PrecacheManifest,
}

/// Load `source`, and write the bundle for its accepted zines to `output`.
pub fn sync(
    source: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<SyncResult, SyncError> {
    let outcome = store::load_dir(source)?;
    if config.sync.strict && !outcome.is_clean() {
        tracing::warn!(
            rejected = outcome.rejected.len(),
            "sync aborted, nothing written"
        );
        return Err(SyncError::Rejected(outcome.rejected));
    }

    let selected: Vec<&Zine> = outcome
        .store
        .zines()
        .filter(|z| config.sync.include_drafts || z.is_published())
        .collect();
    let skipped_drafts = outcome.store.len() - selected.len();

    fs::create_dir_all(output)?;
    let bundle = serde_json::to_string_pretty(&selected)?;
    fs::write(output.join(ZINES_FILENAME), &bundle)?;

    let precache = PrecacheManifest {
        cache_name: config.offline.cache_name.clone(),
        version: content_version(bundle.as_bytes()),
        urls: store::asset_urls(selected.iter().copied(), &config.base_url, &config.offline),
    };
    fs::write(
        output.join(PRECACHE_FILENAME),
        serde_json::to_string_pretty(&precache)?,
    )?;

    tracing::info!(
        published = selected.len(),
        skipped_drafts,
        rejected = outcome.rejected.len(),
        assets = precache.urls.len(),
        "sync complete"
    );

    Ok(SyncResult {
        published: selected.into_iter().map(ZineSummary::from).collect(),
        skipped_drafts,
        rejected: outcome.rejected,
        precache,
    })
}

/// SHA-256 of the bundle, as a hex string.
pub fn content_version(bundle: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bundle))
}
