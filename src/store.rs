//! The zine content store.
//!
//! Holds every zine that passed validation, keyed by slug and ordered by
//! issue number. Documents reach the store through [`load_dir`], which walks a
//! content directory, validates each JSON document, and admits only those with
//! an empty error list. Everything else is returned as a [`Rejection`] so the
//! caller can show authors what to fix.
//!
//! ## Loading
//!
//! ```text
//! content/
//! ├── config.toml                 # not a document, ignored here
//! ├── 001-the-black-box.json      # → store (slug "the-black-box")
//! ├── series/002-static.json      # nested directories are walked too
//! └── .drafts/scratch.json        # hidden entries are skipped
//! ```
//!
//! Files are read and validated in parallel, then admitted one by one in
//! sorted path order, so which of two documents sharing a slug wins does not
//! depend on thread scheduling.

use crate::assets;
use crate::sync;
use crate::config::AssetConfig;
use crate::types::Zine;
use crate::validate::{self, ValidationReport};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File names the sync stage writes; never treated as documents.
pub const OUTPUT_FILES: &[&str] = &[sync::ZINES_FILENAME, sync::PRECACHE_FILENAME];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Duplicate slug '{0}'")]
    DuplicateSlug(String),
}

/// Why a document was kept out of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Not parseable as JSON.
    Parse(String),
    /// Parsed, but failed schema validation.
    Invalid(ValidationReport),
    /// Passed validation but does not fit the typed model (e.g. a fractional
    /// issue number). `path` locates the field, as `pages[1].blocks[0]`.
    Decode { path: String, message: String },
    /// Another admitted document already uses this slug.
    DuplicateSlug(String),
}

/// A document that did not make it into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Path relative to the content root.
    pub file: String,
    pub reason: RejectReason,
}

impl Rejection {
    /// Human-readable messages, one per problem.
    pub fn messages(&self) -> Vec<String> {
        let file = &self.file;
        match &self.reason {
            RejectReason::Parse(msg) => vec![format!("[{file}] Invalid JSON: {msg}")],
            RejectReason::Invalid(report) => report.messages(),
            RejectReason::Decode { path, message } => {
                vec![format!("[{file}] {path}: Does not match the zine model: {message}")]
            }
            RejectReason::DuplicateSlug(slug) => vec![format!("[{file}] Duplicate slug '{slug}'")],
        }
    }
}

/// Accepted zines, ordered by issue number then slug.
#[derive(Debug, Clone, Default)]
pub struct ZineStore {
    zines: Vec<Zine>,
}

impl ZineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zine. Slugs are unique; a second zine with the same slug is an
    /// error and leaves the store unchanged.
    pub fn insert(&mut self, zine: Zine) -> Result<(), StoreError> {
        if self.get(&zine.slug).is_some() {
            return Err(StoreError::DuplicateSlug(zine.slug));
        }
        self.add(zine);
        Ok(())
    }

    /// Insert at the sorted position; the caller has checked the slug.
    fn add(&mut self, zine: Zine) {
        let key = sort_key(&zine);
        let pos = self
            .zines
            .partition_point(|existing| sort_key(existing) <= key);
        self.zines.insert(pos, zine);
    }

    pub fn get(&self, slug: &str) -> Option<&Zine> {
        self.zines.iter().find(|z| z.slug == slug)
    }

    pub fn zines(&self) -> impl Iterator<Item = &Zine> {
        self.zines.iter()
    }

    /// Zines whose status is `published`.
    pub fn published(&self) -> impl Iterator<Item = &Zine> {
        self.zines.iter().filter(|z| z.is_published())
    }

    pub fn len(&self) -> usize {
        self.zines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zines.is_empty()
    }

    /// Asset URLs for every zine in the store. See [`asset_urls`].
    pub fn asset_urls(&self, base_url: &str, config: &AssetConfig) -> Vec<String> {
        asset_urls(self.zines(), base_url, config)
    }
}

fn sort_key(zine: &Zine) -> (u32, &str) {
    (zine.metadata.issue_number, zine.slug.as_str())
}

/// URLs the offline reader should pre-cache for `zines`.
///
/// Fallback images come first, then cover and scene images in zine, page and
/// block order. Each URL appears once, at its first occurrence.
pub fn asset_urls<'a>(
    zines: impl IntoIterator<Item = &'a Zine>,
    base_url: &str,
    config: &AssetConfig,
) -> Vec<String> {
    let image_urls = zines
        .into_iter()
        .flat_map(|zine| zine.blocks())
        .filter_map(|block| block.image()?.asset_path.as_deref())
        .filter(|path| !path.is_empty())
        .map(|path| assets::public_asset_url(base_url, path));

    let mut seen = HashSet::new();
    assets::fallback_image_urls(base_url, config)
        .into_iter()
        .chain(image_urls)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Result of loading a content directory.
#[derive(Debug)]
pub struct LoadOutcome {
    pub store: ZineStore,
    pub rejected: Vec<Rejection>,
}

impl LoadOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Load every zine document under `root` into a fresh store.
///
/// Only I/O failures are errors. Documents that fail to parse, validate, or
/// decode, and documents whose slug is already taken, end up in
/// [`LoadOutcome::rejected`].
pub fn load_dir(root: &Path) -> Result<LoadOutcome, StoreError> {
    let files = discover(root)?;
    tracing::debug!(root = %root.display(), files = files.len(), "discovered zine documents");

    let candidates = files
        .par_iter()
        .map(|path| load_file(root, path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut store = ZineStore::new();
    let mut rejected = Vec::new();
    for (file, candidate) in candidates {
        let result = candidate.and_then(|zine| {
            if store.get(&zine.slug).is_some() {
                return Err(RejectReason::DuplicateSlug(zine.slug));
            }
            store.add(zine);
            Ok(())
        });
        match result {
            Ok(()) => tracing::debug!(%file, "admitted zine"),
            Err(reason) => {
                tracing::warn!(%file, "rejected zine document");
                rejected.push(Rejection { file, reason });
            }
        }
    }

    Ok(LoadOutcome { store, rejected })
}

/// Read, parse, validate and decode one file.
fn load_file(root: &Path, path: &Path) -> Result<(String, Result<Zine, RejectReason>), StoreError> {
    let file = relative_name(root, path);
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_document(&content, &file);
    Ok((file, parsed))
}

/// Turn document text into an admitted-ready zine, or the reason it can't be.
pub fn parse_document(content: &str, file: &str) -> Result<Zine, RejectReason> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| RejectReason::Parse(e.to_string()))?;
    let report = validate::check(&value, file);
    if !report.is_valid() {
        return Err(RejectReason::Invalid(report));
    }
    serde_path_to_error::deserialize(value).map_err(|e| RejectReason::Decode {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

/// JSON files under `root`, sorted, skipping hidden entries and sync output.
fn discover(root: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_json = Path::new(&name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && !OUTPUT_FILES.contains(&name.as_str()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
