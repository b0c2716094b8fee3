//! # Zine Weaver
//!
//! Content pipeline for an offline-first, bilingual (English/Portuguese) zine
//! reader. Zines are authored as JSON documents: pages of typed blocks (cover,
//! scene, dialogue, timeline, ...) whose text is always a
//! [`LocalizedString`](types::LocalizedString). This crate decides which of
//! those documents may be published and produces what the reader loads.
//!
//! # Architecture: Validate, Store, Sync
//!
//! ```text
//! 1. Validate   document.json  →  [error, ...]        (pure, exhaustive)
//! 2. Store      content/       →  ZineStore           (only valid documents)
//! 3. Sync       ZineStore      →  dist/zines.json     (published bundle)
//!                              →  dist/precache.json  (offline asset list)
//! ```
//!
//! - **Validation is report-only.** [`validate::validate_zine`] never fails;
//!   it returns every problem in the document at once. The
//!   [`store`] is what turns a non-empty report into a refusal.
//! - **The store is the gate.** Nothing reaches [`sync`] output without
//!   passing validation and decoding into the typed model.
//! - **Parallel where it is free.** Documents are validated on the rayon
//!   pool; validation has no shared state, and admission happens afterwards in
//!   path order so results never depend on scheduling.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`validate`] | Block-schema validator producing path-prefixed errors |
//! | [`types`] | Typed zine model: `Zine`, `Page`, `Block`, `LocalizedString`, `ImageSpec` |
//! | [`store`] | Loads a content directory, admits valid zines, lists rejections |
//! | [`sync`] | Writes the published bundle and precache manifest |
//! | [`assets`] | Base-URL aware asset and fallback image URLs |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Unknown Block Types
//!
//! A block whose `type` is not one of the eleven known tags is rejected with a
//! single "Unknown block type" error. New block types need a validator arm
//! and a model variant before documents may use them.

pub mod assets;
pub mod config;
pub mod output;
pub mod store;
pub mod sync;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
