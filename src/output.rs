//! CLI output formatting.
//!
//! Output is a content inventory: each zine is shown by issue number and
//! title, with its slug and size as indented context lines. Rejected documents
//! are listed by file with every validation message underneath, so one run
//! tells an author everything that needs fixing.
//!
//! ## Check
//!
//! ```text
//! Zines
//! 001 The Black Box (4 pages)
//!     Slug: the-black-box
//!     Blocks: 11
//! 002 Static (2 pages) [draft]
//!     Slug: static
//!     Blocks: 2
//!
//! Rejected
//! 003-broken.json
//!     Page 2 Block 0 (dialogue).speech.pt is missing
//! ```
//!
//! ## Sync
//!
//! ```text
//! 001 The Black Box → the-black-box
//!
//! Published 1 zine (1 draft skipped) → dist/zines.json
//! Precache: 5 assets in zine-offline-assets-v1 (version 3f2a9c1e0b7d)
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::store::{LoadOutcome, Rejection, ZineStore};
use crate::sync::{self, SyncResult};
use crate::types::Zine;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format an issue number as 3-digit zero-padded.
fn format_index(pos: u32) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Header line for a zine: issue, title, page count, draft marker.
///
/// ```text
/// 001 The Black Box (4 pages)
/// 002 Static (2 pages) [draft]
/// ```
fn zine_header(zine: &Zine, lang: &str) -> String {
    let draft = if zine.is_published() { "" } else { " [draft]" };
    format!(
        "{} {} ({}){draft}",
        format_index(zine.metadata.issue_number),
        zine.metadata.title.resolve(lang),
        plural(zine.pages.len(), "page"),
    )
}

/// Rejected files, each followed by its indented messages.
fn format_rejections(rejected: &[Rejection]) -> Vec<String> {
    let mut lines = Vec::new();
    for rejection in rejected {
        lines.push(rejection.file.clone());
        for message in rejection.messages() {
            lines.push(format!("{}{message}", indent(1)));
        }
    }
    lines
}

/// Shorten a hex digest for display.
fn short_version(version: &str) -> &str {
    &version[..version.len().min(12)]
}

// ============================================================================
// Commands
// ============================================================================

/// Inventory of accepted zines.
pub fn format_list_output(store: &ZineStore, lang: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for zine in store.zines() {
        lines.push(zine_header(zine, lang));
        lines.push(format!("{}Slug: {}", indent(1), zine.slug));
        lines.push(format!("{}Blocks: {}", indent(1), zine.block_count()));
    }
    lines
}

pub fn print_list_output(store: &ZineStore, lang: &str) {
    for line in format_list_output(store, lang) {
        println!("{}", line);
    }
}

/// Result of `check`: the accepted inventory, then every rejection.
pub fn format_check_output(outcome: &LoadOutcome, lang: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if !outcome.store.is_empty() {
        lines.push("Zines".to_string());
        lines.extend(format_list_output(&outcome.store, lang));
    }

    if !outcome.rejected.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Rejected".to_string());
        lines.extend(format_rejections(&outcome.rejected));
    }

    lines
}

pub fn print_check_output(outcome: &LoadOutcome, lang: &str) {
    for line in format_check_output(outcome, lang) {
        println!("{}", line);
    }
}

/// Result of `sync`: what was published where, and the precache summary.
pub fn format_sync_output(result: &SyncResult, output_dir: &Path, lang: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for summary in &result.published {
        lines.push(format!(
            "{} {} → {}",
            format_index(summary.issue_number),
            summary.title.resolve(lang),
            summary.slug
        ));
    }

    if !result.rejected.is_empty() {
        lines.push(String::new());
        lines.push("Rejected (left out)".to_string());
        lines.extend(format_rejections(&result.rejected));
    }

    lines.push(String::new());
    let skipped = if result.skipped_drafts > 0 {
        format!(" ({} skipped)", plural(result.skipped_drafts, "draft"))
    } else {
        String::new()
    };
    lines.push(format!(
        "Published {}{skipped} → {}",
        plural(result.published.len(), "zine"),
        output_dir.join(sync::ZINES_FILENAME).display()
    ));
    lines.push(format!(
        "Precache: {} in {} (version {})",
        plural(result.precache.urls.len(), "asset"),
        result.precache.cache_name,
        short_version(&result.precache.version)
    ));

    lines
}

pub fn print_sync_output(result: &SyncResult, output_dir: &Path, lang: &str) {
    for line in format_sync_output(result, output_dir, lang) {
        println!("{}", line);
    }
}
