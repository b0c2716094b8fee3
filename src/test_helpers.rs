//! Shared test utilities for the zine-weaver test suite.
//!
//! Fixture content lives in `fixtures/content/`:
//!
//! ```text
//! fixtures/content/
//! ├── config.toml                  # base_url = "/zines/"
//! ├── 001-the-black-box.json       # published, one block of every type
//! └── series/
//!     └── 002-static.json          # draft, shares the cover asset of 001
//! ```
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! write_json(tmp.path(), "003-broken.json", &json!({"id": "x"}));
//!
//! let mut zine = valid_zine_json();
//! block_mut(&mut zine, 2, 0)["speech"] = json!("bare");
//! ```

use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

use crate::store::ZineStore;
use crate::types::Zine;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `value` as pretty JSON to `dir/name`, creating parent directories.
pub fn write_json(dir: &Path, name: &str, value: &Value) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

// =========================================================================
// Documents
// =========================================================================

/// The published fixture zine: valid, with one block of every type.
///
/// Layout (page, block):
/// - (0, 0) cover
/// - (1, 0) scene, (1, 1) timeline
/// - (2, 0) dialogue, (2, 1) prompt_block, (2, 2) quote, (2, 3) questions,
///   (2, 4) visual_data
/// - (3, 0) transition, (3, 1) series_list, (3, 2) colophon
pub fn valid_zine_json() -> Value {
    serde_json::from_str(include_str!("../fixtures/content/001-the-black-box.json")).unwrap()
}

/// Mutable access to block `block` of page `page`.
pub fn block_mut(zine: &mut Value, page: usize, block: usize) -> &mut Value {
    &mut zine["pages"][page]["blocks"][block]
}

/// The fixture zine with its identity swapped, as a typed value.
pub fn zine_with(slug: &str, issue_number: u32, published: bool) -> Zine {
    let mut json = valid_zine_json();
    json["id"] = Value::from(format!("zine-{slug}"));
    json["slug"] = Value::from(slug);
    json["metadata"]["issue_number"] = Value::from(issue_number);
    json["metadata"]["status"] = Value::from(if published { "published" } else { "draft" });
    serde_json::from_value(json).unwrap()
}

// =========================================================================
// Store lookups
// =========================================================================

/// Slugs in store order.
pub fn slugs(store: &ZineStore) -> Vec<&str> {
    store.zines().map(|z| z.slug.as_str()).collect()
}
