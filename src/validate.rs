//! Schema validation for authored zine documents.
//!
//! Zines are authored offline as JSON and checked here before they may enter
//! the [`ZineStore`](crate::store::ZineStore). The validator walks the untyped
//! document rather than the typed model so it can describe wrong types and
//! missing fields that would otherwise surface as a single opaque
//! deserialization error.
//!
//! ## Behaviour
//!
//! - **Exhaustive**: every check runs; one call surfaces every problem in the
//!   document.
//! - **Report-only**: nothing here returns `Err` or panics, whatever the input.
//!   Callers decide what a non-empty list means (the store refuses the file).
//! - **Pure**: no I/O and no shared state, so documents can be validated in
//!   parallel.
//!
//! ## Presence
//!
//! A field counts as missing when it is absent, `null`, `false`, `0`, or the
//! empty string. Optional localized fields (`narrative`, `context`, ...) are
//! only checked when present by that rule.
//!
//! ## Messages
//!
//! Errors carry a path and an [`ErrorKind`]; their `Display` form is the
//! message authors see:
//!
//! ```text
//! [001-black-box.json] Missing slug
//! [001-black-box.json] metadata.title.en is missing
//! [001-black-box.json] Page 3 blocks missing
//! Page 2 Block 4 (dialogue).speech.pt is missing
//! Page 1 Block 0 (timeline).segments[1].proportion must be a number
//! Page 0 Block 2 (bogus): Unknown block type 'bogus'
//! ```

use crate::types::{BlockKind, REQUIRED_LANGUAGES};
use serde_json::Value;
use std::fmt;

/// What went wrong at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// `{path} is missing`
    Missing,
    /// `{path} Missing {key}`, used for top-level document keys.
    MissingKey { key: &'static str },
    /// `{path} blocks missing`, for a page without a `blocks` field.
    MissingBlocks,
    /// `{path}: Expected localized string object, got {found}`
    NotLocalized { found: &'static str },
    /// `{path} must be a number`
    NotANumber,
    /// `{path} must be an array`
    NotAnArray,
    /// `{path}: Unknown block type '{tag}'`
    UnknownBlockType { tag: String },
}

/// Coarse grouping of [`ErrorKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    MissingField,
    WrongType,
    UnknownVariant,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::Missing | ErrorKind::MissingKey { .. } | ErrorKind::MissingBlocks => {
                ErrorCategory::MissingField
            }
            ErrorKind::NotLocalized { found: "undefined" } => ErrorCategory::MissingField,
            ErrorKind::NotLocalized { .. } | ErrorKind::NotANumber | ErrorKind::NotAnArray => {
                ErrorCategory::WrongType
            }
            ErrorKind::UnknownBlockType { .. } => ErrorCategory::UnknownVariant,
        }
    }
}

/// A single finding: where, and what kind of problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub path: String,
    pub kind: ErrorKind,
}

impl ValidationError {
    fn new(path: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.path;
        match &self.kind {
            ErrorKind::Missing => write!(f, "{path} is missing"),
            ErrorKind::MissingKey { key } => write!(f, "{path} Missing {key}"),
            ErrorKind::MissingBlocks => write!(f, "{path} blocks missing"),
            ErrorKind::NotLocalized { found } => {
                write!(f, "{path}: Expected localized string object, got {found}")
            }
            ErrorKind::NotANumber => write!(f, "{path} must be a number"),
            ErrorKind::NotAnArray => write!(f, "{path} must be an array"),
            ErrorKind::UnknownBlockType { tag } => {
                write!(f, "{path}: Unknown block type '{tag}'")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// The outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// File identifier the document was checked under.
    pub file: String,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rendered error messages, in check order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Validate a document and wrap the findings in a [`ValidationReport`].
pub fn check(zine: &Value, file_name: &str) -> ValidationReport {
    ValidationReport {
        file: file_name.to_string(),
        errors: validate_zine(zine, file_name),
    }
}

/// Check a whole zine document. An empty result means it is well-formed.
pub fn validate_zine(zine: &Value, file_name: &str) -> Vec<ValidationError> {
    let root = format!("[{file_name}]");
    let mut errors = Vec::new();

    if !is_present(zine.get("id")) {
        errors.push(ValidationError::new(&root, ErrorKind::MissingKey { key: "id" }));
    }
    if !is_present(zine.get("slug")) {
        errors.push(ValidationError::new(&root, ErrorKind::MissingKey { key: "slug" }));
    }

    match zine.get("metadata") {
        Some(metadata) if is_present(Some(metadata)) => {
            errors.extend(validate_metadata(metadata, &root));
        }
        _ => errors.push(ValidationError::new(
            &root,
            ErrorKind::MissingKey { key: "metadata" },
        )),
    }

    match zine.get("pages") {
        Some(Value::Array(pages)) => {
            for (page_index, page) in pages.iter().enumerate() {
                errors.extend(validate_page(page, page_index, &root));
            }
        }
        _ => errors.push(ValidationError::new(
            format!("{root} Pages"),
            ErrorKind::NotAnArray,
        )),
    }

    errors
}

fn validate_metadata(metadata: &Value, root: &str) -> Vec<ValidationError> {
    let path = format!("{root} metadata");
    let mut errors = Vec::new();
    for field in ["title", "subtitle", "series_title"] {
        errors.extend(localized(metadata.get(field), format!("{path}.{field}")));
    }
    errors.extend(require_number(metadata, "issue_number", &path));
    errors
}

fn validate_page(page: &Value, page_index: usize, root: &str) -> Vec<ValidationError> {
    let path = format!("{root} Page {page_index}");
    match page.get("blocks") {
        Some(Value::Array(blocks)) => blocks
            .iter()
            .enumerate()
            .flat_map(|(index, block)| validate_block(block, index, page_index))
            .collect(),
        Some(blocks) if is_present(Some(blocks)) => vec![ValidationError::new(
            format!("{path} blocks"),
            ErrorKind::NotAnArray,
        )],
        _ => vec![ValidationError::new(path, ErrorKind::MissingBlocks)],
    }
}

/// Check one block. Paths are prefixed `Page <page> Block <index> (<type>)`.
pub fn validate_block(block: &Value, index: usize, page_index: usize) -> Vec<ValidationError> {
    let tag = block.get("type");
    let path = format!("Page {page_index} Block {index} ({})", display_tag(tag));
    let mut errors = Vec::new();

    if !is_present(block.get("id")) {
        errors.push(ValidationError::new(format!("{path}: id"), ErrorKind::Missing));
    }

    let Some(kind) = tag.and_then(Value::as_str).and_then(BlockKind::from_tag) else {
        errors.push(ValidationError::new(
            path,
            ErrorKind::UnknownBlockType {
                tag: display_tag(tag),
            },
        ));
        return errors;
    };

    errors.extend(match kind {
        BlockKind::Cover => cover(block, &path),
        BlockKind::Scene => scene(block, &path),
        BlockKind::Dialogue => dialogue(block, &path),
        BlockKind::PromptBlock => prompt_block(block, &path),
        BlockKind::Timeline => timeline(block, &path),
        BlockKind::Quote => quote(block, &path),
        BlockKind::Questions => questions(block, &path),
        BlockKind::SeriesList => series_list(block, &path),
        BlockKind::Colophon => colophon(block, &path),
        BlockKind::Transition => Vec::new(),
        BlockKind::VisualData => visual_data(block, &path),
    });
    errors
}

// ============================================================================
// Per-type checklists
// ============================================================================

fn cover(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for field in ["title", "subtitle", "series_title"] {
        errors.extend(localized_field(block, field, path));
    }
    errors.extend(require_number(block, "issue_number", path));
    errors.extend(image_spec(block.get("image"), format!("{path}.image")));
    errors.extend(require(block, "mood", path));
    errors
}

fn scene(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors = image_spec(block.get("image"), format!("{path}.image"));
    errors.extend(optional_localized_field(block, "narrative", path));
    errors.extend(require(block, "mood", path));
    errors.extend(require(block, "layout", path));
    errors
}

fn dialogue(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors: Vec<_> = require(block, "speaker", path).into_iter().collect();
    errors.extend(localized_field(block, "speech", path));
    errors.extend(optional_localized_field(block, "context", path));
    errors
}

fn prompt_block(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors = localized_field(block, "prompt_text", path);
    errors.extend(optional_localized_field(block, "context", path));
    errors
}

fn timeline(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors = each_entry(block, "segments", path, |segment, seg_path| {
        let mut errors = localized_field(segment, "label", seg_path);
        errors.extend(localized_field(segment, "sublabel", seg_path));
        errors.extend(require_number(segment, "proportion", seg_path));
        errors.extend(require(segment, "color", seg_path));
        errors
    });
    errors.extend(localized_field(block, "caption", path));
    errors
}

fn quote(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors = localized_field(block, "quote_text", path);
    errors.extend(optional_localized_field(block, "attribution", path));
    errors.extend(require(block, "style", path));
    errors
}

fn questions(block: &Value, path: &str) -> Vec<ValidationError> {
    each_entry(block, "questions", path, |question, q_path| {
        localized(Some(question), q_path.to_string())
    })
}

fn series_list(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors = localized_field(block, "series_title", path);
    errors.extend(require_number(block, "current_issue", path));
    errors.extend(each_entry(block, "zines", path, |entry, entry_path| {
        let mut errors = localized_field(entry, "title", entry_path);
        errors.extend(localized_field(entry, "subtitle", entry_path));
        errors.extend(require_number(entry, "number", entry_path));
        errors.extend(require(entry, "status", entry_path));
        errors
    }));
    errors
}

fn colophon(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors = localized_field(block, "permissions", path);
    errors.extend(localized_field(block, "call_to_action", path));
    errors.extend(optional_localized_field(block, "credits", path));
    errors
}

fn visual_data(block: &Value, path: &str) -> Vec<ValidationError> {
    let mut errors: Vec<_> = require(block, "visualization_type", path)
        .into_iter()
        .collect();
    errors.extend(localized_field(block, "caption", path));
    errors
}

// ============================================================================
// Field checks
// ============================================================================

/// Check a `LocalizedString` value at `path`.
fn localized(value: Option<&Value>, path: String) -> Vec<ValidationError> {
    let Some(object) = value.filter(|v| v.is_object() || v.is_array()) else {
        return vec![ValidationError::new(
            path,
            ErrorKind::NotLocalized {
                found: type_name(value),
            },
        )];
    };
    REQUIRED_LANGUAGES
        .into_iter()
        .filter(|lang| !is_present(object.get(*lang)))
        .map(|lang| ValidationError::new(format!("{path}.{lang}"), ErrorKind::Missing))
        .collect()
}

fn localized_field(parent: &Value, field: &str, path: &str) -> Vec<ValidationError> {
    localized(parent.get(field), format!("{path}.{field}"))
}

fn optional_localized_field(parent: &Value, field: &str, path: &str) -> Vec<ValidationError> {
    if is_present(parent.get(field)) {
        localized_field(parent, field, path)
    } else {
        Vec::new()
    }
}

fn image_spec(image: Option<&Value>, path: String) -> Vec<ValidationError> {
    let Some(image) = image.filter(|v| is_present(Some(*v))) else {
        return vec![ValidationError::new(path, ErrorKind::Missing)];
    };
    let mut errors = localized_field(image, "description", &path);
    errors.extend(localized_field(image, "alt_text", &path));
    errors.extend(require(image, "suggested_style", &path));
    errors
}

fn require(parent: &Value, field: &str, path: &str) -> Option<ValidationError> {
    (!is_present(parent.get(field)))
        .then(|| ValidationError::new(format!("{path}.{field}"), ErrorKind::Missing))
}

fn require_number(parent: &Value, field: &str, path: &str) -> Option<ValidationError> {
    (!parent.get(field).is_some_and(Value::is_number))
        .then(|| ValidationError::new(format!("{path}.{field}"), ErrorKind::NotANumber))
}

/// Require `parent.field` to be an array and run `check` on every entry
/// with its `field[i]` path.
fn each_entry<F>(parent: &Value, field: &str, path: &str, check: F) -> Vec<ValidationError>
where
    F: Fn(&Value, &str) -> Vec<ValidationError>,
{
    match parent.get(field) {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| check(entry, &format!("{path}.{field}[{i}]")))
            .collect(),
        _ => vec![ValidationError::new(
            format!("{path}.{field}"),
            ErrorKind::NotAnArray,
        )],
    }
}

// ============================================================================
// JSON value helpers
// ============================================================================

/// Presence rule shared by every check: absent, `null`, `false`, `0` and
/// `""` are missing.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Name of a value's type as reported in `NotLocalized` messages.
fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Null | Value::Array(_) | Value::Object(_)) => "object",
    }
}

/// How a block's `type` appears in paths and unknown-type messages.
fn display_tag(tag: Option<&Value>) -> String {
    match tag {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(_)) => "[object Object]".to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_tag(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Number(n)) if n.is_f64() => match n.as_f64() {
            // Integral floats print without a fraction, and -0 as 0.
            Some(f) if f == 0.0 => "0".to_string(),
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}
