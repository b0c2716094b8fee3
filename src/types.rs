//! Typed zine model.
//!
//! Authored zine documents are JSON files. They are checked against the block
//! schema by [`crate::validate`] as untyped `serde_json::Value`s first; only
//! documents with an empty error list are deserialized into these types and
//! admitted to the [`crate::store::ZineStore`].
//!
//! Every field the validator does not require is optional (or defaulted) here,
//! so a document the validator accepts also deserializes. Tags the reader maps
//! to presentation (mood, layout, speaker, quote style) stay plain strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language codes every user-facing text must carry.
pub const REQUIRED_LANGUAGES: [&str; 2] = ["en", "pt"];

/// Text keyed by language code.
///
/// `en` and `pt` are required by validation; any other language key is kept
/// as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedString(BTreeMap<String, String>);

impl LocalizedString {
    pub fn new(en: impl Into<String>, pt: impl Into<String>) -> Self {
        Self::default().with("en", en).with("pt", pt)
    }

    /// Builder-style insert of an extra language variant.
    pub fn with(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(lang.into(), text.into());
        self
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    /// Text in `lang`, falling back to English, then to the empty string.
    pub fn resolve(&self, lang: &str) -> &str {
        self.get(lang)
            .filter(|t| !t.is_empty())
            .or_else(|| self.get("en"))
            .unwrap_or_default()
    }

    pub fn pt(&self) -> &str {
        self.get("pt").unwrap_or_default()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Image to be sourced or generated for a cover or scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub description: LocalizedString,
    pub alt_text: LocalizedString,
    pub suggested_style: String,
    /// Path under the public asset root, once the image exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZineStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZineMetadata {
    pub title: LocalizedString,
    pub subtitle: LocalizedString,
    pub series_title: LocalizedString,
    pub issue_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub status: ZineStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<LocalizedString>,
}

/// The unit of published content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zine {
    pub id: String,
    /// Lookup and routing key, unique across the store.
    pub slug: String,
    pub metadata: ZineMetadata,
    pub pages: Vec<Page>,
}

impl Zine {
    pub fn is_published(&self) -> bool {
        self.metadata.status == ZineStatus::Published
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Cover,
    #[default]
    Content,
    BackCover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<LocalizedString>,
    pub blocks: Vec<Block>,
}

/// The eleven block tags, independent of block contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Cover,
    Scene,
    Dialogue,
    PromptBlock,
    Timeline,
    Quote,
    Questions,
    SeriesList,
    Colophon,
    Transition,
    VisualData,
}

impl BlockKind {
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Cover,
        BlockKind::Scene,
        BlockKind::Dialogue,
        BlockKind::PromptBlock,
        BlockKind::Timeline,
        BlockKind::Quote,
        BlockKind::Questions,
        BlockKind::SeriesList,
        BlockKind::Colophon,
        BlockKind::Transition,
        BlockKind::VisualData,
    ];

    /// The `type` tag as written in zine documents.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Cover => "cover",
            BlockKind::Scene => "scene",
            BlockKind::Dialogue => "dialogue",
            BlockKind::PromptBlock => "prompt_block",
            BlockKind::Timeline => "timeline",
            BlockKind::Quote => "quote",
            BlockKind::Questions => "questions",
            BlockKind::SeriesList => "series_list",
            BlockKind::Colophon => "colophon",
            BlockKind::Transition => "transition",
            BlockKind::VisualData => "visual_data",
        }
    }

    pub fn from_tag(tag: &str) -> Option<BlockKind> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

/// A typed content unit within a page, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Cover(CoverBlock),
    Scene(SceneBlock),
    Dialogue(DialogueBlock),
    PromptBlock(PromptBlock),
    Timeline(TimelineBlock),
    Quote(QuoteBlock),
    Questions(QuestionsBlock),
    SeriesList(SeriesListBlock),
    Colophon(ColophonBlock),
    Transition(TransitionBlock),
    VisualData(VisualDataBlock),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Cover(_) => BlockKind::Cover,
            Block::Scene(_) => BlockKind::Scene,
            Block::Dialogue(_) => BlockKind::Dialogue,
            Block::PromptBlock(_) => BlockKind::PromptBlock,
            Block::Timeline(_) => BlockKind::Timeline,
            Block::Quote(_) => BlockKind::Quote,
            Block::Questions(_) => BlockKind::Questions,
            Block::SeriesList(_) => BlockKind::SeriesList,
            Block::Colophon(_) => BlockKind::Colophon,
            Block::Transition(_) => BlockKind::Transition,
            Block::VisualData(_) => BlockKind::VisualData,
        }
    }

    /// The illustration carried by covers and scenes.
    pub fn image(&self) -> Option<&ImageSpec> {
        match self {
            Block::Cover(b) => Some(&b.image),
            Block::Scene(b) => Some(&b.image),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverBlock {
    pub id: String,
    pub title: LocalizedString,
    pub subtitle: LocalizedString,
    pub series_title: LocalizedString,
    pub issue_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_label: Option<LocalizedString>,
    pub image: ImageSpec,
    pub mood: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBlock {
    pub id: String,
    pub image: ImageSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<LocalizedString>,
    pub mood: String,
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueBlock {
    pub id: String,
    /// `human`, `black_box` or `narrator`.
    pub speaker: String,
    pub speech: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<LocalizedString>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptBlock {
    pub id: String,
    pub prompt_text: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<LocalizedString>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub label: LocalizedString,
    pub sublabel: LocalizedString,
    /// Share of the bar this segment occupies.
    pub proportion: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBlock {
    pub id: String,
    pub segments: Vec<TimelineSegment>,
    pub caption: LocalizedString,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBlock {
    pub id: String,
    pub quote_text: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<LocalizedString>,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionsBlock {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_text: Option<LocalizedString>,
    pub questions: Vec<LocalizedString>,
}

/// One issue as listed on a series page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZineListItem {
    pub number: u32,
    pub title: LocalizedString,
    pub subtitle: LocalizedString,
    /// `current`, `upcoming` or `available`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesListBlock {
    pub id: String,
    pub series_title: LocalizedString,
    pub current_issue: u32,
    pub zines: Vec<ZineListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColophonBlock {
    pub id: String,
    pub permissions: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<LocalizedString>,
    pub call_to_action: LocalizedString,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionBlock {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDataBlock {
    pub id: String,
    pub visualization_type: String,
    /// Free-form payload interpreted by the visualization.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    pub caption: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<LocalizedString>,
}
