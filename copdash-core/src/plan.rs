//! Presentation plan: the ordered output of one routing pass.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::asset::AssetReference;
use crate::navigation::{Page, Section};

/// Narrative text. The body is markdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub body: String,
}

impl TextBlock {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            body: body.into(),
        }
    }

    pub fn body(body: impl Into<String>) -> Self {
        Self {
            heading: None,
            body: body.into(),
        }
    }
}

/// Why an asset slot holds a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum MissingReason {
    NotFound,
    Unreadable(String),
}

/// Placeholder for an asset that could not be found or read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnavailableAsset {
    pub reference: AssetReference,
    pub reason: MissingReason,
}

impl UnavailableAsset {
    /// Inline warning shown in place of the asset.
    pub fn message(&self) -> String {
        match &self.reason {
            MissingReason::NotFound => format!(
                "{} is unavailable: {} not found",
                self.reference.caption,
                self.reference.display_path()
            ),
            MissingReason::Unreadable(detail) => format!(
                "{} is unavailable: {} could not be read ({detail})",
                self.reference.caption,
                self.reference.display_path()
            ),
        }
    }
}

/// Offer to bundle a directory into a downloadable archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchiveOffer {
    pub label: String,
    /// Directory to bundle, including the asset root.
    pub source_dir: PathBuf,
    pub archive_name: String,
}

/// One slot in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PlanItem {
    Text(TextBlock),
    Asset(AssetReference),
    Unavailable(UnavailableAsset),
    Download(ArchiveOffer),
}

/// Items `start..end` came from a group gated on `section`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpan {
    pub section: Section,
    pub start: usize,
    pub end: usize,
}

/// Ordered sequence of text blocks and assets for one navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationPlan {
    pub page: Page,
    pub title: String,
    pub items: Vec<PlanItem>,
    /// Section-gated runs of `items`, in order, non-overlapping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionSpan>,
}

impl PresentationPlan {
    pub fn new(page: Page, title: impl Into<String>) -> Self {
        Self {
            page,
            title: title.into(),
            items: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Section the item at `index` belongs to, if it came from a gated group.
    pub fn section_at(&self, index: usize) -> Option<Section> {
        self.sections
            .iter()
            .find(|span| (span.start..span.end).contains(&index))
            .map(|span| span.section)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Present assets, in plan order.
    pub fn assets(&self) -> impl Iterator<Item = &AssetReference> {
        self.items.iter().filter_map(|item| match item {
            PlanItem::Asset(r) => Some(r),
            _ => None,
        })
    }

    /// Every asset slot, present or placeholder, in plan order.
    pub fn asset_slots(&self) -> impl Iterator<Item = &AssetReference> {
        self.items.iter().filter_map(|item| match item {
            PlanItem::Asset(r) => Some(r),
            PlanItem::Unavailable(u) => Some(&u.reference),
            _ => None,
        })
    }

    pub fn unavailable(&self) -> impl Iterator<Item = &UnavailableAsset> {
        self.items.iter().filter_map(|item| match item {
            PlanItem::Unavailable(u) => Some(u),
            _ => None,
        })
    }

    /// Content hash over every item, in order.
    ///
    /// Two plans have the same fingerprint exactly when they list the same
    /// items with the same captions in the same order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.page.slug().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.title.as_bytes());
        hasher.update(b"\n");
        for item in &self.items {
            let line = match item {
                PlanItem::Text(t) => format!(
                    "text\t{}\t{}",
                    t.heading.as_deref().unwrap_or(""),
                    t.body
                ),
                PlanItem::Asset(r) => format!(
                    "asset\t{}\t{}\t{}",
                    r.kind.label(),
                    r.display_path(),
                    r.caption
                ),
                PlanItem::Unavailable(u) => format!(
                    "unavailable\t{}\t{}\t{}\t{:?}",
                    u.reference.kind.label(),
                    u.reference.display_path(),
                    u.reference.caption,
                    u.reason
                ),
                PlanItem::Download(d) => format!(
                    "download\t{}\t{}\t{}",
                    crate::asset::path_to_slash(&d.source_dir),
                    d.archive_name,
                    d.label
                ),
            };
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;

    fn asset(path: &str, caption: &str) -> AssetReference {
        AssetReference::new(path, caption, AssetKind::StaticImage)
    }

    #[test]
    fn accessors_split_items() {
        let mut plan = PresentationPlan::new(Page::Dashboard, "Dashboard");
        plan.items.push(PlanItem::Text(TextBlock::body("intro")));
        plan.items.push(PlanItem::Asset(asset("assets/Raw/XGB_raw.png", "XGBoost for Raw Data")));
        plan.items.push(PlanItem::Unavailable(UnavailableAsset {
            reference: asset("assets/Imputed/XGB_imputed.png", "XGBoost for Imputed Data"),
            reason: MissingReason::NotFound,
        }));

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.assets().count(), 1);
        assert_eq!(plan.asset_slots().count(), 2);
        assert_eq!(plan.unavailable().count(), 1);
    }

    #[test]
    fn unavailable_message_names_caption() {
        let u = UnavailableAsset {
            reference: asset("assets/Raw/XGB_raw.png", "XGBoost for Raw Data"),
            reason: MissingReason::NotFound,
        };
        let msg = u.message();
        assert!(msg.contains("XGBoost for Raw Data"));
        assert!(msg.contains("assets/Raw/XGB_raw.png"));
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let a = asset("assets/Raw/XGB_raw.png", "A");
        let b = asset("assets/Imputed/XGB_imputed.png", "B");

        let mut p1 = PresentationPlan::new(Page::Dashboard, "Dashboard");
        p1.items = vec![PlanItem::Asset(a.clone()), PlanItem::Asset(b.clone())];
        let mut p2 = p1.clone();
        assert_eq!(p1.fingerprint(), p2.fingerprint());

        p2.items.reverse();
        assert_ne!(p1.fingerprint(), p2.fingerprint());
    }

    #[test]
    fn section_lookup_by_index() {
        let mut plan = PresentationPlan::new(Page::Dashboard, "Dashboard");
        plan.items.push(PlanItem::Text(TextBlock::body("always")));
        plan.items.push(PlanItem::Asset(asset("assets/Raw/XGB_raw.png", "XGB")));
        plan.sections.push(SectionSpan {
            section: Section::XGBoost,
            start: 1,
            end: 2,
        });
        assert_eq!(plan.section_at(0), None);
        assert_eq!(plan.section_at(1), Some(Section::XGBoost));
        assert_eq!(plan.section_at(2), None);
    }

    #[test]
    fn json_tags_item_type() {
        let mut plan = PresentationPlan::new(Page::Eda, "EDA");
        plan.items.push(PlanItem::Text(TextBlock::new("Heading", "Body")));
        let json = plan.to_json_pretty().unwrap();
        assert!(json.contains("\"type\": \"text\""));
        let back: PresentationPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
