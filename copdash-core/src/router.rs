//! Asset presentation router: navigation state in, presentation plan out.
//!
//! For each block of the page (table order):
//! - text blocks are emitted as-is
//! - asset groups gated on a section are skipped unless the section is on
//! - each template (declared order) yields one reference if fixed, or one per
//!   data type (canonical order) that the filter selects and the template allows
//! - a group that yields nothing emits nothing, not even its intro
//! - every reference is probed; absent or unreadable assets become
//!   `Unavailable` in the same slot
//!
//! Resolution is pure apart from the read-only probe, so resolving the same
//! state twice gives identical plans.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::asset::{AssetProbe, AssetReference, AssetStatus, FsProbe};
use crate::error::{ConfigError, RouteError};
use crate::navigation::NavigationState;
use crate::plan::{
    ArchiveOffer, MissingReason, PlanItem, PresentationPlan, SectionSpan, UnavailableAsset,
};
use crate::routing::template::substitute;
use crate::routing::{AssetGroup, AssetTemplate, Block, RoutingTable, Scope};

/// Default asset root, relative to the working directory.
pub const DEFAULT_ASSET_ROOT: &str = "assets";

/// Resolves navigation states against a routing table and an asset tree.
#[derive(Debug, Clone)]
pub struct Router<P = FsProbe> {
    table: RoutingTable,
    asset_root: PathBuf,
    probe: P,
}

impl Router<FsProbe> {
    /// Router over the real filesystem. The table is validated first.
    pub fn new(table: RoutingTable, asset_root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::with_probe(table, asset_root, FsProbe)
    }
}

impl<P: AssetProbe> Router<P> {
    pub fn with_probe(
        table: RoutingTable,
        asset_root: impl Into<PathBuf>,
        probe: P,
    ) -> Result<Self, ConfigError> {
        table.validate()?;
        Ok(Self {
            table,
            asset_root: asset_root.into(),
            probe,
        })
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Resolve one navigation state into an ordered plan.
    pub fn resolve_plan(&self, state: &NavigationState) -> Result<PresentationPlan, RouteError> {
        let route = self
            .table
            .route(state.page)
            .ok_or(RouteError::PageNotRouted(state.page))?;

        let mut plan = PresentationPlan::new(state.page, route.title.clone());
        for block in &route.blocks {
            match block {
                Block::Text(text) => plan.items.push(PlanItem::Text(text.clone())),
                Block::Assets(group) => self.resolve_group(group, state, &mut plan),
                Block::Download {
                    label,
                    directory,
                    archive_name,
                } => plan.items.push(PlanItem::Download(ArchiveOffer {
                    label: label.clone(),
                    source_dir: self.asset_root.join(directory),
                    archive_name: archive_name.clone(),
                })),
            }
        }

        debug!(
            page = %state.page,
            filter = %state.data_type_filter,
            items = plan.items.len(),
            unavailable = plan.unavailable().count(),
            "resolved presentation plan"
        );
        Ok(plan)
    }

    fn resolve_group(&self, group: &AssetGroup, state: &NavigationState, plan: &mut PresentationPlan) {
        if let Some(section) = group.section {
            if !state.is_enabled(section) {
                return;
            }
        }

        let references: Vec<AssetReference> = group
            .assets
            .iter()
            .flat_map(|template| self.expand(template, state))
            .collect();
        if references.is_empty() {
            return;
        }

        let start = plan.items.len();
        if let Some(intro) = &group.intro {
            plan.items.push(PlanItem::Text(intro.clone()));
        }
        for reference in references {
            plan.items.push(self.check(reference));
        }
        if let Some(section) = group.section {
            plan.sections.push(SectionSpan {
                section,
                start,
                end: plan.items.len(),
            });
        }
    }

    /// All references a template yields under the current filter.
    fn expand(&self, template: &AssetTemplate, state: &NavigationState) -> Vec<AssetReference> {
        match &template.scope {
            Scope::Fixed => vec![AssetReference::new(
                self.asset_root.join(&template.path),
                template.caption.clone(),
                template.kind,
            )],
            Scope::DataTypes(allowed) => state
                .data_type_filter
                .data_types()
                .into_iter()
                .filter(|dt| allowed.contains(dt))
                .map(|dt| {
                    AssetReference::new(
                        self.asset_root.join(substitute(&template.path, dt)),
                        substitute(&template.caption, dt),
                        template.kind,
                    )
                })
                .collect(),
        }
    }

    fn check(&self, reference: AssetReference) -> PlanItem {
        match self.probe.probe(&reference.relative_path, reference.kind) {
            AssetStatus::Present => PlanItem::Asset(reference),
            AssetStatus::Missing => {
                warn!(path = %reference.display_path(), caption = %reference.caption, "asset not found");
                PlanItem::Unavailable(UnavailableAsset {
                    reference,
                    reason: MissingReason::NotFound,
                })
            }
            AssetStatus::Unreadable(detail) => {
                warn!(path = %reference.display_path(), %detail, "asset unreadable");
                PlanItem::Unavailable(UnavailableAsset {
                    reference,
                    reason: MissingReason::Unreadable(detail),
                })
            }
        }
    }

    /// Every asset slot the table can produce, for any state, deduplicated in
    /// first-seen order. Used by `check` to audit the asset tree.
    pub fn all_references(&self) -> Vec<AssetReference> {
        let everything = NavigationState::default();
        let mut seen = Vec::new();
        for route in &self.table.pages {
            for block in &route.blocks {
                if let Block::Assets(group) = block {
                    for template in &group.assets {
                        for reference in self.expand(template, &everything) {
                            if !seen.contains(&reference) {
                                seen.push(reference);
                            }
                        }
                    }
                }
            }
        }
        seen
    }
}
