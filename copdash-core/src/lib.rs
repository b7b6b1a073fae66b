//! copdash core: navigation model, routing table, asset presentation router.
//!
//! This crate maps a navigation state (page, data-type filter, section
//! toggles) onto an ordered presentation plan of text blocks and references
//! to pre-rendered assets:
//! - Navigation types with lenient parsing of selector labels
//! - Declarative routing table (built-in or TOML) with template validation
//! - Asset probing behind a trait (filesystem, fixed listing, assume-present)
//! - Plan resolution with per-slot missing-asset recovery

pub mod asset;
pub mod error;
pub mod navigation;
pub mod plan;
pub mod router;
pub mod routing;

pub use asset::{
    AssetKind, AssetProbe, AssetReference, AssetStatus, AssumePresent, FsProbe, KnownAssets,
};
pub use error::{ConfigError, RouteError};
pub use navigation::{DataType, DataTypeFilter, NavigationState, Page, Section};
pub use plan::{
    ArchiveOffer, MissingReason, PlanItem, PresentationPlan, SectionSpan, TextBlock,
    UnavailableAsset,
};
pub use router::{Router, DEFAULT_ASSET_ROOT};
pub use routing::{builtin_table, RoutingTable, EDA_ARCHIVE_NAME, EDA_DIRECTORY};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn navigation_state_is_send_sync() {
        assert_send::<NavigationState>();
        assert_sync::<NavigationState>();
    }

    #[test]
    fn plan_is_send_sync() {
        assert_send::<PresentationPlan>();
        assert_sync::<PresentationPlan>();
    }

    #[test]
    fn router_is_send_sync() {
        assert_send::<Router>();
        assert_sync::<Router>();
        assert_send::<Router<KnownAssets>>();
        assert_sync::<Router<KnownAssets>>();
    }
}
