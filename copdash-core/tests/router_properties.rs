//! Property tests for router invariants.
//!
//! Uses proptest to verify, over every navigation state:
//! 1. Raw data never yields a Logistic Regression SHAP asset
//! 2. The "All" filter yields the union of the per-data-type plans
//! 3. Resolution is idempotent (same items, same order, same fingerprint)
//! 4. One missing file among N slots gives N slots with exactly one placeholder

use std::collections::BTreeSet;
use std::path::PathBuf;

use copdash_core::{
    builtin_table, AssumePresent, DataType, DataTypeFilter, KnownAssets, NavigationState, Page,
    PlanItem, Router, Section,
};
use proptest::prelude::*;
use proptest::sample::Index;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_page() -> impl Strategy<Value = Page> {
    prop::sample::select(Page::ALL.to_vec())
}

fn arb_filter() -> impl Strategy<Value = DataTypeFilter> {
    prop::sample::select(DataTypeFilter::CHOICES.to_vec())
}

fn arb_sections() -> impl Strategy<Value = BTreeSet<Section>> {
    prop::sample::subsequence(Section::ALL.to_vec(), 0..=Section::ALL.len())
        .prop_map(|s| s.into_iter().collect())
}

fn arb_state() -> impl Strategy<Value = NavigationState> {
    (arb_page(), arb_filter(), arb_sections()).prop_map(|(page, data_type_filter, sections)| {
        NavigationState {
            page,
            data_type_filter,
            sections,
        }
    })
}

fn router() -> Router<AssumePresent> {
    Router::with_probe(builtin_table(), "assets", AssumePresent).unwrap()
}

fn asset_paths(router: &Router<AssumePresent>, state: &NavigationState) -> BTreeSet<PathBuf> {
    router
        .resolve_plan(state)
        .unwrap()
        .asset_slots()
        .map(|r| r.relative_path.clone())
        .collect()
}

proptest! {
    // ── 1. LR SHAP never on raw data ─────────────────────────────────

    #[test]
    fn raw_data_has_no_lr_shap(page in arb_page(), sections in arb_sections()) {
        let state = NavigationState {
            page,
            data_type_filter: DataTypeFilter::Only(DataType::Raw),
            sections,
        };
        let plan = router().resolve_plan(&state).unwrap();
        for slot in plan.asset_slots() {
            let path = slot.display_path();
            prop_assert!(!path.contains("SHAP_LR"), "LR SHAP image on raw data: {}", path);
            prop_assert!(!path.contains("force_plot_LR"), "LR force plot on raw data: {}", path);
            prop_assert!(!path.contains("/Raw/LR_"), "LR plot on raw data: {}", path);
        }
    }

    // ── 2. All = union of concrete data types ────────────────────────

    #[test]
    fn all_filter_is_union_of_data_types(page in arb_page(), sections in arb_sections()) {
        let router = router();
        let all_state = NavigationState { page, data_type_filter: DataTypeFilter::All, sections };
        let all = asset_paths(&router, &all_state);

        let mut union = BTreeSet::new();
        for dt in DataType::ALL {
            union.extend(asset_paths(&router, &all_state.narrowed_to(dt)));
        }
        prop_assert_eq!(all, union);
    }

    // ── 3. Idempotence ───────────────────────────────────────────────

    #[test]
    fn resolution_is_idempotent(state in arb_state()) {
        let router = router();
        let first = router.resolve_plan(&state).unwrap();
        let second = router.resolve_plan(&state).unwrap();
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
        prop_assert_eq!(first, second);
    }

    // ── 4. Missing file isolation ────────────────────────────────────

    #[test]
    fn one_missing_file_gives_one_placeholder(state in arb_state(), pick in any::<Index>()) {
        let full = router().resolve_plan(&state).unwrap();
        let slots: Vec<PathBuf> = full.asset_slots().map(|r| r.relative_path.clone()).collect();
        prop_assume!(!slots.is_empty());

        let missing = slots[pick.index(slots.len())].clone();
        let mut known = KnownAssets::new(router().all_references().into_iter().map(|r| r.relative_path));
        known.remove(&missing);

        let partial = Router::with_probe(builtin_table(), "assets", known)
            .unwrap()
            .resolve_plan(&state)
            .unwrap();

        prop_assert_eq!(partial.items.len(), full.items.len());
        prop_assert_eq!(partial.asset_slots().count(), slots.len());
        let placeholders: Vec<_> = partial.unavailable().collect();
        prop_assert_eq!(placeholders.len(), 1);
        prop_assert_eq!(&placeholders[0].reference.relative_path, &missing);

        // Every other slot is untouched and in the same position.
        for (a, b) in full.items.iter().zip(partial.items.iter()) {
            match (a, b) {
                (PlanItem::Asset(x), PlanItem::Unavailable(u)) => {
                    prop_assert_eq!(x, &u.reference);
                }
                _ => prop_assert_eq!(a, b),
            }
        }
    }
}
