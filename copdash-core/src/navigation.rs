//! Navigation model: pages, data types, section toggles.
//!
//! `NavigationState` is a plain value. The hosting surface (CLI flags, TUI,
//! static site) owns it and passes it to the router; nothing here is global.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// Lower-case a user-supplied value and drop everything but letters and digits,
/// so "Imputed + Transformed Data", "imputed_transformed" and
/// "imputed-transformed" all compare equal.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A dashboard page. Navigation is flat: any page is reachable from any page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Overview,
    Dashboard,
    Eda,
    FirstIteration,
    FinalMethodology,
}

impl Page {
    /// All pages in sidebar order.
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Dashboard,
        Page::Eda,
        Page::FirstIteration,
        Page::FinalMethodology,
    ];

    pub fn index(self) -> usize {
        match self {
            Page::Overview => 0,
            Page::Dashboard => 1,
            Page::Eda => 2,
            Page::FirstIteration => 3,
            Page::FinalMethodology => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Dashboard => "Dashboard",
            Page::Eda => "EDA",
            Page::FirstIteration => "First Iteration",
            Page::FinalMethodology => "Final Methodology",
        }
    }

    /// Stable identifier used in file names and URLs.
    pub fn slug(self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Dashboard => "dashboard",
            Page::Eda => "eda",
            Page::FirstIteration => "first-iteration",
            Page::FinalMethodology => "final-methodology",
        }
    }

    pub fn next(self) -> Page {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Page {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Page {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "overview" | "home" => Ok(Page::Overview),
            "dashboard" | "results" => Ok(Page::Dashboard),
            "eda" | "exploratorydataanalysis" => Ok(Page::Eda),
            "firstiteration" => Ok(Page::FirstIteration),
            "finalmethodology" => Ok(Page::FinalMethodology),
            _ => Err(RouteError::UnknownPage(s.to_string())),
        }
    }
}

/// One of the three upstream-prepared dataset variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Raw,
    Imputed,
    ImputedTransformed,
}

impl DataType {
    /// Canonical order; plans list per-data-type assets in this order.
    pub const ALL: [DataType; 3] = [DataType::Raw, DataType::Imputed, DataType::ImputedTransformed];

    /// Display label, as shown in the data-type selector and in captions.
    pub fn label(self) -> &'static str {
        match self {
            DataType::Raw => "Raw Data",
            DataType::Imputed => "Imputed Data",
            DataType::ImputedTransformed => "Imputed + Transformed Data",
        }
    }

    /// Folder name under the asset root. Casing must match the files on disk.
    pub fn folder(self) -> &'static str {
        match self {
            DataType::Raw => "Raw",
            DataType::Imputed => "Imputed",
            DataType::ImputedTransformed => "Imputed_Transformed",
        }
    }

    /// Folder name lower-cased, used as the file-name suffix.
    pub fn token(self) -> &'static str {
        match self {
            DataType::Raw => "raw",
            DataType::Imputed => "imputed",
            DataType::ImputedTransformed => "imputed_transformed",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataType {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "raw" | "rawdata" => Ok(DataType::Raw),
            "imputed" | "imputeddata" => Ok(DataType::Imputed),
            "imputedtransformed"
            | "imputedtransformeddata"
            | "imputedandtransformed"
            | "imputedandtransformeddata" => Ok(DataType::ImputedTransformed),
            _ => Err(RouteError::UnknownDataType(s.to_string())),
        }
    }
}

/// Data-type selector value. `All` means "iterate every known data type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataTypeFilter {
    #[default]
    All,
    Only(DataType),
}

impl DataTypeFilter {
    /// Selector order: All first, then each data type.
    pub const CHOICES: [DataTypeFilter; 4] = [
        DataTypeFilter::All,
        DataTypeFilter::Only(DataType::Raw),
        DataTypeFilter::Only(DataType::Imputed),
        DataTypeFilter::Only(DataType::ImputedTransformed),
    ];

    /// Selected data types in canonical order.
    pub fn data_types(self) -> Vec<DataType> {
        match self {
            DataTypeFilter::All => DataType::ALL.to_vec(),
            DataTypeFilter::Only(dt) => vec![dt],
        }
    }

    pub fn includes(self, data_type: DataType) -> bool {
        match self {
            DataTypeFilter::All => true,
            DataTypeFilter::Only(dt) => dt == data_type,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataTypeFilter::All => "All Data Types",
            DataTypeFilter::Only(dt) => dt.label(),
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            DataTypeFilter::All => "all",
            DataTypeFilter::Only(dt) => dt.token(),
        }
    }

    /// Next selector value, wrapping around.
    pub fn cycle(self) -> DataTypeFilter {
        let pos = Self::CHOICES.iter().position(|c| *c == self).unwrap_or(0);
        Self::CHOICES[(pos + 1) % Self::CHOICES.len()]
    }
}

impl From<Option<DataType>> for DataTypeFilter {
    fn from(value: Option<DataType>) -> Self {
        value.map(DataTypeFilter::Only).unwrap_or_default()
    }
}

impl fmt::Display for DataTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataTypeFilter {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "" | "all" | "alldata" | "alldatatypes" => Ok(DataTypeFilter::All),
            _ => s.parse::<DataType>().map(DataTypeFilter::Only),
        }
    }
}

/// A toggleable visualization section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "logistic_regression")]
    LogisticRegression,
    #[serde(rename = "xgboost")]
    XGBoost,
    #[serde(rename = "shap_analysis")]
    ShapAnalysis,
    #[serde(rename = "comparative_insights")]
    ComparativeInsights,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::LogisticRegression,
        Section::XGBoost,
        Section::ShapAnalysis,
        Section::ComparativeInsights,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::LogisticRegression => "Logistic Regression",
            Section::XGBoost => "XGBoost",
            Section::ShapAnalysis => "SHAP Analysis",
            Section::ComparativeInsights => "Comparative Insights",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Section::LogisticRegression => "logistic-regression",
            Section::XGBoost => "xgboost",
            Section::ShapAnalysis => "shap",
            Section::ComparativeInsights => "comparative",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Section {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "logisticregression" | "lr" => Ok(Section::LogisticRegression),
            "xgboost" | "xgb" => Ok(Section::XGBoost),
            "shap" | "shapanalysis" | "shapvisualisations" | "shapvisualizations" => {
                Ok(Section::ShapAnalysis)
            }
            "comparative" | "comparativeinsights" | "comparisons" => {
                Ok(Section::ComparativeInsights)
            }
            _ => Err(RouteError::UnknownSection(s.to_string())),
        }
    }
}

/// Everything the sidebar selects. Passed by value to the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub page: Page,
    #[serde(default)]
    pub data_type_filter: DataTypeFilter,
    #[serde(default)]
    pub sections: BTreeSet<Section>,
}

impl Default for NavigationState {
    /// Overview page, all data types, every section on.
    fn default() -> Self {
        Self {
            page: Page::Overview,
            data_type_filter: DataTypeFilter::All,
            sections: Section::ALL.into_iter().collect(),
        }
    }
}

impl NavigationState {
    pub fn new(page: Page, data_type_filter: DataTypeFilter) -> Self {
        Self {
            page,
            data_type_filter,
            sections: BTreeSet::new(),
        }
    }

    /// Builder-style section toggle.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.insert(section);
        self
    }

    pub fn with_sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.sections.extend(sections);
        self
    }

    pub fn is_enabled(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    /// Flip a section on or off. Returns the new state of the toggle.
    pub fn toggle(&mut self, section: Section) -> bool {
        if !self.sections.remove(&section) {
            self.sections.insert(section);
            true
        } else {
            false
        }
    }

    /// Same page and sections, one concrete data type.
    pub fn narrowed_to(&self, data_type: DataType) -> NavigationState {
        NavigationState {
            data_type_filter: DataTypeFilter::Only(data_type),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_cycle() {
        assert_eq!(Page::Overview.next(), Page::Dashboard);
        assert_eq!(Page::FinalMethodology.next(), Page::Overview);
        assert_eq!(Page::Overview.prev(), Page::FinalMethodology);
        assert_eq!(Page::Eda.prev(), Page::Dashboard);
    }

    #[test]
    fn page_from_index() {
        for i in 0..Page::ALL.len() {
            let p = Page::from_index(i).unwrap();
            assert_eq!(p.index(), i);
        }
        assert!(Page::from_index(5).is_none());
    }

    #[test]
    fn page_parses_labels_and_slugs() {
        for page in Page::ALL {
            assert_eq!(page.label().parse::<Page>().unwrap(), page);
            assert_eq!(page.slug().parse::<Page>().unwrap(), page);
        }
        assert_eq!("EDA".parse::<Page>().unwrap(), Page::Eda);
        assert_eq!("first_iteration".parse::<Page>().unwrap(), Page::FirstIteration);
    }

    #[test]
    fn unknown_page_is_an_error() {
        let err = "Leaderboard".parse::<Page>().unwrap_err();
        assert!(matches!(err, RouteError::UnknownPage(ref s) if s == "Leaderboard"));
    }

    #[test]
    fn data_type_parses_selector_labels() {
        assert_eq!("Raw Data".parse::<DataType>().unwrap(), DataType::Raw);
        assert_eq!("Imputed Data".parse::<DataType>().unwrap(), DataType::Imputed);
        assert_eq!(
            "Imputed + Transformed Data".parse::<DataType>().unwrap(),
            DataType::ImputedTransformed
        );
        assert!("Cleaned Data".parse::<DataType>().is_err());
    }

    #[test]
    fn folder_tokens_are_lowercased_folders() {
        for dt in DataType::ALL {
            assert_eq!(dt.token(), dt.folder().to_lowercase());
        }
    }

    #[test]
    fn filter_all_iterates_canonical_order() {
        assert_eq!(DataTypeFilter::All.data_types(), DataType::ALL.to_vec());
        assert_eq!(
            DataTypeFilter::Only(DataType::Imputed).data_types(),
            vec![DataType::Imputed]
        );
        assert_eq!("".parse::<DataTypeFilter>().unwrap(), DataTypeFilter::All);
        assert_eq!("All".parse::<DataTypeFilter>().unwrap(), DataTypeFilter::All);
        assert_eq!(DataTypeFilter::from(None), DataTypeFilter::All);
    }

    #[test]
    fn filter_cycle_wraps() {
        let mut f = DataTypeFilter::All;
        for _ in 0..DataTypeFilter::CHOICES.len() {
            f = f.cycle();
        }
        assert_eq!(f, DataTypeFilter::All);
        assert_eq!(DataTypeFilter::All.cycle(), DataTypeFilter::Only(DataType::Raw));
    }

    #[test]
    fn section_aliases() {
        assert_eq!("LR".parse::<Section>().unwrap(), Section::LogisticRegression);
        assert_eq!("xgb".parse::<Section>().unwrap(), Section::XGBoost);
        assert_eq!("SHAP Analysis".parse::<Section>().unwrap(), Section::ShapAnalysis);
        assert!(matches!(
            "tsne".parse::<Section>(),
            Err(RouteError::UnknownSection(_))
        ));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = NavigationState::new(Page::Dashboard, DataTypeFilter::All);
        assert!(state.toggle(Section::XGBoost));
        assert!(state.is_enabled(Section::XGBoost));
        assert!(!state.toggle(Section::XGBoost));
        assert!(!state.is_enabled(Section::XGBoost));
    }

    #[test]
    fn state_json_roundtrip() {
        let state = NavigationState::new(Page::Dashboard, DataTypeFilter::Only(DataType::Raw))
            .with_section(Section::ShapAnalysis);
        let json = serde_json::to_string(&state).unwrap();
        let back: NavigationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
