//! Declarative routing table: page → ordered blocks → asset templates.
//!
//! The table replaces per-page conditional chains. It is plain data, so it
//! can be loaded from TOML as well as built in code:
//!
//! ```toml
//! [[pages]]
//! page = "dashboard"
//! title = "Model Results"
//!
//! [[pages.blocks]]
//! type = "assets"
//! section = "xgboost"
//! intro = { heading = "XGBoost", body = "XGBoost is applied to every data type." }
//!
//! [[pages.blocks.assets]]
//! path = "{folder}/XGB_{token}.png"
//! caption = "XGBoost for {label}"
//! scope = { data_types = ["raw", "imputed", "imputed_transformed"] }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::template::placeholders;
use crate::asset::AssetKind;
use crate::error::ConfigError;
use crate::navigation::{DataType, Page, Section};
use crate::plan::TextBlock;

/// Which data types an asset template applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// One asset, no data-type substitution.
    #[default]
    Fixed,
    /// One asset per listed data type that the filter selects.
    DataTypes(BTreeSet<DataType>),
}

impl Scope {
    pub fn all_data_types() -> Self {
        Scope::DataTypes(DataType::ALL.into_iter().collect())
    }

    pub fn only(data_types: &[DataType]) -> Self {
        Scope::DataTypes(data_types.iter().copied().collect())
    }

    pub fn allows(&self, data_type: DataType) -> bool {
        match self {
            Scope::Fixed => false,
            Scope::DataTypes(set) => set.contains(&data_type),
        }
    }
}

/// One asset slot pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTemplate {
    /// Path relative to the asset root, may contain placeholders.
    pub path: String,
    pub caption: String,
    #[serde(default)]
    pub kind: AssetKind,
    #[serde(default)]
    pub scope: Scope,
}

impl AssetTemplate {
    pub fn fixed(path: &str, caption: &str) -> Self {
        Self {
            path: path.to_string(),
            caption: caption.to_string(),
            kind: AssetKind::StaticImage,
            scope: Scope::Fixed,
        }
    }

    pub fn per_data_type(path: &str, caption: &str, data_types: &[DataType]) -> Self {
        Self {
            path: path.to_string(),
            caption: caption.to_string(),
            kind: AssetKind::StaticImage,
            scope: Scope::only(data_types),
        }
    }

    pub fn html(mut self) -> Self {
        self.kind = AssetKind::HtmlFragment;
        self
    }
}

/// A group of assets, optionally gated by a section toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    /// `None` means the group is always shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    /// Emitted before the group's assets, only when at least one asset resolves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<TextBlock>,
    pub assets: Vec<AssetTemplate>,
}

/// One entry in a page's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Block {
    Text(TextBlock),
    Assets(AssetGroup),
    Download {
        label: String,
        /// Directory relative to the asset root.
        directory: String,
        archive_name: String,
    },
}

/// The layout of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRoute {
    pub page: Page,
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// The complete routing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    pub pages: Vec<PageRoute>,
}

impl RoutingTable {
    /// Load and validate a routing table from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse and validate a routing table from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let table: RoutingTable = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;
        table.validate()?;
        Ok(table)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn route(&self, page: Page) -> Option<&PageRoute> {
        self.pages.iter().find(|r| r.page == page)
    }

    /// Pages present in the table, in table order.
    pub fn routed_pages(&self) -> Vec<Page> {
        self.pages.iter().map(|r| r.page).collect()
    }

    /// Check every template and structural constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for route in &self.pages {
            if !seen.insert(route.page) {
                return Err(ConfigError::DuplicatePage(route.page));
            }
            for block in &route.blocks {
                match block {
                    Block::Text(_) => {}
                    Block::Assets(group) => {
                        for template in &group.assets {
                            validate_template(route.page, template)?;
                        }
                    }
                    Block::Download {
                        directory,
                        archive_name,
                        ..
                    } => {
                        if directory.trim().is_empty() {
                            return Err(ConfigError::EmptyField {
                                page: route.page.label().to_string(),
                                field: "download directory",
                            });
                        }
                        if archive_name.trim().is_empty() {
                            return Err(ConfigError::EmptyField {
                                page: route.page.label().to_string(),
                                field: "archive name",
                            });
                        }
                        let named = placeholders(directory)?.len() + placeholders(archive_name)?.len();
                        if named > 0 {
                            return Err(ConfigError::InvalidTemplate {
                                template: directory.clone(),
                                reason: "download blocks cannot use placeholders".into(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_template(page: Page, template: &AssetTemplate) -> Result<(), ConfigError> {
    if template.path.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            page: page.label().to_string(),
            field: "path",
        });
    }
    if template.caption.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            page: page.label().to_string(),
            field: "caption",
        });
    }

    let named = placeholders(&template.path)?.len() + placeholders(&template.caption)?.len();
    match &template.scope {
        Scope::Fixed if named > 0 => Err(ConfigError::InvalidTemplate {
            template: template.path.clone(),
            reason: "fixed-scope templates cannot use data-type placeholders".into(),
        }),
        Scope::DataTypes(set) if set.is_empty() => Err(ConfigError::EmptyScope(template.path.clone())),
        _ => Ok(()),
    }
}
