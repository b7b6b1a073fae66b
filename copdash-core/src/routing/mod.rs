//! Routing table, templates, and the built-in study layout.

pub mod builtin;
pub mod table;
pub mod template;

pub use builtin::{builtin_table, EDA_ARCHIVE_NAME, EDA_DIRECTORY};
pub use table::{AssetGroup, AssetTemplate, Block, PageRoute, RoutingTable, Scope};
