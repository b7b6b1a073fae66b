//! Navigation persistence: JSON save/load across restarts.

use std::path::Path;

use copdash_core::{AssetProbe, NavigationState};
use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub navigation: NavigationState,
    #[serde(default)]
    pub help_seen: bool,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract<P: AssetProbe>(app: &AppState<P>, help_seen: bool) -> PersistedState {
    PersistedState {
        navigation: app.nav.clone(),
        help_seen: help_seen || app.overlay == Overlay::Help,
    }
}

/// Apply persisted state to AppState. First launch opens the help overlay.
pub fn apply<P: AssetProbe>(app: &mut AppState<P>, state: PersistedState) {
    app.restore(state.navigation);
    if !state.help_seen {
        app.overlay = Overlay::Help;
    }
}
