//! Portable dictionary paths.
//!
//! User dictionaries live under the per-user fcitx5 data directory. They are
//! stored with a `$FCITX_CONFIG_DIR` prefix so the list stays valid when the
//! home directory moves. Rewriting is purely textual, given the base dir.

use std::path::{Path, PathBuf};

pub const CONFIG_DIR_TOKEN: &str = "$FCITX_CONFIG_DIR";

/// Installed factory template.
pub const SYSTEM_TEMPLATE_PATH: &str = "/usr/share/fcitx5/skk/dictionary_list";

/// Replace a leading `base/` with `$FCITX_CONFIG_DIR/`. Other paths are
/// returned unchanged.
pub fn to_placeholder(path: &str, base: &Path) -> String {
    let base = clean(base);
    if base.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(base.as_str()) {
        Some(rest) if rest.starts_with('/') => format!("{CONFIG_DIR_TOKEN}{rest}"),
        _ => path.to_string(),
    }
}

/// Inverse of [`to_placeholder`]: a `$FCITX_CONFIG_DIR/` prefix becomes `base`.
pub fn expand_placeholder(path: &str, base: &Path) -> PathBuf {
    match path
        .strip_prefix(CONFIG_DIR_TOKEN)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        Some(rest) => base.join(rest),
        None => PathBuf::from(path),
    }
}

/// Per-user fcitx5 data directory (`$XDG_DATA_HOME/fcitx5`).
pub fn user_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("fcitx5"))
}

/// Base path as a string without trailing separators.
fn clean(base: &Path) -> String {
    base.to_string_lossy().trim_end_matches('/').to_string()
}
