use std::io;
use std::path::PathBuf;

use skk_core::dict_list::DictListError;
use skk_core::form::FormError;
use skk_core::paths;
use skk_core::settings::{self, SettingsError};

pub mod config_ops;
pub mod dict_list_ops;
pub mod rule_ops;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    DictList(#[from] DictListError),

    #[error("invalid dictionary: {0}")]
    Form(#[from] FormError),

    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot determine the user data directory; pass --file")]
    NoDataDir,
}

/// `--file` if given, otherwise the list named by the active settings.
pub fn dictionary_list_path(file: Option<String>) -> Result<PathBuf, CliError> {
    match file {
        Some(f) => Ok(PathBuf::from(f)),
        None => Ok(settings::settings().dictionary_list_path(&user_base()?)),
    }
}

/// Base directory that `$FCITX_CONFIG_DIR` stands for.
pub fn user_base() -> Result<PathBuf, CliError> {
    paths::user_data_dir().ok_or(CliError::NoDataDir)
}
