//! Input form for adding a dictionary to the list.
//!
//! Three kinds are offered: a system dictionary (read-only file), a user
//! dictionary (read-write file) and an skkserv server. The form is
//! re-validated whenever a field changes; `to_record` only succeeds on a
//! valid form.

use std::path::{Path, PathBuf};

use crate::dict_list::{DictRecord, FileMode};
use crate::paths;

/// Usual install location of the large system dictionary.
pub const SKK_DEFAULT_PATH: &str = "/usr/share/skk/SKK-JISYO.L";

/// Standard skkserv port.
pub const DEFAULT_SERVER_PORT: u16 = 1178;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DictKind {
    #[default]
    System,
    User,
    Server,
}

impl DictKind {
    pub fn is_file(self) -> bool {
        !matches!(self, DictKind::Server)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("dictionary path is empty")]
    EmptyPath,
    #[error("server host is empty")]
    EmptyHost,
    #[error("invalid port: {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictForm {
    pub kind: DictKind,
    pub path: String,
    pub host: String,
    pub port: String,
    pub encoding: String,
}

impl Default for DictForm {
    fn default() -> Self {
        Self::new(DictKind::default())
    }
}

impl DictForm {
    pub fn new(kind: DictKind) -> Self {
        Self {
            kind,
            path: String::new(),
            host: String::new(),
            port: DEFAULT_SERVER_PORT.to_string(),
            encoding: String::new(),
        }
    }

    pub fn set_kind(&mut self, kind: DictKind) {
        self.kind = kind;
    }

    pub fn shows_path_fields(&self) -> bool {
        self.kind.is_file()
    }

    pub fn shows_server_fields(&self) -> bool {
        !self.kind.is_file()
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.kind.is_file() {
            if self.path.is_empty() {
                return Err(FormError::EmptyPath);
            }
            return Ok(());
        }
        if self.host.trim().is_empty() {
            return Err(FormError::EmptyHost);
        }
        match self.port.trim().parse::<u16>() {
            Ok(port) if port != 0 => Ok(()),
            _ => Err(FormError::InvalidPort(self.port.clone())),
        }
    }

    /// Whether the form may be accepted in its current state.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn to_record(&self) -> Result<DictRecord, FormError> {
        self.validate()?;
        let record = match self.kind {
            DictKind::System => DictRecord::file(self.path.clone(), FileMode::ReadOnly),
            DictKind::User => DictRecord::file(self.path.clone(), FileMode::ReadWrite),
            DictKind::Server => DictRecord::server(self.host.trim(), self.port.trim()),
        };
        Ok(record.with_encoding(self.encoding.clone()))
    }

    /// Where a file chooser should start.
    ///
    /// For a system dictionary this is the directory of the current path (or
    /// of the default dictionary). For a user dictionary it is the current
    /// path with the placeholder expanded, or `user_base` itself.
    pub fn browse_start(&self, user_base: &Path) -> PathBuf {
        match self.kind {
            DictKind::System => {
                let current = if self.path.is_empty() {
                    SKK_DEFAULT_PATH
                } else {
                    self.path.as_str()
                };
                Path::new(current)
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("/"))
            }
            DictKind::User | DictKind::Server => {
                if self.path.is_empty() {
                    user_base.to_path_buf()
                } else {
                    paths::expand_placeholder(&self.path, user_base)
                }
            }
        }
    }

    /// Store a path picked in a file chooser. Paths under `user_base` are
    /// kept in placeholder form for user dictionaries. An empty pick
    /// (cancelled chooser) changes nothing.
    pub fn accept_browsed(&mut self, chosen: &Path, user_base: &Path) {
        let chosen = chosen.to_string_lossy();
        if chosen.is_empty() {
            return;
        }
        self.path = match self.kind {
            DictKind::System => chosen.into_owned(),
            DictKind::User | DictKind::Server => paths::to_placeholder(&chosen, user_base),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "/home/u/.local/share/fcitx5";

    #[test]
    fn file_kinds_need_a_path() {
        let mut form = DictForm::new(DictKind::System);
        assert_eq!(form.validate(), Err(FormError::EmptyPath));
        form.path = "/a".to_string();
        assert!(form.is_valid());
        form.set_kind(DictKind::User);
        assert!(form.is_valid());
    }

    #[test]
    fn server_needs_host_and_port() {
        let mut form = DictForm::new(DictKind::Server);
        form.path = "/ignored".to_string();
        assert_eq!(form.validate(), Err(FormError::EmptyHost));
        form.host = "localhost".to_string();
        assert!(form.is_valid());
        form.port = "abc".to_string();
        assert_eq!(form.validate(), Err(FormError::InvalidPort("abc".to_string())));
        form.port = "0".to_string();
        assert!(!form.is_valid());
        form.port = "70000".to_string();
        assert!(!form.is_valid());
    }

    #[test]
    fn blank_host_is_empty() {
        let mut form = DictForm::new(DictKind::Server);
        form.host = "   ".to_string();
        assert_eq!(form.validate(), Err(FormError::EmptyHost));
        assert!(form.to_record().is_err());

        form.host = " skk.example ".to_string();
        assert_eq!(form.to_record().unwrap().label(), "skk.example:1178");
    }

    #[test]
    fn validity_follows_kind_changes() {
        let mut form = DictForm::new(DictKind::Server);
        form.host = "localhost".to_string();
        assert!(form.is_valid());
        form.set_kind(DictKind::User);
        assert!(!form.is_valid());
        assert!(form.shows_path_fields());
        assert!(!form.shows_server_fields());
    }

    #[test]
    fn produces_records_per_kind() {
        let mut form = DictForm::new(DictKind::System);
        form.path = SKK_DEFAULT_PATH.to_string();
        assert_eq!(
            form.to_record(),
            Ok(DictRecord::file(SKK_DEFAULT_PATH, FileMode::ReadOnly))
        );

        form.set_kind(DictKind::User);
        form.encoding = "UTF-8".to_string();
        assert_eq!(
            form.to_record(),
            Ok(DictRecord::file(SKK_DEFAULT_PATH, FileMode::ReadWrite).with_encoding("UTF-8"))
        );

        let mut form = DictForm::new(DictKind::Server);
        form.host = "skk.example".to_string();
        assert_eq!(form.to_record(), Ok(DictRecord::server("skk.example", "1178")));
    }

    #[test]
    fn invalid_form_yields_no_record() {
        let form = DictForm::new(DictKind::User);
        assert_eq!(form.to_record(), Err(FormError::EmptyPath));
    }

    #[test]
    fn system_browse_starts_in_dictionary_directory() {
        let base = Path::new(BASE);
        let mut form = DictForm::new(DictKind::System);
        assert_eq!(form.browse_start(base), PathBuf::from("/usr/share/skk"));
        form.path = "/opt/dict/SKK-JISYO.M".to_string();
        assert_eq!(form.browse_start(base), PathBuf::from("/opt/dict"));
    }

    #[test]
    fn user_browse_expands_placeholder() {
        let base = Path::new(BASE);
        let mut form = DictForm::new(DictKind::User);
        assert_eq!(form.browse_start(base), PathBuf::from(BASE));
        form.path = "$FCITX_CONFIG_DIR/skk/user.dict".to_string();
        assert_eq!(
            form.browse_start(base),
            PathBuf::from("/home/u/.local/share/fcitx5/skk/user.dict")
        );
    }

    #[test]
    fn user_pick_under_base_is_stored_as_placeholder() {
        let base = Path::new(BASE);
        let mut form = DictForm::new(DictKind::User);
        form.accept_browsed(Path::new("/home/u/.local/share/fcitx5/skk/user.dict"), base);
        assert_eq!(form.path, "$FCITX_CONFIG_DIR/skk/user.dict");

        form.accept_browsed(Path::new("/srv/dict/user.dict"), base);
        assert_eq!(form.path, "/srv/dict/user.dict");

        form.accept_browsed(Path::new(""), base);
        assert_eq!(form.path, "/srv/dict/user.dict");
    }

    #[test]
    fn system_pick_is_stored_verbatim() {
        let base = Path::new(BASE);
        let mut form = DictForm::new(DictKind::System);
        form.accept_browsed(Path::new("/home/u/.local/share/fcitx5/skk/big.dict"), base);
        assert_eq!(form.path, "/home/u/.local/share/fcitx5/skk/big.dict");
    }
}
