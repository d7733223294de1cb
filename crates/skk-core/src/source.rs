//! Turn dictionary-list records into the sources the conversion engine opens.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::dict_list::{DictRecord, FileMode};
use crate::form::DEFAULT_SERVER_PORT;
use crate::paths;

/// A dictionary the engine should open, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    /// Read-only sorted text dictionary.
    File { path: PathBuf, encoding: String },
    /// Read-only constant database.
    Cdb { path: PathBuf, encoding: String },
    /// Writable user dictionary.
    User { path: PathBuf, encoding: String },
    /// skkserv over TCP.
    Server {
        host: String,
        port: u16,
        encoding: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("invalid port {port:?} for server {host}")]
    InvalidPort { host: String, port: String },
}

/// Resolve one record. `user_base` expands the placeholder in user dictionary paths.
pub fn resolve(record: &DictRecord, user_base: &Path) -> Result<DictionarySource, SourceError> {
    let encoding = record.encoding().to_string();
    match record {
        DictRecord::File {
            path,
            mode: FileMode::ReadOnly,
            ..
        } => {
            if is_cdb(path) {
                Ok(DictionarySource::Cdb {
                    path: PathBuf::from(path),
                    encoding,
                })
            } else {
                Ok(DictionarySource::File {
                    path: PathBuf::from(path),
                    encoding,
                })
            }
        }
        DictRecord::File {
            path,
            mode: FileMode::ReadWrite,
            ..
        } => Ok(DictionarySource::User {
            path: paths::expand_placeholder(path, user_base),
            encoding,
        }),
        DictRecord::Server { host, port, .. } => {
            let host = if host.is_empty() {
                "localhost".to_string()
            } else {
                host.clone()
            };
            let port = if port.is_empty() {
                DEFAULT_SERVER_PORT
            } else {
                port.trim()
                    .parse::<u16>()
                    .map_err(|_| SourceError::InvalidPort {
                        host: host.clone(),
                        port: port.clone(),
                    })?
            };
            Ok(DictionarySource::Server {
                host,
                port,
                encoding,
            })
        }
    }
}

/// Resolve every record in order, skipping the ones that cannot be opened.
pub fn resolve_all(records: &[DictRecord], user_base: &Path) -> Vec<DictionarySource> {
    records
        .iter()
        .filter_map(|record| match resolve(record, user_base) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("skipping dictionary {}: {e}", record.label());
                None
            }
        })
        .collect()
}

fn is_cdb(path: &str) -> bool {
    path.len() > 4 && path.ends_with(".cdb")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "/home/u/.local/share/fcitx5";

    #[test]
    fn readonly_file_and_cdb() {
        let base = Path::new(BASE);
        assert_eq!(
            resolve(&DictRecord::file("/usr/share/skk/SKK-JISYO.L", FileMode::ReadOnly), base),
            Ok(DictionarySource::File {
                path: PathBuf::from("/usr/share/skk/SKK-JISYO.L"),
                encoding: "EUC-JP".to_string(),
            })
        );
        assert_eq!(
            resolve(
                &DictRecord::file("/usr/share/skk/SKK-JISYO.L.cdb", FileMode::ReadOnly)
                    .with_encoding("UTF-8"),
                base
            ),
            Ok(DictionarySource::Cdb {
                path: PathBuf::from("/usr/share/skk/SKK-JISYO.L.cdb"),
                encoding: "UTF-8".to_string(),
            })
        );
        // Just the suffix is not a cdb file name.
        assert!(matches!(
            resolve(&DictRecord::file(".cdb", FileMode::ReadOnly), base),
            Ok(DictionarySource::File { .. })
        ));
    }

    #[test]
    fn readonly_paths_keep_placeholder_text() {
        let record = DictRecord::file("$FCITX_CONFIG_DIR/skk/a.dict", FileMode::ReadOnly);
        assert_eq!(
            resolve(&record, Path::new(BASE)),
            Ok(DictionarySource::File {
                path: PathBuf::from("$FCITX_CONFIG_DIR/skk/a.dict"),
                encoding: "EUC-JP".to_string(),
            })
        );
    }

    #[test]
    fn user_dictionary_expands_placeholder() {
        let record = DictRecord::file("$FCITX_CONFIG_DIR/skk/user.dict", FileMode::ReadWrite);
        assert_eq!(
            resolve(&record, Path::new(BASE)),
            Ok(DictionarySource::User {
                path: PathBuf::from("/home/u/.local/share/fcitx5/skk/user.dict"),
                encoding: "EUC-JP".to_string(),
            })
        );
    }

    #[test]
    fn server_defaults_and_port_parsing() {
        let base = Path::new(BASE);
        assert_eq!(
            resolve(&DictRecord::server("", ""), base),
            Ok(DictionarySource::Server {
                host: "localhost".to_string(),
                port: 1178,
                encoding: "EUC-JP".to_string(),
            })
        );
        assert_eq!(
            resolve(&DictRecord::server("h", "x"), base),
            Err(SourceError::InvalidPort {
                host: "h".to_string(),
                port: "x".to_string(),
            })
        );
    }

    #[test]
    fn resolve_all_skips_bad_records_and_keeps_order() {
        let records = vec![
            DictRecord::server("h", "99999"),
            DictRecord::file("/b", FileMode::ReadOnly),
            DictRecord::server("h", "1179"),
        ];
        let sources = resolve_all(&records, Path::new(BASE));
        assert_eq!(sources.len(), 2);
        assert!(matches!(sources[0], DictionarySource::File { .. }));
        assert!(matches!(sources[1], DictionarySource::Server { port: 1179, .. }));
    }
}
