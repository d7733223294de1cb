use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Encoding assumed for dictionaries whose record carries no `encoding` key.
pub const DEFAULT_ENCODING: &str = "EUC-JP";

/// Keys understood in a dictionary-list line. Anything else is ignored on read.
pub(crate) const KNOWN_KEYS: [&str; 6] = ["file", "host", "port", "type", "mode", "encoding"];

/// Access mode of a file-backed dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    ReadOnly,
    ReadWrite,
}

impl FileMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FileMode::ReadOnly => "readonly",
            FileMode::ReadWrite => "readwrite",
        }
    }
}

impl FromStr for FileMode {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "readonly" => Ok(FileMode::ReadOnly),
            "readwrite" => Ok(FileMode::ReadWrite),
            other => Err(RecordError::BadMode(other.to_string())),
        }
    }
}

/// One dictionary source in the list.
///
/// Paths are kept as written: they may start with the `$FCITX_CONFIG_DIR`
/// placeholder and are only resolved when handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictRecord {
    File {
        path: String,
        mode: FileMode,
        encoding: Option<String>,
    },
    Server {
        host: String,
        port: String,
        encoding: Option<String>,
    },
}

/// Why a set of parsed fields could not become a [`DictRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("missing required key: {0}")]
    MissingKey(&'static str),
    #[error("unknown dictionary type: {0}")]
    UnknownType(String),
    #[error("invalid mode: {0}")]
    BadMode(String),
}

impl DictRecord {
    pub fn file(path: impl Into<String>, mode: FileMode) -> Self {
        DictRecord::File {
            path: path.into(),
            mode,
            encoding: None,
        }
    }

    pub fn server(host: impl Into<String>, port: impl Into<String>) -> Self {
        DictRecord::Server {
            host: host.into(),
            port: port.into(),
            encoding: None,
        }
    }

    /// Same record with an explicit encoding. An empty string clears it.
    pub fn with_encoding(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        let slot = match &mut self {
            DictRecord::File { encoding, .. } | DictRecord::Server { encoding, .. } => encoding,
        };
        *slot = if value.is_empty() { None } else { Some(value) };
        self
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DictRecord::File { .. } => "file",
            DictRecord::Server { .. } => "server",
        }
    }

    /// Encoding to open the dictionary with, falling back to EUC-JP.
    pub fn encoding(&self) -> &str {
        self.explicit_encoding().unwrap_or(DEFAULT_ENCODING)
    }

    pub fn explicit_encoding(&self) -> Option<&str> {
        match self {
            DictRecord::File { encoding, .. } | DictRecord::Server { encoding, .. } => {
                encoding.as_deref()
            }
        }
    }

    /// Text shown for this record in a dictionary list view.
    pub fn label(&self) -> String {
        match self {
            DictRecord::File { path, .. } => path.clone(),
            DictRecord::Server { host, port, .. } => format!("{host}:{port}"),
        }
    }

    /// Build a record from already-filtered `key → value` pairs.
    pub(crate) fn from_fields(fields: &BTreeMap<&str, &str>) -> Result<Self, RecordError> {
        let required = |key: &'static str| -> Result<String, RecordError> {
            fields
                .get(key)
                .map(|v| v.to_string())
                .ok_or(RecordError::MissingKey(key))
        };
        let encoding = fields
            .get("encoding")
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());

        match fields.get("type").copied() {
            Some("file") => Ok(DictRecord::File {
                path: required("file")?,
                mode: required("mode")?.parse()?,
                encoding,
            }),
            Some("server") => Ok(DictRecord::Server {
                host: required("host")?,
                port: required("port")?,
                encoding,
            }),
            Some(other) => Err(RecordError::UnknownType(other.to_string())),
            None => Err(RecordError::MissingKey("type")),
        }
    }

    /// `(key, value)` pairs in the order they are written to disk.
    pub(crate) fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::with_capacity(4);
        if let Some(encoding) = self.explicit_encoding() {
            out.push(("encoding", encoding));
        }
        match self {
            DictRecord::File { path, mode, .. } => {
                out.push(("file", path.as_str()));
                out.push(("mode", mode.as_str()));
            }
            DictRecord::Server { host, port, .. } => {
                out.push(("host", host.as_str()));
                out.push(("port", port.as_str()));
            }
        }
        out.push(("type", self.type_name()));
        out
    }
}

/// Flat-file form: `key=value` pairs joined by `,`, without the newline.
impl fmt::Display for DictRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.fields().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
