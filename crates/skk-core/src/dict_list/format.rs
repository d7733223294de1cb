//! Flat-file dictionary-list format.
//!
//! One record per line, `key=value` pairs separated by `,`. There is no
//! escaping: a value containing `,` cannot be represented.

use std::collections::BTreeMap;

use tracing::debug;

use super::record::{DictRecord, RecordError, KNOWN_KEYS};

/// Every record type carries at least three keys, so shorter lines are noise.
const MIN_FIELDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),
    #[error("field without '=': {0}")]
    MissingSeparator(String),
    #[error("expected at least 3 known keys, found {0}")]
    TooFewKnownKeys(usize),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Parse a single line. Surrounding whitespace is ignored.
pub fn parse_line(line: &str) -> Result<DictRecord, LineError> {
    let tokens: Vec<&str> = line.trim().split(',').collect();
    if tokens.len() < MIN_FIELDS {
        return Err(LineError::TooFewFields(tokens.len()));
    }

    let mut fields: BTreeMap<&str, &str> = BTreeMap::new();
    for token in tokens {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| LineError::MissingSeparator(token.to_string()))?;
        if KNOWN_KEYS.contains(&key) {
            fields.insert(key, value);
        }
    }
    if fields.len() < MIN_FIELDS {
        return Err(LineError::TooFewKnownKeys(fields.len()));
    }

    Ok(DictRecord::from_fields(&fields)?)
}

/// Parse a whole file, dropping lines that are not valid records.
pub fn parse(content: &str) -> Vec<DictRecord> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(lineno, line)| match parse_line(line) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(line = lineno + 1, "skipping dictionary entry: {e}");
                None
            }
        })
        .collect()
}

/// Serialize records, one per line, each line newline-terminated.
pub fn serialize(records: &[DictRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict_list::FileMode;

    #[test]
    fn parses_file_and_server_lines() {
        assert_eq!(
            parse_line("file=/usr/share/skk/SKK-JISYO.L,type=file,mode=readonly"),
            Ok(DictRecord::file("/usr/share/skk/SKK-JISYO.L", FileMode::ReadOnly))
        );
        assert_eq!(
            parse_line("host=localhost,port=1178,type=server"),
            Ok(DictRecord::server("localhost", "1178"))
        );
    }

    #[test]
    fn two_fields_are_too_few() {
        assert_eq!(
            parse_line("file=/a,type=file"),
            Err(LineError::TooFewFields(2))
        );
        assert_eq!(parse_line("bad=line"), Err(LineError::TooFewFields(1)));
    }

    #[test]
    fn field_without_separator_rejects_line() {
        assert_eq!(
            parse_line("file=/a,type=file,readonly"),
            Err(LineError::MissingSeparator("readonly".to_string()))
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(
            parse_line("file=/a,type=file,mode=readwrite,color=blue"),
            Ok(DictRecord::file("/a", FileMode::ReadWrite))
        );
    }

    #[test]
    fn unknown_keys_do_not_count_towards_minimum() {
        assert_eq!(
            parse_line("file=/a,type=file,color=blue"),
            Err(LineError::TooFewKnownKeys(2))
        );
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let rec = parse_line("file=/a=b,type=file,mode=readonly").unwrap();
        assert_eq!(rec.label(), "/a=b");
    }

    #[test]
    fn later_duplicate_key_wins() {
        assert_eq!(
            parse_line("file=/a,file=/b,type=file,mode=readonly"),
            Ok(DictRecord::file("/b", FileMode::ReadOnly))
        );
    }

    #[test]
    fn encoding_is_kept() {
        let rec = parse_line("encoding=UTF-8,file=/a,mode=readonly,type=file").unwrap();
        assert_eq!(rec.explicit_encoding(), Some("UTF-8"));
    }

    #[test]
    fn parse_skips_blank_and_malformed_lines() {
        let content = "\n\
            file=/usr/share/skk/SKK-JISYO.L,type=file,mode=readonly\n\
            \n\
            bad=line\n\
            host=localhost,port=1178,type=server\n";
        let records = parse(content);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label(), "/usr/share/skk/SKK-JISYO.L");
        assert_eq!(records[1].label(), "localhost:1178");
    }

    #[test]
    fn serialize_terminates_every_line() {
        let records = vec![
            DictRecord::file("/a", FileMode::ReadOnly),
            DictRecord::server("h", "1"),
        ];
        assert_eq!(
            serialize(&records),
            "file=/a,mode=readonly,type=file\nhost=h,port=1,type=server\n"
        );
    }

    #[test]
    fn handles_crlf_line_endings() {
        let records = parse("file=/a,type=file,mode=readonly\r\n");
        assert_eq!(records, vec![DictRecord::file("/a", FileMode::ReadOnly)]);
    }
}
