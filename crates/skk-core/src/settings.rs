//! Engine options read from TOML.
//!
//! The built-in values live in `default_settings.toml`. A front-end may
//! install its own file with [`init_custom`], once, before anything reads
//! [`settings()`]. From then on the active settings are fixed for the process.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use crate::paths;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static ACTIVE: OnceLock<Settings> = OnceLock::new();

/// Validate `toml_content` and make it the active settings.
pub fn init_custom(toml_content: &str) -> Result<&'static Settings, SettingsError> {
    let custom = parse_settings_toml(toml_content)?;
    ACTIVE
        .set(custom)
        .map_err(|_| SettingsError::AlreadyInitialized)?;
    Ok(settings())
}

/// Active settings: the custom ones if installed, otherwise the built-in ones.
pub fn settings() -> &'static Settings {
    ACTIVE.get_or_init(builtin)
}

/// Settings parsed from the embedded `default_settings.toml`.
pub fn builtin() -> Settings {
    match parse_settings_toml(DEFAULT_SETTINGS_TOML) {
        Ok(s) => s,
        Err(e) => panic!("embedded default_settings.toml is invalid: {e}"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{field} {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings are already in use; install custom settings first")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationStyle {
    Japanese,
    Latin,
    WideLatin,
    WideLatinJapanese,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Hiragana,
    Katakana,
    HalfWidthKatakana,
    Latin,
    WideLatin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateLayout {
    NotSet,
    Vertical,
    Horizontal,
}

/// Keys used to pick a candidate on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateChooseKey {
    Digit,
    Abc,
    Qwerty,
}

impl CandidateChooseKey {
    fn alphabet(self) -> &'static str {
        match self {
            CandidateChooseKey::Digit => "1234567890",
            CandidateChooseKey::Abc => "abcdefghij",
            CandidateChooseKey::Qwerty => "asdfghjkl;",
        }
    }

    /// Labels for the first `page_size` candidates (at most 10).
    pub fn labels(self, page_size: usize) -> Vec<String> {
        self.alphabet()
            .chars()
            .take(page_size)
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub rule: String,
    pub punctuation_style: PunctuationStyle,
    pub initial_input_mode: InputMode,
    pub page_size: usize,
    pub candidate_layout: CandidateLayout,
    /// Return commits without inserting a newline.
    pub egg_like_new_line: bool,
    pub show_annotation: bool,
    pub candidate_choose_key: CandidateChooseKey,
    /// Conversions before the candidate window replaces inline cycling.
    pub n_triggers_to_show_cand_win: u32,
    /// Dictionary list file; may start with `$FCITX_CONFIG_DIR`.
    pub dictionary_list: String,
    pub keys: KeySettings,
}

impl Settings {
    pub fn candidate_labels(&self) -> Vec<String> {
        self.candidate_choose_key.labels(self.page_size)
    }

    /// `dictionary_list` with the placeholder resolved against `user_base`.
    pub fn dictionary_list_path(&self, user_base: &Path) -> PathBuf {
        paths::expand_placeholder(&self.dictionary_list, user_base)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeySettings {
    pub page_up: Vec<String>,
    pub page_down: Vec<String>,
    pub cursor_up: Vec<String>,
    pub cursor_down: Vec<String>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str)?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_range {
        ($field:ident, $range:expr) => {
            if !$range.contains(&s.$field) {
                return Err(SettingsError::InvalidValue {
                    field: stringify!($field).to_string(),
                    reason: format!("must be in {:?}", $range),
                });
            }
        };
    }
    macro_rules! check_non_empty {
        ($($path:ident).+) => {
            if s.$($path).+.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: stringify!($($path).+).replace(' ', ""),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_non_empty!(rule);
    check_non_empty!(dictionary_list);
    check_range!(page_size, 1..=10);
    check_range!(n_triggers_to_show_cand_win, 0..=7);
    check_non_empty!(keys.page_up);
    check_non_empty!(keys.page_down);
    check_non_empty!(keys.cursor_up);
    check_non_empty!(keys.cursor_down);

    Ok(())
}
