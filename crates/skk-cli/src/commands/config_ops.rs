use std::fs;
use std::io::Write;
use std::path::Path;

use skk_core::settings::{self, Settings};

use super::CliError;

/// Make `file` the active settings for the rest of the run.
pub fn use_settings(file: &Path) -> Result<&'static Settings, CliError> {
    let content = fs::read_to_string(file)?;
    Ok(settings::init_custom(&content)?)
}

pub fn settings_export(out: &mut dyn Write) -> Result<(), CliError> {
    write!(out, "{}", settings::DEFAULT_SETTINGS_TOML)?;
    Ok(())
}

pub fn settings_validate(out: &mut dyn Write, file: &Path) -> Result<(), CliError> {
    let content = fs::read_to_string(file)?;
    let s = settings::parse_settings_toml(&content)?;
    writeln!(
        out,
        "OK: rule={}, page_size={}, candidate keys={}",
        s.rule,
        s.page_size,
        s.candidate_labels().concat()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_settings_validate() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("skk.toml");

        let mut exported = Vec::new();
        settings_export(&mut exported).unwrap();
        fs::write(&file, &exported).unwrap();

        let mut out = Vec::new();
        settings_validate(&mut out, &file).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "OK: rule=default, page_size=7, candidate keys=1234567\n"
        );
    }

    // The only test in this crate that touches the process-wide settings.
    #[test]
    fn custom_settings_pick_the_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("skk.toml");
        let list = dir.path().join("custom_list");
        let toml = settings::DEFAULT_SETTINGS_TOML
            .replace(
                "dictionary_list = \"$FCITX_CONFIG_DIR/skk/dictionary_list\"",
                &format!("dictionary_list = \"{}\"", list.display()),
            )
            .replace("rule = \"default\"", "rule = \"act\"");
        fs::write(&file, toml).unwrap();

        let active = use_settings(&file).unwrap();
        assert_eq!(active.rule, "act");
        assert_eq!(crate::commands::dictionary_list_path(None).unwrap(), list);
        assert!(matches!(
            use_settings(&file),
            Err(CliError::Settings(_))
        ));
    }

    #[test]
    fn invalid_settings_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("skk.toml");
        fs::write(&file, "rule = 1").unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            settings_validate(&mut out, &file),
            Err(CliError::Settings(_))
        ));
    }
}
