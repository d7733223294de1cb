use std::io::Write;
use std::path::PathBuf;

use skk_core::rules::{self, RuleList};

use super::CliError;

/// Print available rules, marking `current` with `*`.
pub fn rules(out: &mut dyn Write, dirs: Vec<PathBuf>, current: &str) -> Result<(), CliError> {
    let dirs = if dirs.is_empty() {
        rules::default_rule_dirs()
    } else {
        dirs
    };
    let list = RuleList::scan(&dirs);
    if list.is_empty() {
        writeln!(out, "(no rules found)")?;
        return Ok(());
    }
    let selected = list.find(current);
    for (i, rule) in list.iter().enumerate() {
        let mark = if selected == Some(i) { "*" } else { " " };
        writeln!(out, "{mark} {}\t{}", rule.name, rule.label)?;
    }
    if selected.is_none() {
        writeln!(out, "warning: rule {current:?} is not installed")?;
    }
    Ok(())
}
