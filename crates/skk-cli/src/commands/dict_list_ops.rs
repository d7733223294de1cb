use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use skk_core::dict_list::{DictList, DictListError};
use skk_core::form::DictForm;
use skk_core::paths::SYSTEM_TEMPLATE_PATH;
use skk_core::source::{self, DictionarySource};

use super::CliError;

/// Load the list at `path`. A missing file is an empty list.
pub fn open(path: &Path) -> Result<DictList, CliError> {
    let mut list = DictList::new();
    list.subscribe(|change| debug!(?change, "dictionary list changed"));
    match list.load_path(path) {
        Ok(_) => Ok(list),
        Err(DictListError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(list)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list(out: &mut dyn Write, path: &Path) -> Result<(), CliError> {
    let list = open(path)?;
    if list.is_empty() {
        writeln!(out, "(empty)")?;
        return Ok(());
    }
    for (i, record) in list.records().iter().enumerate() {
        writeln!(
            out,
            "{i}\t{}\t{}\t{}",
            record.type_name(),
            record.label(),
            record.encoding()
        )?;
    }
    writeln!(out, "---")?;
    writeln!(out, "{} entries", list.len())?;
    Ok(())
}

/// Validate `form`, append its record and save.
pub fn add(out: &mut dyn Write, path: &Path, form: &DictForm) -> Result<(), CliError> {
    let record = form.to_record()?;
    let mut list = open(path)?;
    let label = record.label();
    list.add(record);
    list.save(path)?;
    writeln!(out, "Added: {label}")?;
    Ok(())
}

pub fn remove(out: &mut dyn Write, path: &Path, index: usize, count: usize) -> Result<(), CliError> {
    let mut list = open(path)?;
    let labels: Vec<String> = (index..index.saturating_add(count))
        .map_while(|i| list.display_label(i))
        .collect();
    if list.remove_at(index, count) {
        list.save(path)?;
        for label in labels {
            writeln!(out, "Removed: {label}")?;
        }
    } else {
        writeln!(out, "Not found: {count} entries at {index} ({} total)", list.len())?;
    }
    Ok(())
}

pub fn move_up(out: &mut dyn Write, path: &Path, index: usize) -> Result<(), CliError> {
    let mut list = open(path)?;
    if list.move_up(index) {
        list.save(path)?;
        writeln!(out, "Moved up: {}", label_at(&list, index - 1))?;
    } else {
        writeln!(out, "Cannot move entry {index} up")?;
    }
    Ok(())
}

pub fn move_down(out: &mut dyn Write, path: &Path, index: usize) -> Result<(), CliError> {
    let mut list = open(path)?;
    if list.move_down(index) {
        list.save(path)?;
        writeln!(out, "Moved down: {}", label_at(&list, index + 1))?;
    } else {
        writeln!(out, "Cannot move entry {index} down")?;
    }
    Ok(())
}

/// Replace the list with the factory defaults: `template` if given,
/// otherwise the installed template, otherwise the built-in list.
pub fn defaults(out: &mut dyn Write, path: &Path, template: Option<&Path>) -> Result<(), CliError> {
    let mut list = open(path)?;
    let count = match template {
        Some(t) => list.defaults_from(t)?,
        None => installed_or_builtin(&mut list, Path::new(SYSTEM_TEMPLATE_PATH))?,
    };
    list.save(path)?;
    writeln!(out, "Restored {count} default entries")?;
    Ok(())
}

fn installed_or_builtin(list: &mut DictList, installed: &Path) -> Result<usize, CliError> {
    match list.defaults_from(installed) {
        Ok(count) => Ok(count),
        Err(DictListError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            debug!(path = %installed.display(), "no installed template, using built-in defaults");
            Ok(list.defaults())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print what the engine would open, in priority order.
pub fn sources(out: &mut dyn Write, path: &Path, user_base: &Path) -> Result<(), CliError> {
    let list = open(path)?;
    for source in source::resolve_all(list.records(), user_base) {
        match source {
            DictionarySource::File { path, encoding } => {
                writeln!(out, "file\t{}\t{encoding}", path.display())?
            }
            DictionarySource::Cdb { path, encoding } => {
                writeln!(out, "cdb\t{}\t{encoding}", path.display())?
            }
            DictionarySource::User { path, encoding } => {
                writeln!(out, "user\t{}\t{encoding}", path.display())?
            }
            DictionarySource::Server {
                host,
                port,
                encoding,
            } => writeln!(out, "server\t{host}:{port}\t{encoding}")?,
        }
    }
    Ok(())
}

fn label_at(list: &DictList, index: usize) -> String {
    list.display_label(index).unwrap_or_default()
}
