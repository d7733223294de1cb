use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use skk_cli::commands::{self, config_ops, dict_list_ops, rule_ops};
use skk_core::form::{DictForm, DictKind};
use skk_core::settings::settings;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Parser)]
#[command(name = "skkdict", about = "SKK dictionary list manager")]
struct Cli {
    /// Dictionary list file (default: `dictionary_list` from the settings)
    #[arg(long, global = true)]
    file: Option<String>,
    /// Settings TOML to use instead of the built-in defaults
    #[arg(long, global = true)]
    settings: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the dictionaries in priority order
    List,
    /// Append a dictionary
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },
    /// Remove entries starting at INDEX
    Remove {
        index: usize,
        /// Number of consecutive entries to remove
        #[arg(long, default_value = "1")]
        count: usize,
    },
    /// Raise an entry's priority by one
    MoveUp { index: usize },
    /// Lower an entry's priority by one
    MoveDown { index: usize },
    /// Replace the list with the factory defaults
    Defaults {
        /// Installed template to use instead of the built-in one
        #[arg(long)]
        template: Option<String>,
    },
    /// Show the dictionaries the engine would open
    Sources,
    /// List installed typing rules
    Rules {
        /// Rule directories to scan (default: user and system rule dirs)
        dirs: Vec<String>,
        /// Rule to mark as selected (default: `rule` from the settings)
        #[arg(long)]
        current: Option<String>,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

#[derive(Subcommand)]
enum AddKind {
    /// Read-only system dictionary
    System {
        path: String,
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Writable user dictionary
    User {
        path: String,
        #[arg(long)]
        encoding: Option<String>,
    },
    /// skkserv dictionary server
    Server {
        host: String,
        #[arg(long, default_value = "1178")]
        port: String,
        #[arg(long)]
        encoding: Option<String>,
    },
}

fn build_form(kind: AddKind) -> DictForm {
    match kind {
        AddKind::System { path, encoding } => {
            let mut form = DictForm::new(DictKind::System);
            form.path = path;
            form.encoding = encoding.unwrap_or_default();
            form
        }
        AddKind::User { path, encoding } => {
            let mut form = DictForm::new(DictKind::User);
            match commands::user_base() {
                Ok(base) => form.accept_browsed(Path::new(&path), &base),
                Err(_) => form.path = path,
            }
            form.encoding = encoding.unwrap_or_default();
            form
        }
        AddKind::Server {
            host,
            port,
            encoding,
        } => {
            let mut form = DictForm::new(DictKind::Server);
            form.host = host;
            form.port = port;
            form.encoding = encoding.unwrap_or_default();
            form
        }
    }
}

fn main() {
    skk_cli::trace_init::init_tracing();
    let cli = Cli::parse();
    if let Some(file) = &cli.settings {
        die!(config_ops::use_settings(Path::new(file)), "Error: {}");
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let list_path = || die!(commands::dictionary_list_path(cli.file.clone()), "Error: {}");

    match cli.command {
        Command::List => die!(dict_list_ops::list(&mut out, &list_path()), "Error: {}"),
        Command::Add { kind } => {
            let form = build_form(kind);
            die!(dict_list_ops::add(&mut out, &list_path(), &form), "Error: {}")
        }
        Command::Remove { index, count } => die!(
            dict_list_ops::remove(&mut out, &list_path(), index, count),
            "Error: {}"
        ),
        Command::MoveUp { index } => die!(
            dict_list_ops::move_up(&mut out, &list_path(), index),
            "Error: {}"
        ),
        Command::MoveDown { index } => die!(
            dict_list_ops::move_down(&mut out, &list_path(), index),
            "Error: {}"
        ),
        Command::Defaults { template } => die!(
            dict_list_ops::defaults(&mut out, &list_path(), template.as_deref().map(Path::new)),
            "Error: {}"
        ),
        Command::Sources => {
            let base = die!(commands::user_base(), "Error: {}");
            die!(
                dict_list_ops::sources(&mut out, &list_path(), &base),
                "Error: {}"
            )
        }
        Command::Rules { dirs, current } => {
            let dirs = dirs.into_iter().map(PathBuf::from).collect();
            let current = current.unwrap_or_else(|| settings().rule.clone());
            die!(rule_ops::rules(&mut out, dirs, &current), "Error: {}")
        }
        Command::SettingsExport => die!(config_ops::settings_export(&mut out), "Error: {}"),
        Command::SettingsValidate { file } => die!(
            config_ops::settings_validate(&mut out, Path::new(&file)),
            "Error: {}"
        ),
    }
}
