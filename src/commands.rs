use crate::config::{load_settings, save_settings, ConfigError, Settings, StatePaths};
use crate::store::remote::RemoteStore;
use crate::store::repository::ConfigurationRepository;
use crate::store::ConfigurationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Wizard,
    List,
    Show,
    Delete,
    Remote,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "wizard" => CliVerb::Wizard,
        "list" => CliVerb::List,
        "show" => CliVerb::Show,
        "delete" => CliVerb::Delete,
        "remote" => CliVerb::Remote,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  wizard                               Run the interactive configuration wizard"
            .to_string(),
        "  list                                 List saved configurations (newest first)"
            .to_string(),
        "  show <id>                            Print one saved configuration as JSON".to_string(),
        "  delete <id>                          Delete a saved configuration".to_string(),
        "  remote [<url>|clear]                 Show or change the remote service URL".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Wizard => cmd_wizard(),
        CliVerb::List => cmd_list(),
        CliVerb::Show => cmd_show(&args[1..]),
        CliVerb::Delete => cmd_delete(&args[1..]),
        CliVerb::Remote => cmd_remote(&args[1..]),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}

pub(crate) fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub(crate) fn ensure_state_root() -> Result<StatePaths, String> {
    StatePaths::resolve().map_err(map_config_err)
}

/// Resolves the persistence backend for the current settings: the remote
/// service when a URL is configured, the local SQLite database otherwise.
pub(crate) fn open_store(
    paths: &StatePaths,
    settings: &Settings,
) -> Result<Box<dyn ConfigurationStore>, String> {
    if let Some(url) = &settings.remote_url {
        return Ok(Box::new(RemoteStore::new(url, Some(paths.root.clone()))));
    }
    let db_path = paths.database_path(settings);
    let repository = ConfigurationRepository::open(&db_path).map_err(|e| e.to_string())?;
    Ok(Box::new(repository))
}

fn cmd_wizard() -> Result<String, String> {
    let paths = ensure_state_root()?;
    let settings = load_settings(&paths).map_err(map_config_err)?;
    let store = open_store(&paths, &settings)?;
    crate::tui::wizard::cmd_wizard(store.as_ref())
}

fn cmd_list() -> Result<String, String> {
    let paths = ensure_state_root()?;
    let settings = load_settings(&paths).map_err(map_config_err)?;
    let store = open_store(&paths, &settings)?;
    let documents = store.list().map_err(|e| e.to_string())?;
    if documents.is_empty() {
        return Ok("no saved configurations".to_string());
    }
    let mut lines = vec![format!("saved configurations ({}):", documents.len())];
    for document in &documents {
        lines.push(format!(
            "  {}  {}  {}",
            document.id, document.basic.app_name, document.created_at
        ));
    }
    Ok(lines.join("\n"))
}

fn cmd_show(args: &[String]) -> Result<String, String> {
    let Some(id) = args.first() else {
        return Err("usage: show <id>".to_string());
    };
    let paths = ensure_state_root()?;
    let settings = load_settings(&paths).map_err(map_config_err)?;
    let store = open_store(&paths, &settings)?;
    let document = store.get(id).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&document).map_err(|e| format!("failed to render {id}: {e}"))
}

fn cmd_delete(args: &[String]) -> Result<String, String> {
    let Some(id) = args.first() else {
        return Err("usage: delete <id>".to_string());
    };
    let paths = ensure_state_root()?;
    let settings = load_settings(&paths).map_err(map_config_err)?;
    let store = open_store(&paths, &settings)?;
    store.delete(id).map_err(|e| e.to_string())?;
    Ok(format!("deleted {id}"))
}

fn cmd_remote(args: &[String]) -> Result<String, String> {
    let paths = ensure_state_root()?;
    let mut settings = load_settings(&paths).map_err(map_config_err)?;
    match args.first().map(String::as_str) {
        None => Ok(match &settings.remote_url {
            Some(url) => format!("remote_url={url}"),
            None => "remote_url is not set; using the local database".to_string(),
        }),
        Some("clear") => {
            settings.remote_url = None;
            let path = save_settings(&paths, &settings).map_err(map_config_err)?;
            Ok(format!("remote_url cleared\nconfig={}", path.display()))
        }
        Some(url) => {
            settings.remote_url = Some(url.to_string());
            settings.validate().map_err(map_config_err)?;
            let path = save_settings(&paths, &settings).map_err(map_config_err)?;
            Ok(format!("remote_url={url}\nconfig={}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_parse_to_their_commands() {
        assert_eq!(parse_cli_verb("wizard"), CliVerb::Wizard);
        assert_eq!(parse_cli_verb("list"), CliVerb::List);
        assert_eq!(parse_cli_verb("show"), CliVerb::Show);
        assert_eq!(parse_cli_verb("delete"), CliVerb::Delete);
        assert_eq!(parse_cli_verb("remote"), CliVerb::Remote);
        assert_eq!(parse_cli_verb("bogus"), CliVerb::Unknown);
    }

    #[test]
    fn empty_args_print_help() {
        let output = run_cli(Vec::new()).expect("help");
        assert!(output.contains("wizard"));
        assert!(output.contains("delete <id>"));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = run_cli(vec!["bogus".to_string()]).expect_err("unknown");
        assert_eq!(err, "unknown command `bogus`");
    }

    #[test]
    fn show_and_delete_require_an_id() {
        assert_eq!(
            cmd_show(&[]).expect_err("usage"),
            "usage: show <id>".to_string()
        );
        assert_eq!(
            cmd_delete(&[]).expect_err("usage"),
            "usage: delete <id>".to_string()
        );
    }
}
