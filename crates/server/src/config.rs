use std::{collections::HashMap, fs};

use server_api::{render::DEFAULT_HTMX_SCRIPT_URL, Escaping};
use tracing::warn;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub render_escaping: Escaping,
    pub htmx_script_url: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            database_url: "sqlite://./data/contact.db".into(),
            render_escaping: Escaping::Html,
            htmx_script_url: DEFAULT_HTMX_SCRIPT_URL.into(),
            max_body_bytes: 16 * 1024,
        }
    }
}

/// Defaults, then `server.toml`, then environment (`APP__*` beats the plain name).
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    settings
}

pub(crate) fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(cfg) => cfg,
        Err(error) => {
            warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file");
            return;
        }
    };
    let get = |key: &str| {
        file_cfg.get(key).map(|value| match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    };

    if let Some(v) = get("bind_addr") {
        settings.server_bind = v;
    }
    if let Some(v) = get("database_url") {
        settings.database_url = v;
    }
    apply_parsed(&mut settings.render_escaping, get("render_escaping"), "render_escaping");
    if let Some(v) = get("htmx_script_url") {
        settings.htmx_script_url = v;
    }
    apply_parsed(&mut settings.max_body_bytes, get("max_body_bytes"), "max_body_bytes");
}

pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let pick = |plain: Option<&str>, prefixed: &str| {
        lookup(prefixed).or_else(|| plain.and_then(&lookup))
    };

    if let Some(v) = pick(Some("SERVER_BIND"), "APP__BIND_ADDR") {
        settings.server_bind = v;
    }
    if let Some(v) = pick(Some("DATABASE_URL"), "APP__DATABASE_URL") {
        settings.database_url = v;
    }
    apply_parsed(
        &mut settings.render_escaping,
        pick(None, "APP__RENDER_ESCAPING"),
        "APP__RENDER_ESCAPING",
    );
    if let Some(v) = pick(None, "APP__HTMX_SCRIPT_URL") {
        settings.htmx_script_url = v;
    }
    apply_parsed(
        &mut settings.max_body_bytes,
        pick(None, "APP__MAX_BODY_BYTES"),
        "APP__MAX_BODY_BYTES",
    );
}

fn apply_parsed<T: std::str::FromStr>(slot: &mut T, raw: Option<String>, key: &str) {
    let Some(raw) = raw else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value = %raw, "ignoring unparseable setting"),
    }
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    storage::ensure_sqlite_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url
        .strip_prefix("sqlite://")
        .or_else(|| raw_database_url.strip_prefix("sqlite:"))
    {
        return sqlite_url_for_path(path);
    }

    if raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    sqlite_url_for_path(raw_database_url)
}

fn sqlite_url_for_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let bytes = path.as_bytes();
    let has_drive_letter = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    if has_drive_letter {
        format!("sqlite:{path}")
    } else {
        format!("sqlite://{path}")
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
