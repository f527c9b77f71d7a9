use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use url::Url;

pub const SETTINGS_FILE: &str = "planner.toml";
pub const SEARCH_PATH: &str = "api/search";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("PLANNER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
        }
        Err(err) => tracing::warn!("ignoring unreadable {SETTINGS_FILE}: {err}"),
    }
}

/// Full search URL for a server base URL. A path prefix on the base
/// (`https://host/athletica`) is kept.
pub fn search_endpoint(server_url: &str) -> anyhow::Result<Url> {
    let server_url = server_url.trim();
    if server_url.is_empty() {
        bail!("server url is empty");
    }

    let mut base =
        Url::parse(server_url).with_context(|| format!("invalid server url '{server_url}'"))?;
    if !matches!(base.scheme(), "http" | "https") {
        bail!("server url '{server_url}' must use http or https");
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(SEARCH_PATH)
        .with_context(|| format!("failed to build search endpoint from '{server_url}'"))
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn joins_search_path_onto_bare_host() {
        assert_eq!(
            search_endpoint("http://127.0.0.1:8000").expect("endpoint").as_str(),
            "http://127.0.0.1:8000/api/search"
        );
    }

    #[test]
    fn keeps_path_prefix_of_server_url() {
        assert_eq!(
            search_endpoint(" https://example.com/athletica ")
                .expect("endpoint")
                .as_str(),
            "https://example.com/athletica/api/search"
        );
    }

    #[test]
    fn rejects_empty_and_non_http_urls() {
        assert!(search_endpoint("   ").is_err());
        assert!(search_endpoint("ftp://example.com").is_err());
        assert!(search_endpoint("not a url").is_err());
    }

    #[test]
    fn file_overrides_default_server_url() {
        let mut settings = Settings::default();
        apply_file_overrides(&mut settings, "server_url = \"http://planner.local:9000\"\n");
        assert_eq!(settings.server_url, "http://planner.local:9000");
    }

    #[test]
    fn unreadable_file_keeps_defaults() {
        let mut settings = Settings::default();
        apply_file_overrides(&mut settings, "server_url = [1, 2");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("planner_settings_test_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");

        let settings = load_settings_from(&temp_root.join(SETTINGS_FILE));
        if env::var("PLANNER_SERVER_URL").is_err() && env::var("APP__SERVER_URL").is_err() {
            assert_eq!(settings, Settings::default());
        }

        fs::remove_dir_all(temp_root).expect("cleanup");
    }
}
