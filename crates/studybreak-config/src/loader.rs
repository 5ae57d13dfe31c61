use crate::schema::StudybreakConfig;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `server.base_url`
pub const URL_ENV_VAR: &str = "STUDYBREAK_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Jsonc,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;

        match ext {
            "jsonc" => Some(Self::Jsonc),
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: StudybreakConfig,
    pub path: PathBuf,
    pub format: ConfigFormat,
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicit `config_path` must exist and parse. Discovered files must parse
/// too; only their absence is tolerated.
pub fn load_config(config_path: Option<&Path>) -> Result<StudybreakConfig> {
    let config = match config_path {
        Some(path) => load_config_from_file(path)?.config,
        None => match find_config_file() {
            Some(path) => load_config_from_file(&path)?.config,
            None => StudybreakConfig::default(),
        },
    };

    Ok(apply_env_overrides(config))
}

pub fn resolve_config(config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let path = config_path
        .map(|p| p.to_path_buf())
        .or_else(find_config_file)
        .ok_or_else(|| anyhow!("No configuration file found"))?;

    load_config_from_file(&path)
}

pub fn load_config_from_file(path: &Path) -> Result<ResolvedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| anyhow!("Unknown config format for: {}", path.display()))?;

    let config = parse_config_content(&content, format)?;

    Ok(ResolvedConfig {
        config: expand_env_vars(config),
        path: path.to_path_buf(),
        format,
    })
}

fn parse_config_content(content: &str, format: ConfigFormat) -> Result<StudybreakConfig> {
    match format {
        ConfigFormat::Jsonc => json5::from_str(content).context("Failed to parse JSONC"),
        ConfigFormat::Json => serde_json::from_str(content).context("Failed to parse JSON"),
        ConfigFormat::Yaml => serde_yaml_ng::from_str(content).context("Failed to parse YAML"),
    }
}

const CONFIG_CANDIDATES: &[&str] = &[
    "studybreak.jsonc",
    "studybreak.json",
    "studybreak.yml",
    "studybreak.yaml",
    ".studybreak.jsonc",
    ".studybreak.json",
    ".studybreak.yml",
    ".studybreak.yaml",
];

fn global_config_dir() -> Option<PathBuf> {
    env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("studybreak"))
}

fn find_config_file() -> Option<PathBuf> {
    find_all_config_files().into_iter().next()
}

pub fn find_all_config_files() -> Vec<PathBuf> {
    let mut found = Vec::new();

    for candidate in CONFIG_CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            found.push(path);
        }
    }

    if let Some(dir) = global_config_dir() {
        for candidate in CONFIG_CANDIDATES {
            let path = dir.join(candidate);
            if path.exists() {
                found.push(path);
            }
        }
    }

    found
}

fn apply_env_overrides(mut config: StudybreakConfig) -> StudybreakConfig {
    if let Ok(url) = env::var(URL_ENV_VAR) {
        if !url.trim().is_empty() {
            config.server.base_url = url;
        }
    }
    config
}

fn expand_env_vars(mut config: StudybreakConfig) -> StudybreakConfig {
    config.server.base_url = expand_env_string(&config.server.base_url);
    config
}

fn expand_env_string(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        if chars.peek() == Some(&'{') {
            chars.next();
            let var_name: String = chars.by_ref().take_while(|&c| c != '}').collect();
            match env::var(&var_name) {
                Ok(value) => result.push_str(&value),
                Err(_) => {
                    result.push_str("${");
                    result.push_str(&var_name);
                    result.push('}');
                }
            }
            continue;
        }

        let mut var_name = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                var_name.push(c);
                chars.next();
            } else {
                break;
            }
        }

        if var_name.is_empty() {
            result.push('$');
        } else if let Ok(value) = env::var(&var_name) {
            result.push_str(&value);
        } else {
            result.push('$');
            result.push_str(&var_name);
        }
    }

    result
}
