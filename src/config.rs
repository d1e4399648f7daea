use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.cloudflare.com/client/v4";

pub const TOKEN_KEY: &str = "CLOUDFLARE_API_TOKEN";
pub const API_URL_KEY: &str = "CLOUDFLARE_API_URL";
pub const CONFIRM_KEY: &str = "DNS_CLI_CONFIRM_DESTRUCTIVE";

/// Settings resolved once at startup. Nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_token: String,
    pub api_url: String,
    /// Ask for an explicit "yes" before deleting every record in a zone.
    pub confirm_destructive: bool,
}

/// Values that came from flags or the process environment (clap merges the two).
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api_token: Option<String>,
    pub api_url: Option<String>,
    pub confirm_destructive: Option<bool>,
}

impl Config {
    pub fn load(overrides: ConfigOverrides, env_file: Option<PathBuf>) -> Result<Config> {
        let file_vars = match env_file {
            Some(path) => {
                if !path.exists() {
                    bail!("Env file {:?} does not exist", path);
                }
                read_env_file(&path)?
            }
            None => match Config::get_default_env_path() {
                Some(path) => read_env_file(&path)?,
                None => HashMap::new(),
            },
        };
        Config::resolve(overrides, &file_vars)
    }

    pub(crate) fn resolve(
        overrides: ConfigOverrides,
        file_vars: &HashMap<String, String>,
    ) -> Result<Config> {
        let api_token = overrides
            .api_token
            .or_else(|| file_vars.get(TOKEN_KEY).cloned())
            .filter(|token| !token.trim().is_empty())
            .with_context(|| format!("No API token configured, set {}", TOKEN_KEY))?;

        let api_url = overrides
            .api_url
            .or_else(|| file_vars.get(API_URL_KEY).cloned())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let confirm_destructive = match overrides.confirm_destructive {
            Some(value) => value,
            None => match file_vars.get(CONFIRM_KEY) {
                Some(raw) => parse_bool(raw)
                    .with_context(|| format!("{} must be true or false, got {:?}", CONFIRM_KEY, raw))?,
                None => true,
            },
        };

        Ok(Config {
            api_token,
            api_url,
            confirm_destructive,
        })
    }

    /// `.env` in the working directory wins over the one under `~/.config`.
    pub(crate) fn get_default_env_path() -> Option<PathBuf> {
        let local = PathBuf::from(".env");
        if local.exists() {
            return Some(local);
        }
        home::home_dir()
            .map(|home| home.join(".config/dns-zone-cli/.env"))
            .filter(|path| path.exists())
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    debug!("Reading env file {:?}", path);
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read env file {:?}", path))?;
    parse_env(&contents).with_context(|| format!("Malformed env file {:?}", path))
}

pub(crate) fn parse_env(contents: &str) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            bail!("line {}: expected KEY=VALUE", index + 1);
        };
        vars.insert(key.trim().to_string(), unquote(value.trim()).to_string());
    }
    Ok(vars)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Value parser for flags and environment variables, accepting what the env file accepts.
pub(crate) fn parse_bool_arg(raw: &str) -> Result<bool, String> {
    parse_bool(raw).ok_or_else(|| format!("expected true/false, 1/0 or yes/no, got {:?}", raw))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
