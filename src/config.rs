use crate::dotenv::Environment;
use crate::env_keys::{
    ENV_GC_ACCESS_TOKEN, ENV_GC_SITE_URL, ENV_HOME, ENV_SITEMAP_URL, ENV_XDG_CONFIG_HOME,
};
use crate::error::Error;
use crate::filter::DEFAULT_PREFIXES;
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SITEMAP_URL: &str = "https://www.y-link.no/sitemap.xml";
pub const DEFAULT_SITE_URL: &str = "sc-domain:y-link.no";
pub const DEFAULT_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

pub static FORMAT: OnceCell<Format> = OnceCell::new();

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    pub token: Option<String>,
    pub site_url: Option<String>,
    pub sitemap_url: Option<String>,
    pub delay_ms: Option<u64>,
    pub prefixes: Option<Vec<String>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(p: &Path) -> Self {
        let mut s = String::new();
        match File::open(p).and_then(|mut f| f.read_to_string(&mut s)) {
            Ok(_) => toml::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed {}: {}", p.display(), e);
                Self::new()
            }),
            Err(_) => Self::new(),
        }
    }
}

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let mut path = match std::env::var(ENV_XDG_CONFIG_HOME) {
        Ok(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(std::env::var(ENV_HOME).unwrap_or_default()).join(".config"),
    };
    path.push("sitemap-inspect");
    path.push("config.toml");
    path
});

pub static CONFIG: Lazy<Config> = Lazy::new(|| Config::from_path(&CONFIG_PATH));

/// Values given on the command line. They beat every other source.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub sitemap_url: Option<String>,
    pub site_url: Option<String>,
    pub delay_ms: Option<u64>,
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub sitemap_url: String,
    pub site_url: String,
    pub access_token: Option<String>,
    pub delay: Duration,
    pub prefixes: Vec<String>,
}

impl Settings {
    /// Resolve everything except the access token, which may stay `None`.
    pub fn resolve_partial(ov: &Overrides, env: &Environment, conf: &Config) -> Self {
        let pick = |flag: &Option<String>, key: &str, file: &Option<String>, default: &str| {
            flag.clone()
                .or_else(|| env.var(key).filter(|s| !s.is_empty()))
                .or_else(|| file.clone().filter(|s| !s.is_empty()))
                .unwrap_or_else(|| default.to_owned())
        };
        let prefixes = if !ov.prefixes.is_empty() {
            ov.prefixes.clone()
        } else {
            conf.prefixes
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect())
        };
        Self {
            sitemap_url: pick(
                &ov.sitemap_url,
                ENV_SITEMAP_URL,
                &conf.sitemap_url,
                DEFAULT_SITEMAP_URL,
            ),
            site_url: pick(&ov.site_url, ENV_GC_SITE_URL, &conf.site_url, DEFAULT_SITE_URL),
            // a token that is set but empty counts as missing; it does not fall
            // through to the config file
            access_token: match env.var(ENV_GC_ACCESS_TOKEN) {
                Some(t) => Some(t).filter(|t| !t.is_empty()),
                None => conf.token.clone().filter(|t| !t.is_empty()),
            },
            delay: Duration::from_millis(
                ov.delay_ms.or(conf.delay_ms).unwrap_or(DEFAULT_DELAY_MS),
            ),
            prefixes,
        }
    }

    /// Like [`Settings::resolve_partial`] but the access token is required.
    pub fn resolve(ov: &Overrides, env: &Environment, conf: &Config) -> Result<Self, Error> {
        let settings = Self::resolve_partial(ov, env, conf);
        if settings.access_token.is_none() {
            return Err(Error::MissingToken {
                var: ENV_GC_ACCESS_TOKEN,
                env_file: env.path().display().to_string(),
            });
        }
        Ok(settings)
    }

    pub fn token(&self) -> &str {
        self.access_token.as_deref().unwrap_or_default()
    }
}
