use std::env;
use std::path::PathBuf;

use crate::error::IngestError;

pub const DB_PATH_ENV: &str = "APP_DB_PATH";
const CACHE_DIR: &str = "hb_ingest";
const DB_FILE: &str = "handball_matches.sqlite";

/// Where the ingest run writes. Resolved once at startup and handed to the
/// orchestrator; nothing reads storage settings from the environment after
/// this point.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn from_env() -> Result<Self, IngestError> {
        if let Ok(raw) = env::var(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Ok(Self::new(trimmed));
            }
        }
        default_db_path().map(Self::new).ok_or_else(|| {
            IngestError::Configuration(format!(
                "no sqlite path: set {DB_PATH_ENV} or provide a home/cache directory"
            ))
        })
    }
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

fn app_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    // Fallback to ~/.cache on linux-like systems.
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}
