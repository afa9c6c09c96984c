//! Global checker configuration.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton holding the
//! runtime settings of a process that embeds the checking engine. Values come from
//! environment variables (and a `.env` file when present). Per-field setters let
//! tests and embedding binaries override individual values at runtime.

use std::env;
use std::path::PathBuf;
use std::sync::{OnceLock, RwLock};

/// Complete configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    /// Directory the submitted repository is checked out into.
    pub artifact_root: String,
    /// JSON file describing every exercise and its strategy.
    pub catalog_path: String,
}

static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every value has a default, so this never fails.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "checker".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "checker=info".into()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "checker.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            artifact_root: env::var("ARTIFACT_ROOT").unwrap_or_else(|_| "/tmp/studentrepo".into()),
            catalog_path: env::var("CATALOG_PATH").unwrap_or_else(|_| "exercises.json".into()),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Reloads the configuration from the environment, dropping overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_project_name(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.project_name = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_log_dir(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_dir = value.into());
    }

    pub fn set_log_file(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_file = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_artifact_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.artifact_root = value.into());
    }

    pub fn set_catalog_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.catalog_path = value.into());
    }
}

// --- Free accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_dir() -> String {
    AppConfig::global().log_dir.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn catalog_path() -> String {
    AppConfig::global().catalog_path.clone()
}

/// Artifact root as an absolute path.
///
/// A relative `ARTIFACT_ROOT` is resolved against the current directory.
pub fn artifact_root() -> PathBuf {
    let p = PathBuf::from(AppConfig::global().artifact_root.clone());
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}
