//! # Configuration de PMOMusic
//!
//! La configuration est un document YAML unique, construit par couches :
//!
//! 1. la configuration par défaut intégrée au binaire (`pmomusic.yaml`)
//! 2. le fichier `config.yaml` du répertoire de configuration, s'il existe
//! 3. les variables d'environnement `PMOMUSIC_CONFIG__SECTION__CLE`
//!
//! Les clés sont insensibles à la casse. Le document fusionné est réécrit dans
//! `config.yaml` au chargement, ce qui matérialise les valeurs par défaut.
//!
//! Chaque crate ajoute ses accesseurs typés par un trait d'extension
//! (`BrowserConfigExt`, `LibraryConfigExt`) construit sur [`Config::get_value`].
//!
//! ```no_run
//! use pmoconfig::Config;
//!
//! let config = Config::load_config("")?;
//! let level = config.get_log_min_level()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, anyhow, bail};
use dirs::home_dir;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::info;

const DEFAULT_CONFIG: &str = include_str!("pmomusic.yaml");

const CONFIG_DIR_NAME: &str = ".pmomusic";
const CONFIG_FILE_NAME: &str = "config.yaml";
const ENV_CONFIG_DIR: &str = "PMOMUSIC_CONFIG";
const ENV_PREFIX: &str = "PMOMUSIC_CONFIG__";

const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Merged PMOMusic configuration, persisted in `<dir>/config.yaml`
#[derive(Debug)]
pub struct Config {
    dir: PathBuf,
    file: PathBuf,
    data: Mutex<Value>,
}

impl Config {
    /// Loads the layered configuration
    ///
    /// An empty `directory` falls back to `$PMOMUSIC_CONFIG`, then to an
    /// existing `.pmomusic` in the working directory or in the home directory.
    /// The directory is created when missing.
    pub fn load_config(directory: &str) -> Result<Self> {
        let dir = locate_dir(directory);
        ensure_writable_dir(&dir)?;
        info!(config_dir = %dir.display(), "Using config directory");

        let file = dir.join(CONFIG_FILE_NAME);
        let mut data: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        match fs::read(&file) {
            Ok(bytes) => {
                let external: Value = serde_yaml::from_slice(&bytes)
                    .with_context(|| format!("Invalid YAML in {}", file.display()))?;
                merge_yaml(&mut data, &external);
                info!(config_file = %file.display(), "Loaded config file");
            }
            Err(_) => {
                info!(config_file = %file.display(), "Config file not found, using embedded defaults");
            }
        }

        let mut data = lower_keys(data);
        apply_env_overrides(&mut data, env::vars());

        let config = Config {
            dir,
            file,
            data: Mutex::new(data),
        };
        config.save()?;
        Ok(config)
    }

    /// Configuration directory in use
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    fn lock(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes the current document back to `config.yaml`
    pub fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&*self.lock())?;
        fs::write(&self.file, yaml)
            .with_context(|| format!("Cannot write {}", self.file.display()))
    }

    /// Value at `path` (e.g. `&["browser", "default_page_size"]`)
    ///
    /// Returns an error if the path doesn't exist.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        lookup(&self.lock(), path).cloned()
    }

    /// Sets the value at `path`, creating intermediate sections, and saves
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        insert(&mut self.lock(), path, value)?;
        self.save()
    }

    /// `host.logger.min_level`
    pub fn get_log_min_level(&self) -> Result<String> {
        Ok(match self.get_value(&["host", "logger", "min_level"])? {
            Value::String(level) => level,
            _ => DEFAULT_LOG_MIN_LEVEL.to_string(),
        })
    }

    /// `host.logger.enable_console`
    pub fn get_log_enable_console(&self) -> Result<bool> {
        Ok(match self.get_value(&["host", "logger", "enable_console"])? {
            Value::Bool(enabled) => enabled,
            _ => DEFAULT_LOG_ENABLE_CONSOLE,
        })
    }
}

fn locate_dir(directory: &str) -> PathBuf {
    if !directory.is_empty() {
        return PathBuf::from(directory);
    }
    if let Some(dir) = env::var_os(ENV_CONFIG_DIR) {
        info!(env_var = ENV_CONFIG_DIR, path = ?dir, "Config directory from environment");
        return PathBuf::from(dir);
    }

    let local = PathBuf::from(CONFIG_DIR_NAME);
    let home = home_dir().map(|home| home.join(CONFIG_DIR_NAME));
    std::iter::once(local.clone())
        .chain(home)
        .find(|candidate| candidate.is_dir())
        .unwrap_or(local)
}

fn ensure_writable_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create config directory {}", dir.display()))?;
    if fs::metadata(dir)?.permissions().readonly() {
        bail!("Config directory {} is read-only", dir.display());
    }
    Ok(())
}

fn lookup<'a>(data: &'a Value, path: &[&str]) -> Result<&'a Value> {
    path.iter().enumerate().try_fold(data, |node, (depth, key)| {
        let Value::Mapping(map) = node else {
            return Err(anyhow!("{} is not a section", path[..depth].join(".")));
        };
        map.get(&Value::String(key.to_lowercase()))
            .ok_or_else(|| anyhow!("Path {} does not exist", path[..=depth].join(".")))
    })
}

fn insert(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *data = value;
        return Ok(());
    };

    let mut node = data;
    for key in parents {
        let Value::Mapping(map) = node else {
            bail!("Cannot set {}: {} is not a section", path.join("."), key);
        };
        node = map
            .entry(Value::String(key.to_lowercase()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }
    match node {
        Value::Mapping(map) => {
            map.insert(Value::String(last.to_lowercase()), value);
            Ok(())
        }
        _ => bail!("Cannot set {}: parent is not a section", path.join(".")),
    }
}

/// `PMOMUSIC_CONFIG__BROWSER__DEFAULT_PAGE_SIZE=20` sets `browser.default_page_size`
fn apply_env_overrides(data: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (name, raw) in vars {
        let Some(stripped) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<&str> = stripped.split("__").collect();
        // Valeur YAML si elle se lit comme telle, chaîne brute sinon
        let parsed: Option<Value> = serde_yaml::from_str(&raw).ok();
        let value = parsed.unwrap_or(Value::String(raw));
        if let Err(err) = insert(data, &path, value) {
            tracing::warn!(variable = %name, "Ignoring config override: {}", err);
        }
    }
}

fn lower_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(key) => Value::String(key.to_lowercase()),
                        other => other,
                    };
                    (key, lower_keys(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lower_keys).collect()),
        other => other,
    }
}

/// Sections merge key by key; any other value from `external` replaces the default
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(defaults), Value::Mapping(overrides)) => {
            for (key, value) in overrides {
                match defaults.get_mut(key) {
                    Some(slot) => merge_yaml(slot, value),
                    None => {
                        defaults.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
