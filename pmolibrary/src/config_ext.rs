//! Extension de pmoconfig pour la bibliothèque

use serde_yaml::Value;
use std::path::PathBuf;

/// Trait d'extension pour pmoconfig::Config
pub trait LibraryConfigExt {
    /// Chemin de l'instantané JSON de la bibliothèque, s'il est configuré
    ///
    /// Un chemin relatif est résolu par rapport au répertoire de configuration.
    fn library_snapshot_path(&self) -> Option<PathBuf>;
}

impl LibraryConfigExt for pmoconfig::Config {
    fn library_snapshot_path(&self) -> Option<PathBuf> {
        match self.get_value(&["library", "snapshot"]) {
            Ok(Value::String(s)) if !s.is_empty() => {
                let path = PathBuf::from(&s);
                if path.is_absolute() {
                    Some(path)
                } else {
                    Some(self.directory().join(path))
                }
            }
            Ok(_) => None,
            Err(err) => {
                tracing::debug!("No library snapshot configured: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmoconfig::Config;
    use tempfile::TempDir;

    #[test]
    fn test_relative_snapshot_resolves_in_config_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(
            config.library_snapshot_path(),
            Some(dir.path().join("library.json"))
        );
    }

    #[test]
    fn test_absolute_and_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        let absolute = dir.path().join("music.json");
        config
            .set_value(
                &["library", "snapshot"],
                Value::String(absolute.to_string_lossy().to_string()),
            )
            .unwrap();
        assert_eq!(config.library_snapshot_path(), Some(absolute));

        config
            .set_value(&["library", "snapshot"], Value::String(String::new()))
            .unwrap();
        assert_eq!(config.library_snapshot_path(), None);
    }
}
