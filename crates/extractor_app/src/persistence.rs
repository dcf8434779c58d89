use std::fs;
use std::path::Path;

use client_logging::{client_error, client_info, client_warn};
use extractor_client::AtomicFileWriter;
use serde::{Deserialize, Serialize};

const SETTINGS_FILENAME: &str = ".extractor_settings.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedSettings {
    model: Option<String>,
}

/// Loads the model the user saved in an earlier run, if any.
pub(crate) fn load_saved_model(dir: &Path) -> Option<String> {
    let path = dir.join(SETTINGS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return None;
        }
        Err(err) => {
            client_warn!("Failed to read saved settings from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str::<PersistedSettings>(&content) {
        Ok(settings) => {
            client_info!("Loaded saved settings from {:?}", path);
            settings.model
        }
        Err(err) => {
            client_warn!("Failed to parse saved settings from {:?}: {}", path, err);
            None
        }
    }
}

pub(crate) fn save_settings(dir: &Path, model: &str) {
    let settings = PersistedSettings {
        model: Some(model.to_string()),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&settings, pretty) {
        Ok(text) => text,
        Err(err) => {
            client_error!("Failed to serialize settings: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    if let Err(err) = writer.write(SETTINGS_FILENAME, content.as_bytes()) {
        client_error!("Failed to write settings to {:?}: {}", dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::{load_saved_model, save_settings, SETTINGS_FILENAME};

    #[test]
    fn saved_model_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        save_settings(dir.path(), "gemini-1.5-pro");
        assert_eq!(
            load_saved_model(dir.path()),
            Some("gemini-1.5-pro".to_string())
        );
    }

    #[test]
    fn missing_settings_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_saved_model(dir.path()), None);
    }

    #[test]
    fn corrupt_settings_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), "not ron at all").unwrap();
        assert_eq!(load_saved_model(dir.path()), None);
    }
}
