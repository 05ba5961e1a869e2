use earthview_input::InputConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from reading a viewer config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Viewer settings. Every field is optional in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// glTF file to display.
    pub model_path: PathBuf,
    /// Text shown in the caption panel.
    pub caption: String,
    pub input: InputConfig,
    /// Largest scroll offset the wheel can reach, in pixels.
    pub max_scroll: f32,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("earth/scene.gltf"),
            caption: "Welcome to Earth".into(),
            input: InputConfig::default(),
            max_scroll: 2000.0,
            window_width: 1280,
            window_height: 720,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = ViewerConfig::default();
        assert_eq!(c.model_path, PathBuf::from("earth/scene.gltf"));
        assert_eq!(c.input.sensitivity, 0.005);
        assert_eq!((c.window_width, c.window_height), (1280, 720));
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "caption": "Hi", "input": {{ "sensitivity": 0.01 }} }}"#
        )
        .unwrap();
        let c = ViewerConfig::load(file.path()).unwrap();
        assert_eq!(c.caption, "Hi");
        assert_eq!(c.input.sensitivity, 0.01);
        assert_eq!(c.max_scroll, 2000.0);
        assert_eq!(c.model_path, PathBuf::from("earth/scene.gltf"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewerConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn bad_json_is_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ caption: ").unwrap();
        let err = ViewerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
