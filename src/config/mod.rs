//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {:?}", path))?;
    let config: RenderConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config: {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to the defaults
pub fn load_or_default(path: &Path) -> Result<RenderConfig> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!("no config at {:?}, using defaults", path);
        Ok(RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
audio:
  sample_rate: 22050
  bpm: 120

master:
  output_peak: 0.7

output:
  dir: assets/audio
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.audio.sample_rate, 22050);
        assert_eq!(config.audio.bpm, 120.0);
        assert_eq!(config.master.output_peak, 0.7);
        assert_eq!(config.master.mix_peak, 0.8);
        assert_eq!(config.output.dir, std::path::PathBuf::from("assets/audio"));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"audio:\n  sample_rate: 100\n").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_example_config_is_valid() {
        let config: RenderConfig =
            serde_yaml::from_str(include_str!("../../chipwave.example.yaml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.master.seed, RenderConfig::default().master.seed);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, RenderConfig::default());
    }
}
