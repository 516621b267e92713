//! Module configuration
//!
//! A small YAML document controls how the module announces itself and where
//! recordings go. A missing or unreadable file is not an error at this
//! level: the host still gets a working module with the built-in identity.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::sensors::SensorLayout;
use crate::{Result, TracksideError};

/// Settings for one module instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModuleConfig {
    /// Name the module registers under with the host.
    pub name: String,
    /// Human readable description shown in host UIs.
    pub description: String,
    /// Directory recorded telemetry is written into.
    pub output_dir: PathBuf,
    /// Maximum range finder distance in meters.
    pub sensor_range: f64,
    /// Number of range finders spread across the forward arc.
    pub sensor_count: usize,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            name: "trackside".to_string(),
            description: "Track perception and telemetry recording module".to_string(),
            output_dir: PathBuf::from("."),
            sensor_range: 200.0,
            sensor_count: 19,
        }
    }
}

impl ModuleConfig {
    /// Load settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| TracksideError::config_error(path, e))?;
        let config: Self = serde_yaml_ng::from_str(&text)
            .map_err(|e| TracksideError::config_error(path, e))?;
        debug!(path = %path.display(), name = %config.name, "module config loaded");
        Ok(config)
    }

    /// Load settings, falling back to the built-in defaults when the file
    /// is missing or does not parse. The failure is logged once.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(error) => {
                warn!(%error, "using built-in module config");
                Self::default()
            }
        }
    }

    /// The sensor layout this configuration asks for.
    pub fn sensor_layout(&self) -> SensorLayout {
        SensorLayout::forward_arc(self.sensor_count, self.sensor_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use std::fs;

    #[test]
    fn defaults_describe_the_reference_module() {
        let config = ModuleConfig::default();
        assert_eq!(config.name, "trackside");
        assert_eq!(config.sensor_count, 19);
        assert_eq!(config.sensor_range, 200.0);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.sensor_layout().len(), 19);
    }

    #[test]
    fn load_reads_a_full_document() -> Result<()> {
        let dir = tempfile::tempdir().context("creating temp dir")?;
        let path = dir.path().join("module.yaml");
        fs::write(
            &path,
            "name: quali-logger\n\
             description: qualifying session logger\n\
             output_dir: /var/log/trackside\n\
             sensor_range: 150.0\n\
             sensor_count: 7\n",
        )?;

        let config = ModuleConfig::load(&path)?;
        assert_eq!(config.name, "quali-logger");
        assert_eq!(config.output_dir, PathBuf::from("/var/log/trackside"));
        assert_eq!(config.sensor_range, 150.0);
        assert_eq!(config.sensor_count, 7);
        Ok(())
    }

    #[test]
    fn missing_fields_keep_their_defaults() -> Result<()> {
        let dir = tempfile::tempdir().context("creating temp dir")?;
        let path = dir.path().join("module.yaml");
        fs::write(&path, "sensor_count: 5\n")?;

        let config = ModuleConfig::load(&path)?;
        assert_eq!(config.sensor_count, 5);
        assert_eq!(config.name, "trackside");
        assert_eq!(config.sensor_range, 200.0);
        Ok(())
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = ModuleConfig::load("/nonexistent/trackside/module.yaml")
            .expect_err("missing file must not load");
        assert!(matches!(err, TracksideError::Config { .. }));
        assert!(!err.is_fatal(), "config failures leave the module usable");
    }

    #[test]
    fn unparsable_file_is_a_config_error() -> Result<()> {
        let dir = tempfile::tempdir().context("creating temp dir")?;
        let path = dir.path().join("module.yaml");
        fs::write(&path, "sensor_count: [not, a, number\n")?;

        let err = ModuleConfig::load(&path).expect_err("bad YAML must not load");
        assert!(matches!(err, TracksideError::Config { .. }));
        Ok(())
    }

    #[test]
    fn load_or_default_absorbs_failures() {
        let _ = tracing_subscriber::fmt::try_init();
        let config = ModuleConfig::load_or_default("/nonexistent/trackside/module.yaml");
        assert_eq!(config, ModuleConfig::default());
    }
}
