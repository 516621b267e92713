//! Error types for track perception and telemetry recording.
//!
//! All errors implement the `std::error::Error` trait and carry structured
//! context for diagnostics.
//!
//! ## Error Categories
//!
//! - **Config Errors**: the per-module settings resource cannot be read
//! - **Stream Errors**: the telemetry output stream cannot be opened or closed
//! - **Parse Errors**: malformed telemetry logs on the replay path
//! - **Layout Errors**: an invalid track segment ring at construction time
//!
//! ## Fatality
//!
//! The tick loop has no opportunity for retry, so errors classify themselves:
//!
//! ```rust
//! use trackside::TracksideError;
//!
//! let error = TracksideError::config_error("settings.yaml", "no such file");
//! if !error.is_fatal() {
//!     println!("Continuing with defaults");
//! }
//! ```
//!
//! ## Helper Constructors
//!
//! Use helper methods for common error scenarios:
//!
//! ```rust
//! use trackside::TracksideError;
//! use std::path::PathBuf;
//!
//! let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
//! let stream_error = TracksideError::stream_error(PathBuf::from("logs/brondehach.trackside.csv"), io_err);
//!
//! let parse_error = TracksideError::parse_error("header", "empty label at column 3");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for trackside operations.
pub type Result<T, E = TracksideError> = std::result::Result<T, E>;

/// Main error type for track perception and telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TracksideError {
    #[error("Module settings unavailable: {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Telemetry stream error: {path}")]
    Stream {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Track layout error: {details}")]
    Layout { details: String },
}

impl TracksideError {
    /// Returns whether this error must end the run.
    ///
    /// Stream and layout failures have no safe degraded mode; config and
    /// parse failures are absorbed with fallbacks or skipped records.
    pub fn is_fatal(&self) -> bool {
        match self {
            TracksideError::Config { .. } => false,
            TracksideError::Parse { .. } => false,
            TracksideError::Stream { .. } => true,
            TracksideError::Layout { .. } => true,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TracksideError::Config { .. } => vec![
                "Check the settings file exists and is readable",
                "Validate the YAML against ModuleConfig",
                "Rely on the built-in defaults if the file is optional",
            ],
            TracksideError::Stream { .. } => vec![
                "Check the output directory exists and is writable",
                "Ensure sufficient disk space",
                "Check file permissions",
            ],
            TracksideError::Parse { .. } => vec![
                "Check the log was produced by a compatible recorder",
                "Verify the file was not truncated mid-record",
            ],
            TracksideError::Layout { .. } => vec![
                "Check the segment ring is closed and non-empty",
                "Verify next/prev links stay within the arena",
            ],
        }
    }

    /// Helper constructor for settings errors with path context.
    pub fn config_error(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TracksideError::Config { path: path.into(), source: Some(source.into()) }
    }

    /// Helper constructor for telemetry stream errors with path context.
    pub fn stream_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TracksideError::Stream { path: path.into(), source }
    }

    /// Helper constructor for replay parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        TracksideError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for track layout errors.
    pub fn layout_error(details: impl Into<String>) -> Self {
        TracksideError::Layout { details: details.into() }
    }
}

impl From<std::io::Error> for TracksideError {
    fn from(err: std::io::Error) -> Self {
        TracksideError::Stream { path: PathBuf::from("<unknown>"), source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn error_messages_contain_their_context(
            file_name in "[a-z][a-z0-9_-]{0,20}",
            context in "\\w+",
            details in ".*"
          ) {
            let config_error = TracksideError::Config {
              path: PathBuf::from(&file_name),
              source: None,
            };
            let parse_error = TracksideError::parse_error(context.clone(), details.clone());
            let layout_error = TracksideError::layout_error(details.clone());

            let config_msg = config_error.to_string();
            prop_assert!(config_msg.contains(&file_name));

            let parse_msg = parse_error.to_string();
            prop_assert!(parse_msg.contains(&context));
            prop_assert!(parse_msg.contains(&details));

            let layout_msg = layout_error.to_string();
            prop_assert!(layout_msg.contains(&details));

            prop_assert!(!config_msg.is_empty());
            prop_assert!(!parse_msg.is_empty());
            prop_assert!(!layout_msg.is_empty());
          }

          #[test]
          fn source_chains_preserve_the_root_cause(
            base_message in "[ -~]+",
            layers in prop::collection::vec("\\w+", 1..4)
          ) {
            let mut current: Box<dyn std::error::Error + Send + Sync> =
              Box::new(std::io::Error::other(base_message.clone()));
            for layer in &layers {
              current = Box::new(TracksideError::Config {
                path: PathBuf::from(layer),
                source: Some(current),
              });
            }
            let top = TracksideError::Config {
              path: PathBuf::from("top"),
              source: Some(current),
            };

            let mut found_base = false;
            let mut depth = 0;
            let mut cursor = std::error::Error::source(&top);
            while let Some(source) = cursor {
              depth += 1;
              if source.to_string().contains(&base_message) {
                found_base = true;
              }
              cursor = std::error::Error::source(source);
              if depth > 10 {
                break;
              }
            }

            prop_assert_eq!(depth, layers.len() + 1);
            prop_assert!(found_base, "root cause '{}' not found in chain", base_message);
          }

          #[test]
          fn io_conversion_lands_on_the_stream_variant(reason in "[ -~]*") {
            let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, reason.clone());
            let converted: TracksideError = io_err.into();
            match converted {
              TracksideError::Stream { source, .. } => {
                prop_assert_eq!(source.to_string(), reason);
              }
              _ => prop_assert!(false, "expected Stream error from io::Error conversion"),
            }
          }
        }
    }

    #[test]
    fn error_constructors_validation() {
        let stream_error = TracksideError::stream_error(
            PathBuf::from("/test.csv"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "test"),
        );
        assert!(matches!(stream_error, TracksideError::Stream { .. }));

        let config_error = TracksideError::config_error("settings.yaml", "unreadable");
        assert!(matches!(config_error, TracksideError::Config { .. }));

        let layout_error = TracksideError::layout_error("empty ring");
        assert!(matches!(layout_error, TracksideError::Layout { .. }));
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<TracksideError>();

        let error = TracksideError::parse_error("row 7", "expected 91 values, got 4");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn fatality_classification() {
        let stream_error = TracksideError::stream_error(
            PathBuf::from("/logs/out.csv"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let layout_error = TracksideError::layout_error("next link out of range");
        let config_error = TracksideError::config_error("settings.yaml", "missing");
        let parse_error = TracksideError::parse_error("row 3", "bad float");

        assert!(stream_error.is_fatal());
        assert!(layout_error.is_fatal());
        assert!(!config_error.is_fatal());
        assert!(!parse_error.is_fatal());

        for error in [stream_error, layout_error, config_error, parse_error] {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            for suggestion in &suggestions {
                assert!(suggestion.len() > 5);
            }
        }
    }
}
