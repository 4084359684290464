//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.width == 0 || self.defaults.height == 0 {
            return Err(ConfigError::ValidationError(
                "defaults.width and defaults.height must be > 0".into(),
            ));
        }
        if self.encoding.jpeg_quality == 0 || self.encoding.jpeg_quality > 100 {
            return Err(ConfigError::ValidationError(
                "encoding.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if !matches!(
            self.encoding.png_compression.as_str(),
            "fast" | "default" | "best"
        ) {
            return Err(ConfigError::ValidationError(format!(
                "encoding.png_compression must be fast, default or best (got {:?})",
                self.encoding.png_compression
            )));
        }
        if self.pipeline.event_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.event_buffer must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.max_target_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_target_dimension must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_quality() {
        let mut config = Config::default();
        config.encoding.jpeg_quality = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jpeg_quality"));
    }

    #[test]
    fn test_validate_rejects_unknown_png_compression() {
        let mut config = Config::default();
        config.encoding.png_compression = "maximum".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("png_compression"));
    }

    #[test]
    fn test_validate_rejects_zero_event_buffer() {
        let mut config = Config::default();
        config.pipeline.event_buffer = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("event_buffer"));
    }

    #[test]
    fn test_validate_rejects_zero_default_dimensions() {
        let mut config = Config::default();
        config.defaults.height = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("defaults.width"));
    }
}
