use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::DesignConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid design configuration: {0}")]
    ValidationError(String),
}

impl DesignConfig {
    /// Read and validate a YAML design file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading design configuration from {}", path.display());
        let file_contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&file_contents)?;

        // Polar files are looked up next to the design file
        if let (Some(polar), Some(dir)) = (config.airfoil_polar.as_mut(), path.parent()) {
            if polar.is_relative() {
                *polar = dir.join(&*polar);
            }
        }
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_valid() {
        let config = DesignConfig::from_yaml_str("name: bare\n").unwrap();
        assert_eq!(config.name, "bare");
        assert!(config.rotor.is_none());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = DesignConfig::from_yaml_str("rotor: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::YamlError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DesignConfig::from_file("/nonexistent/design.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_relative_polar_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "airfoil_polar: polars/naca0012.csv").unwrap();

        let config = DesignConfig::from_file(&path).unwrap();
        assert_eq!(
            config.airfoil_polar.unwrap(),
            dir.path().join("polars/naca0012.csv")
        );
    }
}
