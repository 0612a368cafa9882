//! Field-mapping document loading

use std::path::{Path, PathBuf};
use std::sync::Arc;

use integration_geocoding::{FieldMapping, GeocodingError};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::MappingConfig;

/// Errors while loading a field-mapping document
#[derive(Debug, Error)]
pub enum MappingLoadError {
    /// The document could not be read
    #[error("Failed to read mapping file {path}: {source}")]
    Io {
        /// Path of the document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document was read but is not a valid mapping
    #[error("Invalid mapping file {path}: {source}")]
    Invalid {
        /// Path of the document
        path: PathBuf,
        /// Parse or validation error
        #[source]
        source: GeocodingError,
    },

    /// The bundled mapping is broken
    #[error(transparent)]
    Bundled(#[from] GeocodingError),
}

/// Load a mapping document from disk
pub fn load_mapping_file(path: &Path) -> Result<FieldMapping, MappingLoadError> {
    let document = std::fs::read_to_string(path).map_err(|source| MappingLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mapping =
        FieldMapping::from_toml(&document).map_err(|source| MappingLoadError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), version = mapping.version(), "Loaded field mapping");
    Ok(mapping)
}

/// Resolve the configured mapping, falling back to the bundled table
pub fn load_field_mapping(config: &MappingConfig) -> Result<Arc<FieldMapping>, MappingLoadError> {
    let mapping = match &config.path {
        Some(path) => load_mapping_file(path)?,
        None => {
            debug!("Using bundled Google v3 field mapping");
            FieldMapping::google_v3()?
        },
    };
    Ok(Arc::new(mapping))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use integration_geocoding::Precedence;

    use super::*;

    #[test]
    fn bundled_mapping_when_unset() {
        let mapping = load_field_mapping(&MappingConfig::default()).unwrap();
        assert_eq!(mapping.field_key("geometry/location/lat"), Some("lat"));
    }

    #[test]
    fn mapping_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "version = 3\nprecedence = \"first_wins\"\n[components]\nlocality = \"locality\""
        )
        .unwrap();

        let config = MappingConfig {
            path: Some(file.path().to_path_buf()),
        };
        let mapping = load_field_mapping(&config).unwrap();
        assert_eq!(mapping.version(), 3);
        assert_eq!(mapping.precedence(), Precedence::FirstWins);
        assert_eq!(mapping.component_key("locality"), Some("locality"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_mapping_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(MappingLoadError::Io { .. })));
    }

    #[test]
    fn invalid_document_is_reported_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version = 1").unwrap();

        let err = load_mapping_file(file.path()).unwrap_err();
        assert!(matches!(err, MappingLoadError::Invalid { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
