//! Serialization of the catalog document to YAML or JSON.
//!
//! Serializer failures surface as [`Error::SerializationError`], filesystem failures as
//! [`Error::IoError`].

use crate::catalog::CatalogDocument;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a catalog document to YAML.
pub fn serialize_yaml(doc: &CatalogDocument) -> Result<String> {
    debug!("Serializing catalog document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes a catalog document to pretty-printed JSON.
pub fn serialize_json(doc: &CatalogDocument) -> Result<String> {
    debug!("Serializing catalog document to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Writes `content` to `path`, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(Error::IoError)?;
        }
    }
    fs::write(path, content)?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
