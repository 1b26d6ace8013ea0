//! Secure connect bundle parsing
//!
//! The bundle referenced by `ASTRA_DB_SECURE_BUNDLE_PATH` is a zip archive
//! whose `config.json` names the database host
//! (`<db-id>-<region>.db.astra.datastax.com`). The Data API for the same
//! database lives at `https://<db-id>-<region>.apps.astra.datastax.com`, so
//! the endpoint can be derived without any extra configuration.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Suffix of the CQL host inside the bundle
const DB_HOST_SUFFIX: &str = ".db.astra.datastax.com";
/// Domain serving the Data API
const API_HOST_SUFFIX: &str = ".apps.astra.datastax.com";

/// Connection details extracted from a secure connect bundle
#[derive(Debug, Clone, Deserialize)]
pub struct BundleConfig {
    /// Database host (`<db-id>-<region>.db.astra.datastax.com`)
    pub host: String,
    /// CQL proxy port, unused by the Data API path
    #[serde(default)]
    pub port: Option<u16>,
    /// Keyspace baked into the bundle, if any
    #[serde(default)]
    pub keyspace: Option<String>,
}

/// Read and parse a secure connect bundle from disk
pub fn read_bundle(path: &Path) -> Result<BundleConfig> {
    let display = path.display().to_string();

    let file = File::open(path).map_err(|e| Error::bundle(&display, e.to_string()))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| Error::bundle(&display, e.to_string()))?;

    let mut entry = archive
        .by_name("config.json")
        .map_err(|_| Error::bundle(&display, "bundle does not contain config.json"))?;

    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .map_err(|e| Error::bundle(&display, e.to_string()))?;

    let config: BundleConfig = serde_json::from_str(&contents)
        .map_err(|e| Error::bundle(&display, format!("invalid config.json: {e}")))?;

    if config.host.is_empty() {
        return Err(Error::bundle(&display, "config.json has no host"));
    }

    Ok(config)
}

/// Derive the Data API endpoint from the bundle's database host
pub fn data_api_endpoint(config: &BundleConfig) -> Result<String> {
    let Some(prefix) = config.host.strip_suffix(DB_HOST_SUFFIX) else {
        return Err(Error::Config(format!(
            "bundle host '{}' is not an Astra DB host",
            config.host
        )));
    };

    Ok(format!("https://{prefix}{API_HOST_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn write_bundle(entries: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        let cursor = writer.finish().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&cursor.into_inner()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn parses_host_from_bundle() {
        let file = write_bundle(&[(
            "config.json",
            r#"{"host": "0b1c2d3e-us-east1.db.astra.datastax.com", "port": 29080, "keyspace": "pdfchat"}"#,
        )]);

        let config = read_bundle(file.path()).unwrap();
        assert_eq!(config.host, "0b1c2d3e-us-east1.db.astra.datastax.com");
        assert_eq!(config.port, Some(29080));
        assert_eq!(config.keyspace.as_deref(), Some("pdfchat"));
    }

    #[test]
    fn derives_data_api_endpoint() {
        let config = BundleConfig {
            host: "0b1c2d3e-us-east1.db.astra.datastax.com".to_string(),
            port: None,
            keyspace: None,
        };

        assert_eq!(
            data_api_endpoint(&config).unwrap(),
            "https://0b1c2d3e-us-east1.apps.astra.datastax.com"
        );
    }

    #[test]
    fn rejects_non_astra_host() {
        let config = BundleConfig {
            host: "cassandra.internal.example.com".to_string(),
            port: None,
            keyspace: None,
        };

        assert!(matches!(data_api_endpoint(&config), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_bundle_without_config_json() {
        let file = write_bundle(&[("identity.jks", "not json")]);

        let err = read_bundle(file.path()).unwrap_err();
        assert!(matches!(err, Error::Bundle { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn rejects_missing_file() {
        let err = read_bundle(Path::new("/nonexistent/scb.zip")).unwrap_err();
        assert!(matches!(err, Error::Bundle { .. }));
    }
}
