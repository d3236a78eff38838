//! Error types for devstack-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using devstack-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for DevStack
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific path
    #[error("{action} {path}: {source}")]
    FileSystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Component name not present in the component table
    #[error("Unknown component: {component}")]
    UnknownComponent { component: String },

    /// Component descriptor rejected at construction
    #[error("Invalid component descriptor '{component}': {message}")]
    InvalidComponent { component: String, message: String },

    /// Catalog empty, unavailable or unreadable
    #[error("Version catalog for {component} unavailable: {message}")]
    Catalog { component: String, message: String },

    /// Requested version absent from the catalog
    #[error("URL for version {version} of {component} not found")]
    VersionNotFound { component: String, version: String },

    /// Version that cannot name a directory under the tool directory
    #[error("Invalid version '{version}' for {component}")]
    InvalidVersion { component: String, version: String },

    /// Transport failure or malformed URL
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Server answered with a non-success status
    #[error("Download of {url} failed: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Corrupt or unreadable archive
    #[error("Failed to extract {archive}: {message}")]
    Extraction { archive: PathBuf, message: String },

    /// Native installer could not be launched
    #[error("Failed to run installer {program}: {message}")]
    Installer { program: PathBuf, message: String },

    /// Uninstall called without a version
    #[error("A version of {component} must be specified for uninstallation (example: uninstall {component} <version>)")]
    UninstallArgument { component: String },

    /// Fatal failure of an install, naming what was being installed
    #[error("Failed to install {component} {version}: {source}")]
    Install {
        component: String,
        version: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Wrap an IO error with the path and action that produced it
    pub fn file_system(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Create an unknown component error
    pub fn unknown_component(component: impl Into<String>) -> Self {
        Self::UnknownComponent {
            component: component.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Catalog {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a version not found error
    pub fn version_not_found(component: impl Into<String>, version: impl Into<String>) -> Self {
        Self::VersionNotFound {
            component: component.into(),
            version: version.into(),
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Create an extraction error
    pub fn extraction(archive: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.into(),
            message: message.into(),
        }
    }

    /// Create an installer launch error
    pub fn installer(program: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Installer {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create an uninstall argument error
    pub fn invalid_version(component: impl Into<String>, version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            component: component.into(),
            version: version.into(),
        }
    }

    pub fn uninstall_argument(component: impl Into<String>) -> Self {
        Self::UninstallArgument {
            component: component.into(),
        }
    }

    /// Wrap a fatal install failure with the component and version
    pub fn install(component: impl Into<String>, version: impl Into<String>, source: Error) -> Self {
        Self::Install {
            component: component.into(),
            version: version.into(),
            source: Box::new(source),
        }
    }

    /// The underlying failure, looking through `Install` wrappers
    pub fn cause(&self) -> &Error {
        match self {
            Self::Install { source, .. } => source.cause(),
            other => other,
        }
    }

    /// Version or URL could not be resolved
    pub fn is_catalog(&self) -> bool {
        matches!(
            self.cause(),
            Self::Catalog { .. }
                | Self::VersionNotFound { .. }
                | Self::InvalidVersion { .. }
                | Self::UnknownComponent { .. }
        )
    }

    /// Network transport failure or non-success response
    pub fn is_download(&self) -> bool {
        matches!(self.cause(), Self::Download { .. } | Self::HttpStatus { .. })
    }

    /// Archive could not be read or extracted
    pub fn is_extraction(&self) -> bool {
        matches!(self.cause(), Self::Extraction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_wrapper_names_component_version_and_cause() {
        let err = Error::install("php", "8.2.0", Error::http_status("http://h/php.zip", 404));
        let msg = err.to_string();
        assert!(msg.contains("php"));
        assert!(msg.contains("8.2.0"));
        assert!(msg.contains("HTTP 404"));
    }

    #[test]
    fn test_classification_looks_through_wrapper() {
        let err = Error::install("x", "1.0", Error::extraction("/tmp/x.zip", "bad header"));
        assert!(err.is_extraction());
        assert!(!err.is_download());
        assert!(matches!(err.cause(), Error::Extraction { .. }));
    }

    #[test]
    fn test_catalog_kinds() {
        assert!(Error::version_not_found("go", "0.0.1").is_catalog());
        assert!(Error::catalog("go", "empty").is_catalog());
        assert!(Error::unknown_component("nope").is_catalog());
        assert!(Error::invalid_version("go", "..").is_catalog());
        assert!(!Error::download("u", "reset").is_catalog());
    }

    #[test]
    fn test_version_not_found_message() {
        let err = Error::version_not_found("node", "99.0.0");
        assert_eq!(err.to_string(), "URL for version 99.0.0 of node not found");
    }
}
