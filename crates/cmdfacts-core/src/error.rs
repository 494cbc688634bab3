//! Error types for cmdfacts-core

use thiserror::Error;

/// Result type alias using cmdfacts-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for cmdfacts
#[derive(Error, Debug)]
pub enum Error {
    /// Artifact file is absent on load
    #[error("'{path}' file is not found")]
    NotFound { path: String },

    /// Compiler-emitted dependency file has an unparsable header
    #[error("Dependencies file has unsupported format: {path} (header: {header:?})")]
    DepsFormat { path: String, header: String },

    /// No extension is registered for the requested capability
    #[error("Can't find '{name}' extension")]
    UnresolvedCapability { name: String },

    /// A resolved prerequisite does not provide what its dependent needs
    #[error("Extension '{extension}' requires '{capability}': {reason}")]
    Prerequisite {
        extension: String,
        capability: String,
        reason: String,
    },

    /// Required external toolchain is missing or failing
    #[error("Toolchain error: {message}")]
    Environment { message: String },

    /// Requirement graph contains a cycle
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Command recognition pattern does not compile
    #[error("Invalid command pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a dependency file format error
    pub fn deps_format(path: impl Into<String>, header: impl Into<String>) -> Self {
        Self::DepsFormat {
            path: path.into(),
            header: header.into(),
        }
    }

    /// Create an unresolved capability error
    pub fn unresolved_capability(name: impl Into<String>) -> Self {
        Self::UnresolvedCapability { name: name.into() }
    }

    /// Create a prerequisite error
    pub fn prerequisite(
        extension: impl Into<String>,
        capability: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Prerequisite {
            extension: extension.into(),
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    /// Create an environment (toolchain) error
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment {
            message: message.into(),
        }
    }

    /// Create a circular dependency error
    pub fn circular_dependency(cycle: impl Into<String>) -> Self {
        Self::CircularDependency {
            cycle: cycle.into(),
        }
    }

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

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}
