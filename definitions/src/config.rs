//! Bridge configuration.
//!
//! Names the backend profile to translate for, how strictly to treat
//! localizations the profile can't carry, and where the command definitions
//! live.
//!
//! # Example YAML
//!
//! ```yaml
//! backend: javacord
//! strict_locales: true
//! pretty: false
//! definitions:
//!   - commands/
//!   - extra/admin.yaml
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slash_schema_core::BackendId;
use tracing::debug;

use crate::error::{DefinitionError, Result};
use crate::loader::{DefinitionSet, missing_paths};

/// Settings for translating a definition set.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Backend profile to translate for.
    pub backend: BackendId,
    /// Reject localizations in a locale the backend can't carry instead of
    /// dropping them.
    pub strict_locales: bool,
    /// Pretty-print translated requests.
    pub pretty: bool,
    /// Definition files and directories. Relative paths are resolved
    /// against the configuration file's directory on load.
    pub definitions: Vec<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            backend: BackendId::default(),
            strict_locales: false,
            pretty: true,
            definitions: Vec::new(),
        }
    }
}

impl BridgeConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](DefinitionError::IoError) if the file can't be
    /// read, [`YamlError`](DefinitionError::YamlError) if parsing fails, or
    /// [`InvalidConfig`](DefinitionError::InvalidConfig) for an empty
    /// definition path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;

        if config.definitions.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(DefinitionError::InvalidConfig(
                "definition paths must not be empty".to_string(),
            ));
        }
        if let Some(base) = path.parent() {
            config.definitions = config
                .definitions
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect();
        }

        debug!(config = %path.display(), backend = %config.backend, "Loaded bridge config");
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Loads every configured definition path into one set.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](DefinitionError::InvalidConfig) when no paths
    /// are configured or some don't exist, plus the errors of
    /// [`DefinitionSet::load`].
    pub fn load_definitions(&self) -> Result<DefinitionSet> {
        if self.definitions.is_empty() {
            return Err(DefinitionError::InvalidConfig("no definition paths configured".to_string()));
        }
        let missing = missing_paths(&self.definitions);
        if !missing.is_empty() {
            let listed: Vec<_> = missing.iter().map(|p| p.display().to_string()).collect();
            return Err(DefinitionError::InvalidConfig(format!(
                "definition paths not found: {}",
                listed.join(", ")
            )));
        }
        DefinitionSet::load(&self.definitions)
    }
}
