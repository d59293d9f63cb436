//! Loading command definitions from disk.
//!
//! A [`DefinitionSet`] collects [`CommandDefinition`]s keyed by command name.
//! Files may hold a single definition or a list of them, in JSON (`.json`) or
//! YAML (`.yaml`, `.yml`).
//!
//! ```no_run
//! use slash_schema_definitions::DefinitionSet;
//!
//! let set = DefinitionSet::from_dir("commands/").unwrap();
//! let (tree, ids) = set.build_all().unwrap();
//! println!("Built {} commands", ids.len());
//! # let _ = tree;
//! ```

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use slash_schema_core::{CommandId, SchemaTree};
use tracing::debug;

use crate::definition::CommandDefinition;
use crate::error::{DefinitionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// One definition or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<CommandDefinition>),
    One(Box<CommandDefinition>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<CommandDefinition> {
        match self {
            Self::Many(definitions) => definitions,
            Self::One(definition) => vec![*definition],
        }
    }
}

/// Definitions keyed by command name, in name order.
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    definitions: BTreeMap<String, CommandDefinition>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `.json`, `.yaml` and `.yml` file in a directory.
    ///
    /// Other files are skipped. Files are read in path order so duplicate
    /// detection is deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::IoError`] if the directory or a file can't
    /// be read, a decoding error for a malformed file, or
    /// [`DefinitionError::DuplicateCommand`] if two files define the same
    /// command.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && Format::of(&file_path).is_some() {
                files.push(file_path);
            }
        }
        files.sort();

        let mut set = Self::new();
        for file in &files {
            set.extend_from_file(file)?;
        }
        debug!(dir = %path.display(), files = files.len(), commands = set.len(), "Loaded definition directory");
        Ok(set)
    }

    /// Loads a single file holding one definition or a list.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnsupportedFormat`] for an unknown
    /// extension, plus the errors of [`DefinitionSet::from_dir`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut set = Self::new();
        set.extend_from_file(path.as_ref())?;
        Ok(set)
    }

    /// Loads a mix of files and directories into one set.
    pub fn load<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut set = Self::new();
        for path in paths {
            let path = path.as_ref();
            let loaded = if path.is_dir() { Self::from_dir(path)? } else { Self::from_file(path)? };
            for definition in loaded.definitions.into_values() {
                set.insert(definition)?;
            }
        }
        Ok(set)
    }

    fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let format =
            Format::of(path).ok_or_else(|| DefinitionError::UnsupportedFormat(path.to_path_buf()))?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let parsed: OneOrMany = match format {
            Format::Json => serde_json::from_reader(reader)?,
            Format::Yaml => serde_yaml::from_reader(reader)?,
        };

        let definitions = parsed.into_vec();
        debug!(file = %path.display(), commands = definitions.len(), "Loaded definition file");
        for definition in definitions {
            self.insert(definition)?;
        }
        Ok(())
    }

    /// Adds a definition.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateCommand`] if the name is taken.
    pub fn insert(&mut self, definition: CommandDefinition) -> Result<()> {
        if self.definitions.contains_key(&definition.name) {
            return Err(DefinitionError::DuplicateCommand(definition.name));
        }
        self.definitions.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.definitions.values()
    }

    /// Builds every definition into one fresh tree, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Schema`] naming the first command that
    /// breaks a rule. The partial tree is dropped.
    pub fn build_all(&self) -> Result<(SchemaTree, Vec<CommandId>)> {
        let mut tree = SchemaTree::new();
        let mut ids = Vec::with_capacity(self.definitions.len());
        for definition in self.definitions.values() {
            let id = definition.build(&mut tree).map_err(|source| DefinitionError::Schema {
                command: definition.name.clone(),
                source,
            })?;
            ids.push(id);
        }
        debug!(commands = ids.len(), "Built definition set");
        Ok((tree, ids))
    }
}

impl FromIterator<CommandDefinition> for DefinitionSet {
    /// Collects definitions, keeping the last one for a repeated name.
    fn from_iter<I: IntoIterator<Item = CommandDefinition>>(iter: I) -> Self {
        Self {
            definitions: iter.into_iter().map(|d| (d.name.clone(), d)).collect(),
        }
    }
}

/// Paths a definition set can't be loaded from, for error reporting.
pub(crate) fn missing_paths(paths: &[PathBuf]) -> Vec<&Path> {
    paths.iter().filter(|p| !p.exists()).map(PathBuf::as_path).collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const PING: &str = r#"{"name": "ping", "description": "Check latency"}"#;
    const MANY_YAML: &str = "- name: echo\n  description: Echo text\n  options:\n    - { name: text, description: Text, type: string }\n- name: roll\n  description: Roll a die\n";

    #[test]
    fn test_from_dir_mixed_formats() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ping.json"), PING).unwrap();
        fs::write(dir.path().join("more.yml"), MANY_YAML).unwrap();
        fs::write(dir.path().join("README.md"), "# not a definition").unwrap();

        let set = DefinitionSet::from_dir(dir.path()).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["echo", "ping", "roll"]);
        assert_eq!(set.get("echo").unwrap().options.len(), 1);
    }

    #[test]
    fn test_duplicate_across_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), PING).unwrap();
        fs::write(dir.path().join("b.yaml"), "name: ping\ndescription: Again\n").unwrap();

        let err = DefinitionSet::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateCommand(name) if name == "ping"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ping.toml");
        fs::write(&path, "name = 'ping'").unwrap();
        assert!(matches!(
            DefinitionSet::from_file(&path),
            Err(DefinitionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_build_all_names_failing_command() {
        let set: DefinitionSet = [
            serde_json::from_str::<CommandDefinition>(PING).unwrap(),
            serde_json::from_str::<CommandDefinition>(r#"{"name": "Bad Name", "description": "X"}"#)
                .unwrap(),
        ]
        .into_iter()
        .collect();

        let err = set.build_all().unwrap_err();
        assert!(matches!(err, DefinitionError::Schema { ref command, .. } if command == "Bad Name"));
    }

    #[test]
    fn test_missing_paths() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().to_path_buf();
        let absent = dir.path().join("nope");
        let paths = vec![present, absent.clone()];
        assert_eq!(missing_paths(&paths), vec![absent.as_path()]);
    }
}
