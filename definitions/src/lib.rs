//! Command definitions as data.
//!
//! Lets a bot describe its slash commands in JSON or YAML files instead of
//! code, then builds them into a validated
//! [`SchemaTree`](slash_schema_core::SchemaTree).
//!
//! - [`CommandDefinition`], [`OptionDefinition`], [`ChoiceDefinition`]: the
//!   serializable shape, with `build` and `export` against a tree.
//! - [`DefinitionSet`]: loads definitions from files and directories.
//! - [`BridgeConfig`]: YAML configuration naming the backend profile and the
//!   definition paths.
//!
//! # Example
//!
//! ```
//! use slash_schema_core::{SchemaTree, validate_tree};
//! use slash_schema_definitions::CommandDefinition;
//!
//! let yaml = "
//! name: roll
//! description: Roll a die
//! options:
//!   - { name: sides, description: Number of sides, type: integer, integer_bounds: { min: 2 } }
//! ";
//! let definition: CommandDefinition = serde_yaml::from_str(yaml).unwrap();
//!
//! let mut tree = SchemaTree::new();
//! let id = definition.build(&mut tree).unwrap();
//! assert!(validate_tree(&tree).is_empty());
//! assert_eq!(CommandDefinition::export(&tree, id).unwrap(), definition);
//! ```

mod config;
mod definition;
mod error;
mod loader;

pub use config::BridgeConfig;
pub use definition::{ChoiceDefinition, CommandDefinition, OptionDefinition};
pub use error::{DefinitionError, Result};
pub use loader::DefinitionSet;
