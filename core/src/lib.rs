//! Self-validating schema model for Discord slash commands.
//!
//! This crate defines the command tree and keeps it valid on every change:
//!
//! - [`SchemaTree`] owns every node and hands out typed identifiers
//!   ([`CommandId`], [`OptionId`], [`ChoiceId`]).
//! - [`Command`] is a root: name, description, localizations, top-level
//!   options, and permission flags.
//! - [`CommandOption`] is a parameter, a subcommand, or a subcommand group,
//!   with its choices, child options, and type-gated bounds.
//! - [`Choice`] is a named literal value of a choice-capable option.
//!
//! Nodes are changed through handles ([`CommandMut`], [`OptionMut`],
//! [`ChoiceMut`]). A change that would break a rule is rejected with a
//! [`SchemaError`] and the tree stays as it was. [`validate_tree`] re-checks
//! a whole tree after the fact.
//!
//! Capability queries ([`PartialSupport`], [`supported_values`]) tell which
//! enum members and features a given [`BackendId`] can express.
//!
//! # Example
//!
//! ```
//! use slash_schema_core::*;
//!
//! let mut tree = SchemaTree::new();
//! let cmd = tree.create_command("timeout", "Time out a member").unwrap();
//! let user = tree.create_option("user", "Member to time out", OptionType::User).unwrap();
//! let minutes = tree.create_option("minutes", "Duration", OptionType::Integer).unwrap();
//!
//! tree.option_mut(minutes)
//!     .unwrap()
//!     .set_required(false)
//!     .unwrap()
//!     .set_integer_bounds(Some(1), Some(40320))
//!     .unwrap();
//! tree.command_mut(cmd).unwrap().set_options(vec![user, minutes]).unwrap();
//!
//! // A required option can't follow an optional one.
//! let reason = tree.create_option("reason", "Why", OptionType::String).unwrap();
//! let err = tree
//!     .command_mut(cmd)
//!     .unwrap()
//!     .set_options(vec![user, minutes, reason])
//!     .unwrap_err();
//! assert!(matches!(err, SchemaError::OrderViolation(_)));
//! assert_eq!(tree.command(cmd).unwrap().options().len(), 2);
//! assert!(validate_tree(&tree).is_empty());
//! ```

mod choice;
mod command;
mod constraint;
mod error;
mod option;
mod support;
mod tree;
mod types;
mod validate;

pub use choice::{Choice, ChoiceMut, MAX_CHOICE_VALUE_LENGTH};
pub use command::{Command, CommandMut};
pub use constraint::{
    MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, check_length, validate_description, validate_name,
};
pub use error::{Result, SchemaError};
pub use option::{CommandOption, OptionMut};
pub use support::{BackendId, Feature, PartialSupport, supported_values};
pub use tree::{ChoiceId, CommandId, OptionId, OptionProposal, Parent, SchemaTree};
pub use types::*;
pub use validate::{MAX_OPTION_COUNT, ValidationIssue, validate_tree};

pub use strum::IntoEnumIterator;
