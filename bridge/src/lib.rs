//! Backend boundary for slash command schemas.
//!
//! A validated [`SchemaTree`](slash_schema_core::SchemaTree) is the only thing
//! that crosses into a backend. This crate provides:
//!
//! - [`Backend`]: the outbound `translate` and inbound `parse` contract.
//! - [`WireBackend`]: an implementation producing Discord's JSON request
//!   shape ([`CommandRequest`]) for any [`BackendId`](slash_schema_core::BackendId)
//!   profile, rejecting what that profile can't express.
//! - [`CommandView`], [`OptionView`], [`ChoiceView`]: read-only results of
//!   parsing a request back.
//!
//! # Example
//!
//! ```
//! use slash_schema_bridge::{Backend, WireBackend};
//! use slash_schema_core::{BackendId, OptionType, SchemaTree};
//!
//! let mut tree = SchemaTree::new();
//! let cmd = tree.create_command("roll", "Roll a die").unwrap();
//! let sides = tree.create_option("sides", "Number of sides", OptionType::Integer).unwrap();
//! tree.command_mut(cmd).unwrap().set_options(vec![sides]).unwrap();
//!
//! let backend = WireBackend::new(BackendId::Javacord);
//! let request = backend.translate(&tree, cmd).unwrap();
//! let view = backend.parse(&request).unwrap();
//!
//! assert_eq!(view.name, "roll");
//! assert_eq!(view.option_types(), vec![OptionType::Integer]);
//! ```

mod codes;
mod error;
mod request;
mod translate;
mod view;

pub use codes::CHAT_INPUT;
pub use error::{BridgeError, Result};
pub use request::{ChoiceRequest, CommandRequest, OptionRequest, WireLocalizations, requests_from_json};
pub use translate::{Backend, WireBackend};
pub use view::{ChoiceView, CommandView, OptionView};
