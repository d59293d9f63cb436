//! The arena that owns every command, option and choice node.
//!
//! Children hold their parent by identifier, and every cross-node rule is
//! checked against the parent's current children before anything is
//! written. A mutation either passes all checks and commits, or fails and
//! leaves the tree untouched.
//!
//! # Examples
//!
//! ```
//! use slash_schema_core::{OptionType, Parent, SchemaTree};
//!
//! let mut tree = SchemaTree::new();
//! let ping = tree.create_command("ping", "Replies with pong").unwrap();
//! let target = tree.create_option("target", "Who to ping", OptionType::User).unwrap();
//!
//! tree.command_mut(ping).unwrap().set_options(vec![target]).unwrap();
//! assert_eq!(tree.option(target).unwrap().parent(), Some(Parent::Command(ping)));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::choice::{Choice, ChoiceMut, infer_choice_type};
use crate::command::{Command, CommandMut};
use crate::constraint::{validate_description, validate_name};
use crate::error::{Result, SchemaError};
use crate::option::{CommandOption, OptionMut};
use crate::validate::{ChoiceSibling, OptionSibling, Owner, check_choice_siblings, check_option_siblings};
use crate::{ChoiceValue, OptionType};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            tree: u64,
            index: usize,
        }

        impl $name {
            pub(crate) fn index(&self) -> usize {
                self.index
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}.{}"), self.tree, self.index)
            }
        }
    };
}

node_id!(
    /// Identifier of a [`Command`] inside the tree that created it.
    CommandId,
    "command"
);
node_id!(
    /// Identifier of a [`CommandOption`] inside the tree that created it.
    OptionId,
    "option"
);
node_id!(
    /// Identifier of a [`Choice`] inside the tree that created it.
    ChoiceId,
    "choice"
);

/// Structural parent of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    Command(CommandId),
    Option(OptionId),
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(id) => id.fmt(f),
            Self::Option(id) => id.fmt(f),
        }
    }
}

/// A proposed change to one option, checked against its siblings.
///
/// Unset fields keep the option's current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionProposal<'a> {
    pub name: Option<&'a str>,
    pub option_type: Option<OptionType>,
    pub required: Option<bool>,
}

/// Owner of all schema nodes.
///
/// Nodes are created through the tree, read through [`command`](Self::command),
/// [`option`](Self::option) and [`choice`](Self::choice), and mutated through
/// the handles returned by the `*_mut` methods. Identifiers from another tree
/// are rejected with [`SchemaError::UnknownNode`].
///
/// All mutation takes `&mut self`, so one tree is one unit of exclusion: wrap
/// it in a `Mutex` to build it from several threads.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTree {
    id: u64,
    pub(crate) commands: Vec<Option<Command>>,
    pub(crate) options: Vec<Option<CommandOption>>,
    pub(crate) choices: Vec<Option<Choice>>,
}

impl Default for SchemaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            id: NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed),
            commands: Vec::new(),
            options: Vec::new(),
            choices: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Creates a detached command.
    ///
    /// # Errors
    ///
    /// Fails with the same errors as
    /// [`CommandMut::set_name`] and [`CommandMut::set_description`].
    pub fn create_command(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<CommandId> {
        let name = name.into();
        let description = description.into();
        validate_name(&name, "name")?;
        validate_description(&description, "description")?;

        let id = CommandId { tree: self.id, index: self.commands.len() };
        self.commands.push(Some(Command::new(name, description)));
        Ok(id)
    }

    /// Creates a detached option.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name or description, or when `option_type` is
    /// [`OptionType::Unknown`].
    pub fn create_option(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        option_type: OptionType,
    ) -> Result<OptionId> {
        let name = name.into();
        let description = description.into();
        validate_name(&name, "name")?;
        validate_description(&description, "description")?;
        if option_type == OptionType::Unknown {
            return Err(SchemaError::IncompatibleType("UNKNOWN disallowed here".to_string()));
        }

        let id = OptionId { tree: self.id, index: self.options.len() };
        self.options.push(Some(CommandOption::new(name, description, option_type)));
        Ok(id)
    }

    /// Creates a detached choice of an explicit type.
    ///
    /// # Errors
    ///
    /// Fails when `choice_type` cannot carry choices, when `value` does not
    /// fit it, or on an invalid name.
    pub fn create_choice(
        &mut self,
        choice_type: OptionType,
        name: impl Into<String>,
        value: impl Into<ChoiceValue>,
    ) -> Result<ChoiceId> {
        let name = name.into();
        let value = value.into();
        Choice::check_type(choice_type, &value)?;
        Choice::check_value(&value)?;
        validate_description(&name, "name")?;

        let id = ChoiceId { tree: self.id, index: self.choices.len() };
        self.choices.push(Some(Choice::new(choice_type, name, value)));
        Ok(id)
    }

    /// Creates a detached choice, inferring its type from `value`.
    ///
    /// Picks the most specific choice type that accepts the value, so `42`
    /// becomes an `INTEGER` choice even though `NUMBER` accepts it too.
    ///
    /// ```
    /// use slash_schema_core::{OptionType, SchemaTree};
    ///
    /// let mut tree = SchemaTree::new();
    /// let answer = tree.infer_choice("answer", 42).unwrap();
    /// assert_eq!(tree.choice(answer).unwrap().choice_type(), OptionType::Integer);
    /// ```
    pub fn infer_choice(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ChoiceValue>,
    ) -> Result<ChoiceId> {
        let value = value.into();
        let choice_type = infer_choice_type(&value)?;
        self.create_choice(choice_type, name, value)
    }

    // ---------------------------------------------------------------------
    // Access
    // ---------------------------------------------------------------------

    /// Reads a command.
    pub fn command(&self, id: CommandId) -> Result<&Command> {
        self.check_tree(id.tree, &id)?;
        self.commands
            .get(id.index)
            .and_then(Option::as_ref)
            .ok_or_else(|| SchemaError::UnknownNode(format!("{id} does not exist")))
    }

    /// Reads an option.
    pub fn option(&self, id: OptionId) -> Result<&CommandOption> {
        self.check_tree(id.tree, &id)?;
        self.options
            .get(id.index)
            .and_then(Option::as_ref)
            .ok_or_else(|| SchemaError::UnknownNode(format!("{id} does not exist")))
    }

    /// Reads a choice.
    pub fn choice(&self, id: ChoiceId) -> Result<&Choice> {
        self.check_tree(id.tree, &id)?;
        self.choices
            .get(id.index)
            .and_then(Option::as_ref)
            .ok_or_else(|| SchemaError::UnknownNode(format!("{id} does not exist")))
    }

    /// Returns a mutation handle for a command.
    pub fn command_mut(&mut self, id: CommandId) -> Result<CommandMut<'_>> {
        self.command(id)?;
        Ok(CommandMut::new(self, id))
    }

    /// Returns a mutation handle for an option.
    pub fn option_mut(&mut self, id: OptionId) -> Result<OptionMut<'_>> {
        self.option(id)?;
        Ok(OptionMut::new(self, id))
    }

    /// Returns a mutation handle for a choice.
    pub fn choice_mut(&mut self, id: ChoiceId) -> Result<ChoiceMut<'_>> {
        self.choice(id)?;
        Ok(ChoiceMut::new(self, id))
    }

    /// Iterates over live commands in creation order.
    pub fn commands(&self) -> impl Iterator<Item = (CommandId, &Command)> {
        let tree = self.id;
        self.commands
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| slot.as_ref().map(|node| (CommandId { tree, index }, node)))
    }

    /// Iterates over live options in creation order.
    pub fn options(&self) -> impl Iterator<Item = (OptionId, &CommandOption)> {
        let tree = self.id;
        self.options
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| slot.as_ref().map(|node| (OptionId { tree, index }, node)))
    }

    /// Iterates over live choices in creation order.
    pub fn choices(&self) -> impl Iterator<Item = (ChoiceId, &Choice)> {
        let tree = self.id;
        self.choices
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| slot.as_ref().map(|node| (ChoiceId { tree, index }, node)))
    }

    pub(crate) fn command_node_mut(&mut self, id: CommandId) -> Result<&mut Command> {
        self.command(id)?;
        self.commands
            .get_mut(id.index)
            .and_then(Option::as_mut)
            .ok_or_else(|| SchemaError::UnknownNode(format!("{id} does not exist")))
    }

    pub(crate) fn option_node_mut(&mut self, id: OptionId) -> Result<&mut CommandOption> {
        self.option(id)?;
        self.options
            .get_mut(id.index)
            .and_then(Option::as_mut)
            .ok_or_else(|| SchemaError::UnknownNode(format!("{id} does not exist")))
    }

    pub(crate) fn choice_node_mut(&mut self, id: ChoiceId) -> Result<&mut Choice> {
        self.choice(id)?;
        self.choices
            .get_mut(id.index)
            .and_then(Option::as_mut)
            .ok_or_else(|| SchemaError::UnknownNode(format!("{id} does not exist")))
    }

    fn check_tree(&self, tree: u64, id: &dyn fmt::Display) -> Result<()> {
        if tree == self.id {
            Ok(())
        } else {
            Err(SchemaError::UnknownNode(format!("{id} belongs to a different tree")))
        }
    }

    // ---------------------------------------------------------------------
    // Sibling protocol
    // ---------------------------------------------------------------------

    /// Children of an option parent, in order.
    pub fn children_of(&self, parent: Parent) -> Result<&[OptionId]> {
        match parent {
            Parent::Command(id) => Ok(self.command(id)?.options()),
            Parent::Option(id) => Ok(self.option(id)?.options()),
        }
    }

    fn owner_of(&self, parent: Parent) -> Result<Owner> {
        match parent {
            Parent::Command(_) => Ok(Owner::Command),
            Parent::Option(id) => Ok(Owner::Option(self.option(id)?.option_type())),
        }
    }

    /// Checks whether `parent` would still hold legal children if `child`
    /// took on the proposed name, type, or required flag.
    ///
    /// Has no side effects. Every single-field mutation of an attached
    /// option goes through here before it commits.
    ///
    /// # Errors
    ///
    /// Returns the sibling rule the proposal would break.
    pub fn check_option_proposal(
        &self,
        parent: Parent,
        child: OptionId,
        proposal: OptionProposal<'_>,
    ) -> Result<()> {
        let owner = self.owner_of(parent)?;
        let mut siblings = Vec::new();
        for &id in self.children_of(parent)? {
            let mut sibling = OptionSibling::of(self.option(id)?);
            if id == child {
                if let Some(name) = proposal.name {
                    sibling.name = name;
                }
                if let Some(option_type) = proposal.option_type {
                    sibling.option_type = option_type;
                }
                if let Some(required) = proposal.required {
                    sibling.required = required;
                }
            }
            siblings.push(sibling);
        }
        check_option_siblings(owner, &siblings)
    }

    /// Checks whether `owner` would still hold legal choices if `child` took
    /// on the proposed name or type.
    pub fn check_choice_proposal(
        &self,
        owner: OptionId,
        child: ChoiceId,
        name: Option<&str>,
        choice_type: Option<OptionType>,
    ) -> Result<()> {
        let option = self.option(owner)?;
        let mut siblings = Vec::new();
        for &id in option.choices() {
            let mut sibling = ChoiceSibling::of(self.choice(id)?);
            if id == child {
                if let Some(name) = name {
                    sibling.name = name;
                }
                if let Some(choice_type) = choice_type {
                    sibling.choice_type = choice_type;
                }
            }
            siblings.push(sibling);
        }
        check_choice_siblings(option.option_type(), option.is_autocompletable(), &siblings)
    }

    /// Validates and commits a whole new child-option collection.
    pub(crate) fn replace_options(&mut self, parent: Parent, incoming: Vec<OptionId>) -> Result<()> {
        let owner = self.owner_of(parent)?;

        let mut siblings = Vec::with_capacity(incoming.len());
        for &id in &incoming {
            let option = self.option(id)?;
            if let Some(existing) = option.parent() {
                if existing != parent {
                    return Err(SchemaError::AlreadyAttached(format!(
                        "option '{}' already belongs to {existing}",
                        option.name()
                    )));
                }
            }
            siblings.push(OptionSibling::of(option));
        }
        if let Err(err) = check_option_siblings(owner, &siblings) {
            debug!(parent = %parent, error = %err, "Rejected option collection");
            return Err(err);
        }

        let outgoing = self.children_of(parent)?.to_vec();
        for id in outgoing {
            if let Some(option) = self.options.get_mut(id.index).and_then(Option::as_mut) {
                option.parent = None;
            }
        }
        for id in &incoming {
            if let Some(option) = self.options.get_mut(id.index).and_then(Option::as_mut) {
                option.parent = Some(parent);
            }
        }

        debug!(parent = %parent, count = incoming.len(), "Replaced option collection");
        match parent {
            Parent::Command(id) => self.command_node_mut(id)?.options = incoming,
            Parent::Option(id) => self.option_node_mut(id)?.options = incoming,
        }
        Ok(())
    }

    /// Validates and commits a whole new choice collection.
    pub(crate) fn replace_choices(&mut self, owner: OptionId, incoming: Vec<ChoiceId>) -> Result<()> {
        let option = self.option(owner)?;

        let mut siblings = Vec::with_capacity(incoming.len());
        for &id in &incoming {
            let choice = self.choice(id)?;
            if let Some(existing) = choice.parent() {
                if existing != owner {
                    return Err(SchemaError::AlreadyAttached(format!(
                        "choice '{}' already belongs to {existing}",
                        choice.name()
                    )));
                }
            }
            siblings.push(ChoiceSibling::of(choice));
        }
        if let Err(err) =
            check_choice_siblings(option.option_type(), option.is_autocompletable(), &siblings)
        {
            debug!(option = %owner, error = %err, "Rejected choice collection");
            return Err(err);
        }

        let outgoing = option.choices().to_vec();
        for id in outgoing {
            if let Some(choice) = self.choices.get_mut(id.index).and_then(Option::as_mut) {
                choice.parent = None;
            }
        }
        for id in &incoming {
            if let Some(choice) = self.choices.get_mut(id.index).and_then(Option::as_mut) {
                choice.parent = Some(owner);
            }
        }

        debug!(option = %owner, count = incoming.len(), "Replaced choice collection");
        self.option_node_mut(owner)?.choices = incoming;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Discarding
    // ---------------------------------------------------------------------

    /// Frees a command. Its options become detached.
    pub fn discard_command(&mut self, id: CommandId) -> Result<()> {
        let children = self.command(id)?.options().to_vec();
        self.detach_options(&children);
        self.commands[id.index] = None;
        debug!(command = %id, "Discarded command");
        Ok(())
    }

    /// Frees a detached option. Its child options and choices become detached.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::AlreadyAttached`] while the option still has a
    /// parent.
    pub fn discard_option(&mut self, id: OptionId) -> Result<()> {
        let option = self.option(id)?;
        if let Some(parent) = option.parent() {
            return Err(SchemaError::AlreadyAttached(format!(
                "option '{}' must be detached from {parent} before it is discarded",
                option.name()
            )));
        }
        let children = option.options().to_vec();
        let choices = option.choices().to_vec();
        self.detach_options(&children);
        for choice in choices {
            if let Some(node) = self.choices.get_mut(choice.index).and_then(Option::as_mut) {
                node.parent = None;
            }
        }
        self.options[id.index] = None;
        debug!(option = %id, "Discarded option");
        Ok(())
    }

    /// Frees a detached choice.
    pub fn discard_choice(&mut self, id: ChoiceId) -> Result<()> {
        let choice = self.choice(id)?;
        if let Some(parent) = choice.parent() {
            return Err(SchemaError::AlreadyAttached(format!(
                "choice '{}' must be detached from {parent} before it is discarded",
                choice.name()
            )));
        }
        self.choices[id.index] = None;
        Ok(())
    }

    fn detach_options(&mut self, ids: &[OptionId]) {
        for id in ids {
            if let Some(node) = self.options.get_mut(id.index).and_then(Option::as_mut) {
                node.parent = None;
            }
        }
    }
}
