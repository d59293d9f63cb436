//! Root nodes of the schema tree.

use std::collections::BTreeSet;

use tracing::debug;

use crate::constraint::{
    validate_description, validate_description_localizations, validate_name,
    validate_name_localizations,
};
use crate::error::{Result, SchemaError};
use crate::tree::{CommandId, OptionId, Parent, SchemaTree};
use crate::{ContextType, Localizations, PermissionType};

/// A user-invokable slash command.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) name_localizations: Localizations,
    pub(crate) description_localizations: Localizations,
    pub(crate) options: Vec<OptionId>,
    pub(crate) default_disabled: bool,
    pub(crate) required_permissions: Option<BTreeSet<PermissionType>>,
    pub(crate) enabled_in_dms: bool,
    pub(crate) nsfw: bool,
    pub(crate) contexts: Option<BTreeSet<ContextType>>,
}

impl Command {
    pub(crate) fn new(name: String, description: String) -> Self {
        Self {
            name,
            description,
            name_localizations: Localizations::new(),
            description_localizations: Localizations::new(),
            options: Vec::new(),
            default_disabled: false,
            required_permissions: None,
            enabled_in_dms: true,
            nsfw: false,
            contexts: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn name_localizations(&self) -> &Localizations {
        &self.name_localizations
    }

    pub fn description_localizations(&self) -> &Localizations {
        &self.description_localizations
    }

    /// Top-level options, in order.
    pub fn options(&self) -> &[OptionId] {
        &self.options
    }

    /// Whether only administrators can use the command by default.
    pub fn is_default_disabled(&self) -> bool {
        self.default_disabled
    }

    /// Permissions a member needs to see the command, if restricted.
    pub fn required_permissions(&self) -> Option<&BTreeSet<PermissionType>> {
        self.required_permissions.as_ref()
    }

    pub fn is_enabled_in_dms(&self) -> bool {
        self.enabled_in_dms
    }

    pub fn is_nsfw(&self) -> bool {
        self.nsfw
    }

    /// Contexts the command may be used in. `None` means Discord's default.
    pub fn contexts(&self) -> Option<&BTreeSet<ContextType>> {
        self.contexts.as_ref()
    }
}

/// Mutation handle for a [`Command`], obtained from [`SchemaTree::command_mut`].
///
/// ```
/// use slash_schema_core::{OptionType, SchemaTree};
///
/// let mut tree = SchemaTree::new();
/// let cmd = tree.create_command("ban", "Ban a member").unwrap();
/// let user = tree.create_option("user", "Member to ban", OptionType::User).unwrap();
///
/// tree.command_mut(cmd)
///     .unwrap()
///     .set_enabled_in_dms(false)
///     .unwrap()
///     .set_options(vec![user])
///     .unwrap();
/// assert!(!tree.command(cmd).unwrap().is_enabled_in_dms());
/// ```
#[derive(Debug)]
pub struct CommandMut<'a> {
    tree: &'a mut SchemaTree,
    id: CommandId,
}

impl<'a> CommandMut<'a> {
    pub(crate) fn new(tree: &'a mut SchemaTree, id: CommandId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    fn node(&mut self) -> Result<&mut Command> {
        self.tree.command_node_mut(self.id)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        validate_name(&name, "name")?;
        self.node()?.name = name;
        Ok(self)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<&mut Self> {
        let description = description.into();
        validate_description(&description, "description")?;
        self.node()?.description = description;
        Ok(self)
    }

    /// Replaces all name localizations. Each value is validated like the name.
    pub fn set_name_localizations(&mut self, localizations: Localizations) -> Result<&mut Self> {
        validate_name_localizations(&localizations)?;
        self.node()?.name_localizations = localizations;
        Ok(self)
    }

    pub fn set_description_localizations(&mut self, localizations: Localizations) -> Result<&mut Self> {
        validate_description_localizations(&localizations, "description")?;
        self.node()?.description_localizations = localizations;
        Ok(self)
    }

    /// Replaces the top-level options.
    ///
    /// Options removed from the command become detached; every incoming
    /// option is attached to this command.
    ///
    /// # Errors
    ///
    /// Fails when an incoming option belongs to another parent, or when the
    /// new collection breaks a sibling rule (count, uniqueness, type
    /// homogeneity, required ordering).
    pub fn set_options(&mut self, options: Vec<OptionId>) -> Result<&mut Self> {
        self.tree.replace_options(Parent::Command(self.id), options)?;
        Ok(self)
    }

    pub fn set_default_disabled(&mut self, default_disabled: bool) -> Result<&mut Self> {
        self.node()?.default_disabled = default_disabled;
        Ok(self)
    }

    /// Sets the permissions required to see the command. `None` lifts the
    /// restriction.
    pub fn set_required_permissions(
        &mut self,
        permissions: Option<BTreeSet<PermissionType>>,
    ) -> Result<&mut Self> {
        self.node()?.required_permissions = permissions;
        Ok(self)
    }

    pub fn set_enabled_in_dms(&mut self, enabled: bool) -> Result<&mut Self> {
        self.node()?.enabled_in_dms = enabled;
        Ok(self)
    }

    pub fn set_nsfw(&mut self, nsfw: bool) -> Result<&mut Self> {
        self.node()?.nsfw = nsfw;
        Ok(self)
    }

    /// Restricts the contexts the command may be used in.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IncompatibleType`] if the set contains
    /// [`ContextType::Unknown`].
    pub fn set_contexts(&mut self, contexts: Option<BTreeSet<ContextType>>) -> Result<&mut Self> {
        if contexts.as_ref().is_some_and(|set| set.contains(&ContextType::Unknown)) {
            return Err(SchemaError::IncompatibleType("UNKNOWN context disallowed here".to_string()));
        }
        debug!(command = %self.id, ?contexts, "Setting command contexts");
        self.node()?.contexts = contexts;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Locale, OptionType};

    #[test]
    fn test_defaults() {
        let mut tree = SchemaTree::new();
        let id = tree.create_command("ping", "Replies with pong").unwrap();
        let cmd = tree.command(id).unwrap();

        assert!(cmd.is_enabled_in_dms());
        assert!(!cmd.is_default_disabled());
        assert!(!cmd.is_nsfw());
        assert!(cmd.required_permissions().is_none());
        assert!(cmd.contexts().is_none());
        assert!(cmd.options().is_empty());
    }

    #[test]
    fn test_rejected_localization_leaves_command_unchanged() {
        let mut tree = SchemaTree::new();
        let id = tree.create_command("ping", "Replies with pong").unwrap();
        let before = tree.clone();

        let mut names = Localizations::new();
        names.insert(Locale::German, "ping".to_string());
        names.insert(Locale::French, "Ping".to_string());
        let err = tree.command_mut(id).unwrap().set_name_localizations(names).unwrap_err();

        assert!(matches!(err, SchemaError::InvalidFormat(_)));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_unknown_context_rejected() {
        let mut tree = SchemaTree::new();
        let id = tree.create_command("ping", "Replies with pong").unwrap();
        let contexts = BTreeSet::from([ContextType::Server, ContextType::Unknown]);

        let err = tree.command_mut(id).unwrap().set_contexts(Some(contexts)).unwrap_err();
        assert!(matches!(err, SchemaError::IncompatibleType(_)));
    }

    #[test]
    fn test_mixed_top_level_options_rejected() {
        let mut tree = SchemaTree::new();
        let id = tree.create_command("admin", "Admin tools").unwrap();
        let sub = tree.create_option("kick", "Kick someone", OptionType::Subcommand).unwrap();
        let text = tree.create_option("reason", "Why", OptionType::String).unwrap();

        let err = tree.command_mut(id).unwrap().set_options(vec![sub, text]).unwrap_err();
        assert!(matches!(err, SchemaError::IncompatibleType(_)));
        assert_eq!(tree.option(sub).unwrap().parent(), None);
    }
}
