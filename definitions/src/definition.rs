//! Serializable command definitions.
//!
//! A definition is the plain-data form of a command tree, meant to be written
//! by hand in JSON or YAML. Building one goes through the validating tree API,
//! so a definition that breaks a rule fails the same way a direct mutation
//! would.
//!
//! # Example YAML
//!
//! ```yaml
//! name: ban
//! description: Ban a member
//! enabled_in_dms: false
//! required_permissions: [ban_members]
//! options:
//!   - name: user
//!     description: Member to ban
//!     type: user
//!   - name: days
//!     description: Days of messages to delete
//!     type: integer
//!     required: false
//!     integer_bounds: { min: 0, max: 7 }
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use slash_schema_core::{
    Bounds, ChannelType, ChoiceId, ChoiceValue, CommandId, ContextType, Localizations, OptionId,
    OptionType, PermissionType, SchemaError, SchemaTree,
};

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Localizations::is_empty")]
    pub name_localizations: Localizations,
    #[serde(default, skip_serializing_if = "Localizations::is_empty")]
    pub description_localizations: Localizations,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub default_disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permissions: Option<BTreeSet<PermissionType>>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub enabled_in_dms: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nsfw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<BTreeSet<ContextType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    #[serde(default, skip_serializing_if = "Localizations::is_empty")]
    pub name_localizations: Localizations,
    #[serde(default, skip_serializing_if = "Localizations::is_empty")]
    pub description_localizations: Localizations,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub autocomplete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub channel_types: BTreeSet<ChannelType>,
    #[serde(default, skip_serializing_if = "Bounds::is_unset")]
    pub integer_bounds: Bounds<i64>,
    #[serde(default, skip_serializing_if = "Bounds::is_unset")]
    pub number_bounds: Bounds<f64>,
    #[serde(default, skip_serializing_if = "Bounds::is_unset")]
    pub length_bounds: Bounds<u32>,
}

/// A static choice. Its type is the type of the option it's declared under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Localizations::is_empty")]
    pub name_localizations: Localizations,
    pub value: ChoiceValue,
}

impl CommandDefinition {
    /// Builds the command bottom-up in `tree`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] any node raises. Nodes created before
    /// the failure stay in the tree, detached.
    pub fn build(&self, tree: &mut SchemaTree) -> Result<CommandId, SchemaError> {
        let options = self
            .options
            .iter()
            .map(|option| option.build(tree))
            .collect::<Result<Vec<_>, _>>()?;

        let id = tree.create_command(self.name.as_str(), self.description.as_str())?;
        tree.command_mut(id)?
            .set_name_localizations(self.name_localizations.clone())?
            .set_description_localizations(self.description_localizations.clone())?
            .set_default_disabled(self.default_disabled)?
            .set_required_permissions(self.required_permissions.clone())?
            .set_enabled_in_dms(self.enabled_in_dms)?
            .set_nsfw(self.nsfw)?
            .set_contexts(self.contexts.clone())?
            .set_options(options)?;
        Ok(id)
    }

    /// Reads a command back out of `tree`.
    pub fn export(tree: &SchemaTree, id: CommandId) -> Result<Self, SchemaError> {
        let command = tree.command(id)?;
        Ok(Self {
            name: command.name().to_string(),
            description: command.description().to_string(),
            name_localizations: command.name_localizations().clone(),
            description_localizations: command.description_localizations().clone(),
            options: command
                .options()
                .iter()
                .map(|&option| OptionDefinition::export(tree, option))
                .collect::<Result<_, _>>()?,
            default_disabled: command.is_default_disabled(),
            required_permissions: command.required_permissions().cloned(),
            enabled_in_dms: command.is_enabled_in_dms(),
            nsfw: command.is_nsfw(),
            contexts: command.contexts().cloned(),
        })
    }
}

impl OptionDefinition {
    /// Builds the option, its choices, and its children in `tree`.
    pub fn build(&self, tree: &mut SchemaTree) -> Result<OptionId, SchemaError> {
        let children = self
            .options
            .iter()
            .map(|option| option.build(tree))
            .collect::<Result<Vec<_>, _>>()?;
        let choices = self
            .choices
            .iter()
            .map(|choice| choice.build(tree, self.option_type))
            .collect::<Result<Vec<_>, _>>()?;

        let id = tree.create_option(self.name.as_str(), self.description.as_str(), self.option_type)?;
        let mut option = tree.option_mut(id)?;
        option
            .set_name_localizations(self.name_localizations.clone())?
            .set_description_localizations(self.description_localizations.clone())?
            .set_required(self.required)?;
        if !self.channel_types.is_empty() {
            option.set_channel_type_bounds(self.channel_types.iter().copied())?;
        }
        if !self.integer_bounds.is_unset() {
            option.set_integer_bounds(self.integer_bounds.min, self.integer_bounds.max)?;
        }
        if !self.number_bounds.is_unset() {
            option.set_number_bounds(self.number_bounds.min, self.number_bounds.max)?;
        }
        if !self.length_bounds.is_unset() {
            option.set_string_length_bounds(self.length_bounds.min, self.length_bounds.max)?;
        }
        option
            .set_choices(choices)?
            .set_autocompletable(self.autocomplete)?
            .set_options(children)?;
        Ok(id)
    }

    pub fn export(tree: &SchemaTree, id: OptionId) -> Result<Self, SchemaError> {
        let option = tree.option(id)?;
        Ok(Self {
            name: option.name().to_string(),
            description: option.description().to_string(),
            option_type: option.option_type(),
            name_localizations: option.name_localizations().clone(),
            description_localizations: option.description_localizations().clone(),
            required: option.is_required(),
            autocomplete: option.is_autocompletable(),
            choices: option
                .choices()
                .iter()
                .map(|&choice| ChoiceDefinition::export(tree, choice))
                .collect::<Result<_, _>>()?,
            options: option
                .options()
                .iter()
                .map(|&child| OptionDefinition::export(tree, child))
                .collect::<Result<_, _>>()?,
            channel_types: option.channel_type_bounds().clone(),
            integer_bounds: option.integer_bounds(),
            number_bounds: option.number_bounds(),
            length_bounds: option.string_length_bounds(),
        })
    }
}

impl ChoiceDefinition {
    /// Builds the choice with the type of its owning option.
    pub fn build(&self, tree: &mut SchemaTree, option_type: OptionType) -> Result<ChoiceId, SchemaError> {
        let id = tree.create_choice(option_type, self.name.as_str(), self.value.clone())?;
        tree.choice_mut(id)?.set_name_localizations(self.name_localizations.clone())?;
        Ok(id)
    }

    pub fn export(tree: &SchemaTree, id: ChoiceId) -> Result<Self, SchemaError> {
        let choice = tree.choice(id)?;
        Ok(Self {
            name: choice.name().to_string(),
            name_localizations: choice.name_localizations().clone(),
            value: choice.value().clone(),
        })
    }
}
