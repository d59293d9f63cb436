//! Option nodes: parameters, subcommands and subcommand groups.
//!
//! An option attached to a parent checks every single-field change against
//! its siblings before committing it. See [`SchemaTree::check_option_proposal`].

use std::collections::BTreeSet;
use std::fmt::Display;

use tracing::debug;

use crate::constraint::{
    validate_description, validate_description_localizations, validate_name,
    validate_name_localizations,
};
use crate::error::{Result, SchemaError};
use crate::tree::{ChoiceId, OptionId, OptionProposal, Parent, SchemaTree};
use crate::validate::{OptionSibling, Owner, check_gated_fields, check_nesting};
use crate::{Bounds, ChannelType, Localizations, MAX_NUMBER, MAX_STRING_LENGTH, MIN_NUMBER, OptionType};

/// A command option.
///
/// The same node type describes a value parameter, a subcommand, and a
/// subcommand group.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) name_localizations: Localizations,
    pub(crate) description_localizations: Localizations,
    pub(crate) option_type: OptionType,
    pub(crate) required: bool,
    pub(crate) autocompletable: bool,
    pub(crate) choices: Vec<ChoiceId>,
    pub(crate) options: Vec<OptionId>,
    pub(crate) channel_type_bounds: BTreeSet<ChannelType>,
    pub(crate) integer_bounds: Bounds<i64>,
    pub(crate) number_bounds: Bounds<f64>,
    pub(crate) string_length_bounds: Bounds<u32>,
    pub(crate) parent: Option<Parent>,
}

impl CommandOption {
    pub(crate) fn new(name: String, description: String, option_type: OptionType) -> Self {
        Self {
            name,
            description,
            name_localizations: Localizations::new(),
            description_localizations: Localizations::new(),
            option_type,
            required: true,
            autocompletable: false,
            choices: Vec::new(),
            options: Vec::new(),
            channel_type_bounds: BTreeSet::new(),
            integer_bounds: Bounds::default(),
            number_bounds: Bounds::default(),
            string_length_bounds: Bounds::default(),
            parent: None,
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

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_autocompletable(&self) -> bool {
        self.autocompletable
    }

    /// Static choices, in order.
    pub fn choices(&self) -> &[ChoiceId] {
        &self.choices
    }

    /// Child options, in order. Only subcommands and groups have any.
    pub fn options(&self) -> &[OptionId] {
        &self.options
    }

    /// Channel types a `CHANNEL` option accepts. Empty means all.
    pub fn channel_type_bounds(&self) -> &BTreeSet<ChannelType> {
        &self.channel_type_bounds
    }

    pub fn integer_bounds(&self) -> Bounds<i64> {
        self.integer_bounds
    }

    pub fn number_bounds(&self) -> Bounds<f64> {
        self.number_bounds
    }

    pub fn string_length_bounds(&self) -> Bounds<u32> {
        self.string_length_bounds
    }

    /// The command or option this option is attached to.
    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }
}

/// Mutation handle for a [`CommandOption`], obtained from
/// [`SchemaTree::option_mut`].
///
/// # Examples
///
/// ```
/// use slash_schema_core::{OptionType, SchemaError, SchemaTree};
///
/// let mut tree = SchemaTree::new();
/// let age = tree.create_option("age", "Your age", OptionType::Integer).unwrap();
/// tree.option_mut(age).unwrap().set_integer_bounds(Some(0), Some(120)).unwrap();
///
/// let err = tree.option_mut(age).unwrap().set_type(OptionType::String).unwrap_err();
/// assert!(matches!(err, SchemaError::BoundsViolation(_)));
/// ```
#[derive(Debug)]
pub struct OptionMut<'a> {
    tree: &'a mut SchemaTree,
    id: OptionId,
}

impl<'a> OptionMut<'a> {
    pub(crate) fn new(tree: &'a mut SchemaTree, id: OptionId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    fn current(&self) -> Result<&CommandOption> {
        self.tree.option(self.id)
    }

    fn node(&mut self) -> Result<&mut CommandOption> {
        self.tree.option_node_mut(self.id)
    }

    fn check_with_parent(&self, proposal: OptionProposal<'_>) -> Result<()> {
        match self.current()?.parent {
            Some(parent) => self.tree.check_option_proposal(parent, self.id, proposal),
            None => Ok(()),
        }
    }

    /// Renames the option.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name, or with [`SchemaError::DuplicateName`] if a
    /// sibling already uses it.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        validate_name(&name, "name")?;
        self.check_with_parent(OptionProposal { name: Some(&name), ..Default::default() })?;
        self.node()?.name = name;
        Ok(self)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<&mut Self> {
        let description = description.into();
        validate_description(&description, "description")?;
        self.node()?.description = description;
        Ok(self)
    }

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

    /// Marks the option as required or optional.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::OrderViolation`] if a required option would
    /// follow an optional one among the siblings, or if a subcommand or
    /// group would become optional.
    pub fn set_required(&mut self, required: bool) -> Result<&mut Self> {
        let current = self.current()?;
        if !required && current.option_type.is_subcommand_like() {
            return Err(SchemaError::OrderViolation(format!(
                "{} options must be required",
                current.option_type
            )));
        }
        self.check_with_parent(OptionProposal { required: Some(required), ..Default::default() })?;
        self.node()?.required = required;
        Ok(self)
    }

    /// Enables or disables autocomplete.
    ///
    /// # Errors
    ///
    /// Enabling fails with [`SchemaError::IncompatibleType`] on a type that
    /// cannot carry choices, and with
    /// [`SchemaError::MutualExclusionViolation`] while static choices are set.
    pub fn set_autocompletable(&mut self, autocompletable: bool) -> Result<&mut Self> {
        let current = self.current()?;
        if autocompletable {
            if !current.option_type.can_be_choices() {
                return Err(SchemaError::IncompatibleType(format!(
                    "{} options can't be autocompletable",
                    current.option_type
                )));
            }
            if !current.choices.is_empty() {
                return Err(SchemaError::MutualExclusionViolation(
                    "options with choices can't be autocompletable".to_string(),
                ));
            }
        }
        self.node()?.autocompletable = autocompletable;
        Ok(self)
    }

    /// Replaces the child options. Only subcommands and groups accept any.
    pub fn set_options(&mut self, options: Vec<OptionId>) -> Result<&mut Self> {
        self.tree.replace_options(Parent::Option(self.id), options)?;
        Ok(self)
    }

    /// Replaces the static choices.
    ///
    /// # Errors
    ///
    /// Fails when the type cannot carry choices, while autocomplete is on,
    /// beyond 25 choices, on a choice of another type, or on a duplicate
    /// choice name.
    pub fn set_choices(&mut self, choices: Vec<ChoiceId>) -> Result<&mut Self> {
        self.tree.replace_choices(self.id, choices)?;
        Ok(self)
    }

    /// Changes the option's type.
    ///
    /// The change must keep the children, the siblings, and every
    /// type-gated field legal. Nothing is written if any check fails.
    pub fn set_type(&mut self, option_type: OptionType) -> Result<&mut Self> {
        if option_type == OptionType::Unknown {
            return Err(SchemaError::IncompatibleType("UNKNOWN disallowed here".to_string()));
        }
        let current = self.current()?;

        let children = current
            .options
            .iter()
            .map(|&id| self.tree.option(id).map(OptionSibling::of))
            .collect::<Result<Vec<_>>>()?;
        check_nesting(Owner::Option(option_type), &children)?;

        self.check_with_parent(OptionProposal {
            option_type: Some(option_type),
            ..Default::default()
        })?;

        if option_type.is_subcommand_like() && !current.required {
            return Err(SchemaError::OrderViolation(format!(
                "{option_type} options must be required"
            )));
        }

        if !option_type.can_be_choices() {
            if !current.choices.is_empty() {
                return Err(SchemaError::IncompatibleType(format!(
                    "{option_type} options can't have choices"
                )));
            }
            if current.autocompletable {
                return Err(SchemaError::IncompatibleType(format!(
                    "{option_type} options can't be autocompletable"
                )));
            }
        }

        check_gated_fields(current, option_type)?;

        for &id in &current.choices {
            let choice = self.tree.choice(id)?;
            if choice.choice_type() != option_type {
                return Err(SchemaError::TypeMismatch(format!(
                    "choice '{}' has type {}, not {option_type}",
                    choice.name(),
                    choice.choice_type()
                )));
            }
        }

        debug!(option = %self.id, from = %current.option_type, to = %option_type, "Changing option type");
        self.node()?.option_type = option_type;
        Ok(self)
    }

    /// Restricts the channel types a `CHANNEL` option accepts.
    pub fn set_channel_type_bounds(
        &mut self,
        channel_types: impl IntoIterator<Item = ChannelType>,
    ) -> Result<&mut Self> {
        self.require_type(OptionType::Channel, "channel type bounds")?;
        let channel_types: BTreeSet<_> = channel_types.into_iter().collect();
        if channel_types.contains(&ChannelType::Unknown) {
            return Err(SchemaError::BoundsViolation(
                "UNKNOWN channel type disallowed here".to_string(),
            ));
        }
        self.node()?.channel_type_bounds = channel_types;
        Ok(self)
    }

    /// Sets both integer bounds of an `INTEGER` option.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::BoundsViolation`] on another type, on a bound
    /// outside ±2^53, or when `min > max`.
    pub fn set_integer_bounds(&mut self, min: Option<i64>, max: Option<i64>) -> Result<&mut Self> {
        self.require_type(OptionType::Integer, "integer bounds")?;
        for (bound, field) in [(min, "min integer"), (max, "max integer")] {
            if let Some(value) = bound {
                check_range(value, MIN_NUMBER, MAX_NUMBER, field)?;
            }
        }
        check_ordered(min, max)?;
        self.node()?.integer_bounds = Bounds { min, max };
        Ok(self)
    }

    pub fn set_integer_min(&mut self, min: Option<i64>) -> Result<&mut Self> {
        let max = self.current()?.integer_bounds.max;
        self.set_integer_bounds(min, max)
    }

    pub fn set_integer_max(&mut self, max: Option<i64>) -> Result<&mut Self> {
        let min = self.current()?.integer_bounds.min;
        self.set_integer_bounds(min, max)
    }

    /// Sets both number bounds of a `NUMBER` option. Bounds must be finite.
    pub fn set_number_bounds(&mut self, min: Option<f64>, max: Option<f64>) -> Result<&mut Self> {
        self.require_type(OptionType::Number, "number bounds")?;
        for (bound, field) in [(min, "min number"), (max, "max number")] {
            if let Some(value) = bound {
                if !value.is_finite() {
                    return Err(SchemaError::BoundsViolation(format!("{field} must be finite")));
                }
                check_range(value, MIN_NUMBER as f64, MAX_NUMBER as f64, field)?;
            }
        }
        check_ordered(min, max)?;
        self.node()?.number_bounds = Bounds { min, max };
        Ok(self)
    }

    pub fn set_number_min(&mut self, min: Option<f64>) -> Result<&mut Self> {
        let max = self.current()?.number_bounds.max;
        self.set_number_bounds(min, max)
    }

    pub fn set_number_max(&mut self, max: Option<f64>) -> Result<&mut Self> {
        let min = self.current()?.number_bounds.min;
        self.set_number_bounds(min, max)
    }

    /// Sets both length bounds of a `STRING` option.
    ///
    /// `min` must lie in `0..=6000` and `max` in `1..=6000`.
    pub fn set_string_length_bounds(&mut self, min: Option<u32>, max: Option<u32>) -> Result<&mut Self> {
        self.require_type(OptionType::String, "string length bounds")?;
        if let Some(value) = min {
            check_range(value, 0, MAX_STRING_LENGTH, "min string length")?;
        }
        if let Some(value) = max {
            check_range(value, 1, MAX_STRING_LENGTH, "max string length")?;
        }
        check_ordered(min, max)?;
        self.node()?.string_length_bounds = Bounds { min, max };
        Ok(self)
    }

    pub fn set_string_min_length(&mut self, min: Option<u32>) -> Result<&mut Self> {
        let max = self.current()?.string_length_bounds.max;
        self.set_string_length_bounds(min, max)
    }

    pub fn set_string_max_length(&mut self, max: Option<u32>) -> Result<&mut Self> {
        let min = self.current()?.string_length_bounds.min;
        self.set_string_length_bounds(min, max)
    }

    fn require_type(&self, gate: OptionType, field: &str) -> Result<()> {
        let actual = self.current()?.option_type;
        if actual == gate {
            Ok(())
        } else {
            Err(SchemaError::BoundsViolation(format!(
                "{field} can only be set on {gate} options, not {actual}"
            )))
        }
    }
}

fn check_range<T: PartialOrd + Display>(value: T, min: T, max: T, field: &str) -> Result<()> {
    if value < min || value > max {
        return Err(SchemaError::BoundsViolation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

fn check_ordered<T: PartialOrd + Display>(min: Option<T>, max: Option<T>) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(SchemaError::BoundsViolation(format!(
            "min {min} can't be greater than max {max}"
        ))),
        _ => Ok(()),
    }
}
