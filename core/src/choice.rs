//! Choice leaves: named literal values a user can pick.

use strum::IntoEnumIterator;

use crate::constraint::{check_length, validate_description, validate_description_localizations};
use crate::error::{Result, SchemaError};
use crate::tree::{ChoiceId, OptionId, SchemaTree};
use crate::{ChoiceValue, Localizations, MAX_NUMBER, MIN_NUMBER, OptionType};

/// Max allowed length of a string choice value.
pub const MAX_CHOICE_VALUE_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub(crate) choice_type: OptionType,
    pub(crate) name: String,
    pub(crate) name_localizations: Localizations,
    pub(crate) value: ChoiceValue,
    pub(crate) parent: Option<OptionId>,
}

impl Choice {
    pub(crate) fn new(choice_type: OptionType, name: String, value: ChoiceValue) -> Self {
        Self {
            choice_type,
            name,
            name_localizations: Localizations::new(),
            value,
            parent: None,
        }
    }

    pub fn choice_type(&self) -> OptionType {
        self.choice_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_localizations(&self) -> &Localizations {
        &self.name_localizations
    }

    pub fn value(&self) -> &ChoiceValue {
        &self.value
    }

    /// The option this choice belongs to.
    pub fn parent(&self) -> Option<OptionId> {
        self.parent
    }

    /// Checks that `choice_type` can carry choices and that `value` fits it.
    pub(crate) fn check_type(choice_type: OptionType, value: &ChoiceValue) -> Result<()> {
        if !choice_type.can_be_choices() {
            return Err(SchemaError::TypeMismatch(format!(
                "{choice_type} can't be used for choices"
            )));
        }
        if !choice_type.accepts(value) {
            return Err(SchemaError::TypeMismatch(format!(
                "value {value} doesn't match choice type {choice_type}"
            )));
        }
        Ok(())
    }

    /// Checks a value against the numeric range and the string length limit.
    pub(crate) fn check_value(value: &ChoiceValue) -> Result<()> {
        match value {
            ChoiceValue::Text(text) => {
                check_length(text, MAX_CHOICE_VALUE_LENGTH, "value")?;
            }
            ChoiceValue::Integer(number) => {
                if !(MIN_NUMBER..=MAX_NUMBER).contains(number) {
                    return Err(SchemaError::BoundsViolation(format!(
                        "value {number} is outside the allowed range"
                    )));
                }
            }
            ChoiceValue::Number(number) => {
                if !number.is_finite() || number.abs() > MAX_NUMBER as f64 {
                    return Err(SchemaError::BoundsViolation(format!(
                        "value {number} is outside the allowed range"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Picks the most specific choice type accepting `value`.
///
/// A candidate is more specific the more other candidates can hold its
/// values: `INTEGER` fits into `NUMBER`, so `42` resolves to `INTEGER`.
pub(crate) fn infer_choice_type(value: &ChoiceValue) -> Result<OptionType> {
    let candidates: Vec<OptionType> = OptionType::iter()
        .filter(|candidate| candidate.can_be_choices() && candidate.accepts(value))
        .collect();

    candidates
        .iter()
        .copied()
        .max_by_key(|candidate| {
            candidates
                .iter()
                .filter(|other| other.is_assignable_from(*candidate))
                .count()
        })
        .ok_or_else(|| SchemaError::TypeMismatch(format!("no choice type accepts value {value}")))
}

/// Mutation handle for a [`Choice`], obtained from [`SchemaTree::choice_mut`].
#[derive(Debug)]
pub struct ChoiceMut<'a> {
    tree: &'a mut SchemaTree,
    id: ChoiceId,
}

impl<'a> ChoiceMut<'a> {
    pub(crate) fn new(tree: &'a mut SchemaTree, id: ChoiceId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> ChoiceId {
        self.id
    }

    fn current(&self) -> Result<&Choice> {
        self.tree.choice(self.id)
    }

    fn node(&mut self) -> Result<&mut Choice> {
        self.tree.choice_node_mut(self.id)
    }

    /// Renames the choice.
    ///
    /// # Errors
    ///
    /// Fails on a blank or overlong name, or with
    /// [`SchemaError::DuplicateName`] if another choice of the owning option
    /// uses it.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        validate_description(&name, "name")?;
        if let Some(owner) = self.current()?.parent {
            self.tree.check_choice_proposal(owner, self.id, Some(&name), None)?;
        }
        self.node()?.name = name;
        Ok(self)
    }

    pub fn set_name_localizations(&mut self, localizations: Localizations) -> Result<&mut Self> {
        validate_description_localizations(&localizations, "name")?;
        self.node()?.name_localizations = localizations;
        Ok(self)
    }

    /// Changes the choice type. The current value must fit the new type, and
    /// an attached choice must keep its owner's type.
    pub fn set_type(&mut self, choice_type: OptionType) -> Result<&mut Self> {
        let current = self.current()?;
        Choice::check_type(choice_type, &current.value)?;
        if let Some(owner) = current.parent {
            self.tree.check_choice_proposal(owner, self.id, None, Some(choice_type))?;
        }
        self.node()?.choice_type = choice_type;
        Ok(self)
    }

    /// Replaces the value, which must fit the current type.
    pub fn set_value(&mut self, value: impl Into<ChoiceValue>) -> Result<&mut Self> {
        let value = value.into();
        Choice::check_type(self.current()?.choice_type, &value)?;
        Choice::check_value(&value)?;
        self.node()?.value = value;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Locale;

    #[test]
    fn test_inference_prefers_specific_type() {
        assert_eq!(infer_choice_type(&ChoiceValue::Integer(42)).unwrap(), OptionType::Integer);
        assert_eq!(infer_choice_type(&ChoiceValue::Number(4.2)).unwrap(), OptionType::Number);
        assert_eq!(infer_choice_type(&"red".into()).unwrap(), OptionType::String);
    }

    #[test]
    fn test_value_must_match_type() {
        let mut tree = SchemaTree::new();
        let err = tree.create_choice(OptionType::Integer, "Half", 0.5).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch(_)));

        let id = tree.create_choice(OptionType::Number, "Two", 2).unwrap();
        let err = tree.choice_mut(id).unwrap().set_value("two").unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch(_)));
        tree.choice_mut(id).unwrap().set_value(2.5).unwrap();
    }

    #[test]
    fn test_value_range() {
        let mut tree = SchemaTree::new();
        let err = tree.create_choice(OptionType::Integer, "Huge", MAX_NUMBER + 1).unwrap_err();
        assert!(matches!(err, SchemaError::BoundsViolation(_)));
        let err = tree.create_choice(OptionType::String, "Long", "x".repeat(101)).unwrap_err();
        assert!(matches!(err, SchemaError::LengthExceeded(_)));
        tree.create_choice(OptionType::String, "Longest", "x".repeat(100)).unwrap();
    }

    #[test]
    fn test_text_value_not_blank() {
        let mut tree = SchemaTree::new();
        let err = tree.create_choice(OptionType::String, "Empty", "").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFormat(_)));

        let id = tree.create_choice(OptionType::String, "Space", "space").unwrap();
        let err = tree.choice_mut(id).unwrap().set_value("   ").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFormat(_)));
        assert_eq!(tree.choice(id).unwrap().value(), &ChoiceValue::Text("space".into()));
    }

    #[test]
    fn test_attached_choice_follows_owner_type() {
        let mut tree = SchemaTree::new();
        let option = tree.create_option("size", "Pick a size", OptionType::Number).unwrap();
        let choice = tree.create_choice(OptionType::Number, "Small", 1).unwrap();
        tree.option_mut(option).unwrap().set_choices(vec![choice]).unwrap();

        let err = tree.choice_mut(choice).unwrap().set_type(OptionType::Integer).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch(_)));
    }

    #[test]
    fn test_choice_names_unique_per_option() {
        let mut tree = SchemaTree::new();
        let option = tree.create_option("color", "Pick a color", OptionType::String).unwrap();
        let red = tree.create_choice(OptionType::String, "Red", "red").unwrap();
        let blue = tree.create_choice(OptionType::String, "Blue", "blue").unwrap();
        tree.option_mut(option).unwrap().set_choices(vec![red, blue]).unwrap();

        let err = tree.choice_mut(blue).unwrap().set_name("Red").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateName(_)));
        assert_eq!(tree.choice(blue).unwrap().name(), "Blue");
    }

    #[test]
    fn test_localized_names_allow_spaces() {
        let mut tree = SchemaTree::new();
        let id = tree.infer_choice("Dark red", "dark-red").unwrap();
        let mut names = Localizations::new();
        names.insert(Locale::German, "Dunkelrot".to_string());
        tree.choice_mut(id).unwrap().set_name_localizations(names).unwrap();
    }
}
