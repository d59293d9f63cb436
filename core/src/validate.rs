//! Sibling rules and whole-tree validation.
//!
//! Every rule that spans more than one node lives here. The mutation paths
//! in [`SchemaTree`] run these checks against the collection a change would
//! produce; [`validate_tree`] runs them against the collections that exist.
//!
//! # Examples
//!
//! ```
//! use slash_schema_core::*;
//!
//! let mut tree = SchemaTree::new();
//! let cmd = tree.create_command("color", "Pick a color").unwrap();
//! let shade = tree.create_option("shade", "Which shade", OptionType::String).unwrap();
//! let red = tree.create_choice(OptionType::String, "Red", "red").unwrap();
//! tree.option_mut(shade).unwrap().set_choices(vec![red]).unwrap();
//! tree.command_mut(cmd).unwrap().set_options(vec![shade]).unwrap();
//!
//! assert!(validate_tree(&tree).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::choice::Choice;
use crate::constraint::{
    validate_description, validate_description_localizations, validate_name,
    validate_name_localizations,
};
use crate::error::{Result, SchemaError};
use crate::option::CommandOption;
use crate::tree::{OptionId, Parent, SchemaTree};
use crate::{ContextType, OptionType};

/// Max number of options or choices in one collection.
pub const MAX_OPTION_COUNT: usize = 25;

/// Owner of a child-option collection, as seen by the nesting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Owner {
    Command,
    Option(OptionType),
}

/// The fields of an option that sibling rules look at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OptionSibling<'a> {
    pub name: &'a str,
    pub option_type: OptionType,
    pub required: bool,
}

impl<'a> OptionSibling<'a> {
    pub fn of(option: &'a CommandOption) -> Self {
        Self {
            name: option.name(),
            option_type: option.option_type(),
            required: option.is_required(),
        }
    }
}

/// The fields of a choice that sibling rules look at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChoiceSibling<'a> {
    pub name: &'a str,
    pub choice_type: OptionType,
}

impl<'a> ChoiceSibling<'a> {
    pub fn of(choice: &'a Choice) -> Self {
        Self { name: choice.name(), choice_type: choice.choice_type() }
    }
}

/// Checks a complete child-option collection of `owner`.
pub(crate) fn check_option_siblings(owner: Owner, siblings: &[OptionSibling<'_>]) -> Result<()> {
    check_count(siblings.len(), "options")?;
    check_nesting(owner, siblings)?;
    check_unique(siblings.iter().map(|sibling| sibling.name), "option")?;
    check_homogeneous(siblings)?;
    check_required_order(siblings)
}

/// Checks that `children` may nest under `owner`.
pub(crate) fn check_nesting(owner: Owner, children: &[OptionSibling<'_>]) -> Result<()> {
    let Owner::Option(owner_type) = owner else {
        return Ok(());
    };

    match owner_type {
        OptionType::SubcommandGroup => {
            if children.iter().any(|child| child.option_type != OptionType::Subcommand) {
                return Err(SchemaError::IncompatibleType(
                    "SUBCOMMAND_GROUP can only have SUBCOMMAND options".to_string(),
                ));
            }
        }
        OptionType::Subcommand => {
            if children.iter().any(|child| child.option_type.is_subcommand_like()) {
                return Err(SchemaError::IncompatibleType(
                    "SUBCOMMAND can't have SUBCOMMAND or SUBCOMMAND_GROUP options".to_string(),
                ));
            }
        }
        other => {
            if !children.is_empty() {
                return Err(SchemaError::IncompatibleType(format!(
                    "{other} options can't have child options"
                )));
            }
        }
    }
    Ok(())
}

fn compatible(a: OptionType, b: OptionType) -> bool {
    match (a, b) {
        (OptionType::Subcommand, OptionType::Subcommand) => true,
        (OptionType::SubcommandGroup, OptionType::SubcommandGroup) => true,
        _ => !a.is_subcommand_like() && !b.is_subcommand_like(),
    }
}

fn check_homogeneous(siblings: &[OptionSibling<'_>]) -> Result<()> {
    let Some(first) = siblings.first() else {
        return Ok(());
    };
    match siblings.iter().find(|sibling| !compatible(first.option_type, sibling.option_type)) {
        Some(other) => Err(SchemaError::IncompatibleType(format!(
            "options of type {} and {} can't be siblings",
            first.option_type, other.option_type
        ))),
        None => Ok(()),
    }
}

fn check_required_order(siblings: &[OptionSibling<'_>]) -> Result<()> {
    let mut optional: Option<&str> = None;
    for sibling in siblings {
        match (sibling.required, optional) {
            (false, None) => optional = Some(sibling.name),
            (true, Some(previous)) => {
                return Err(SchemaError::OrderViolation(format!(
                    "required option '{}' can't follow optional option '{previous}'",
                    sibling.name
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_count(count: usize, what: &str) -> Result<()> {
    if count > MAX_OPTION_COUNT {
        return Err(SchemaError::LengthExceeded(format!(
            "can't have more than {MAX_OPTION_COUNT} {what}, got {count}"
        )));
    }
    Ok(())
}

fn check_unique<'a>(names: impl IntoIterator<Item = &'a str>, what: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(SchemaError::DuplicateName(format!("{what} name '{name}' is already used")));
        }
    }
    Ok(())
}

/// Checks a complete choice collection of an option with the given type and
/// autocomplete flag.
pub(crate) fn check_choice_siblings(
    owner_type: OptionType,
    autocompletable: bool,
    choices: &[ChoiceSibling<'_>],
) -> Result<()> {
    if choices.is_empty() {
        return Ok(());
    }
    if !owner_type.can_be_choices() {
        return Err(SchemaError::IncompatibleType(format!(
            "{owner_type} options can't have choices"
        )));
    }
    if autocompletable {
        return Err(SchemaError::MutualExclusionViolation(
            "autocompletable options can't have choices".to_string(),
        ));
    }
    check_count(choices.len(), "choices")?;
    if let Some(choice) = choices.iter().find(|choice| choice.choice_type != owner_type) {
        return Err(SchemaError::TypeMismatch(format!(
            "choice '{}' has type {}, expected {owner_type}",
            choice.name, choice.choice_type
        )));
    }
    check_unique(choices.iter().map(|choice| choice.name), "choice")
}

/// Checks that every bound field not gated to `option_type` is unset.
pub(crate) fn check_gated_fields(option: &CommandOption, option_type: OptionType) -> Result<()> {
    let stray = [
        (OptionType::Integer, !option.integer_bounds().is_unset(), "integer bounds"),
        (OptionType::Number, !option.number_bounds().is_unset(), "number bounds"),
        (OptionType::String, !option.string_length_bounds().is_unset(), "string length bounds"),
        (OptionType::Channel, !option.channel_type_bounds().is_empty(), "channel type bounds"),
    ]
    .into_iter()
    .find(|(gate, set, _)| *set && *gate != option_type);

    match stray {
        Some((gate, _, field)) => Err(SchemaError::BoundsViolation(format!(
            "{field} are only allowed on {gate} options, clear them before changing type to {option_type}"
        ))),
        None => Ok(()),
    }
}

/// A rule broken somewhere in a tree, with the path of the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {error}")]
pub struct ValidationIssue {
    /// Slash-separated names from the root, e.g. `admin/ban/user`.
    pub path: String,
    pub error: SchemaError,
}

/// Re-checks every invariant of every live node.
///
/// A tree built only through the public API always passes. Detached options
/// and choices are checked as their own roots.
pub fn validate_tree(tree: &SchemaTree) -> Vec<ValidationIssue> {
    let mut audit = Audit { tree, issues: Vec::new() };

    for (id, command) in tree.commands() {
        let path = command.name().to_string();
        audit.record(&path, validate_name(command.name(), "name").map(drop));
        audit.record(&path, validate_description(command.description(), "description").map(drop));
        audit.record(&path, validate_name_localizations(command.name_localizations()));
        audit.record(
            &path,
            validate_description_localizations(command.description_localizations(), "description"),
        );
        if command.contexts().is_some_and(|set| set.contains(&ContextType::Unknown)) {
            audit.record(
                &path,
                Err(SchemaError::IncompatibleType("UNKNOWN context disallowed here".to_string())),
            );
        }
        audit.children(&path, Parent::Command(id), Owner::Command, command.options());
    }

    for (id, option) in tree.options().filter(|(_, option)| option.parent().is_none()) {
        audit.option(option.name(), id, option);
    }
    for (_, choice) in tree.choices().filter(|(_, choice)| choice.parent().is_none()) {
        audit.choice(choice.name(), choice);
    }

    for (id, option) in tree.options() {
        if let Some(parent) = option.parent() {
            let listed = tree.children_of(parent).is_ok_and(|children| children.contains(&id));
            if !listed {
                audit.record(
                    option.name(),
                    Err(SchemaError::UnknownNode(format!("{id} points at {parent}, which doesn't list it"))),
                );
            }
        }
    }
    for (id, choice) in tree.choices() {
        if let Some(owner) = choice.parent() {
            let listed = tree.option(owner).is_ok_and(|option| option.choices().contains(&id));
            if !listed {
                audit.record(
                    choice.name(),
                    Err(SchemaError::UnknownNode(format!("{id} points at {owner}, which doesn't list it"))),
                );
            }
        }
    }

    audit.issues
}

struct Audit<'a> {
    tree: &'a SchemaTree,
    issues: Vec<ValidationIssue>,
}

impl<'a> Audit<'a> {
    fn record(&mut self, path: &str, result: Result<()>) {
        if let Err(error) = result {
            self.issues.push(ValidationIssue { path: path.to_string(), error });
        }
    }

    fn children(&mut self, path: &str, parent: Parent, owner: Owner, ids: &[OptionId]) {
        let tree = self.tree;
        let mut siblings = Vec::with_capacity(ids.len());
        for &id in ids {
            match tree.option(id) {
                Ok(child) => {
                    let child_path = format!("{path}/{}", child.name());
                    if child.parent() != Some(parent) {
                        self.record(
                            &child_path,
                            Err(SchemaError::AlreadyAttached(format!(
                                "{id} is listed by {parent} but points at {:?}",
                                child.parent()
                            ))),
                        );
                    }
                    siblings.push(OptionSibling::of(child));
                    self.option(&child_path, id, child);
                }
                Err(error) => self.record(path, Err(error)),
            }
        }
        self.record(path, check_option_siblings(owner, &siblings));
    }

    fn option(&mut self, path: &str, id: OptionId, option: &CommandOption) {
        let tree = self.tree;
        let option_type = option.option_type();

        self.record(path, validate_name(option.name(), "name").map(drop));
        self.record(path, validate_description(option.description(), "description").map(drop));
        self.record(path, validate_name_localizations(option.name_localizations()));
        self.record(
            path,
            validate_description_localizations(option.description_localizations(), "description"),
        );
        if option_type == OptionType::Unknown {
            self.record(path, Err(SchemaError::IncompatibleType("UNKNOWN disallowed here".to_string())));
        }
        if option_type.is_subcommand_like() && !option.is_required() {
            self.record(
                path,
                Err(SchemaError::OrderViolation(format!("{option_type} options must be required"))),
            );
        }
        if option.is_autocompletable() && !option_type.can_be_choices() {
            self.record(
                path,
                Err(SchemaError::IncompatibleType(format!(
                    "{option_type} options can't be autocompletable"
                ))),
            );
        }
        self.record(path, check_gated_fields(option, option_type));

        let mut choices = Vec::with_capacity(option.choices().len());
        for &choice_id in option.choices() {
            match tree.choice(choice_id) {
                Ok(choice) => {
                    let choice_path = format!("{path}/{}", choice.name());
                    if choice.parent() != Some(id) {
                        self.record(
                            &choice_path,
                            Err(SchemaError::AlreadyAttached(format!(
                                "{choice_id} is listed by {id} but points at {:?}",
                                choice.parent()
                            ))),
                        );
                    }
                    choices.push(ChoiceSibling::of(choice));
                    self.choice(&choice_path, choice);
                }
                Err(error) => self.record(path, Err(error)),
            }
        }
        self.record(
            path,
            check_choice_siblings(option_type, option.is_autocompletable(), &choices),
        );

        self.children(path, Parent::Option(id), Owner::Option(option_type), option.options());
    }

    fn choice(&mut self, path: &str, choice: &Choice) {
        self.record(path, Choice::check_type(choice.choice_type(), choice.value()));
        self.record(path, Choice::check_value(choice.value()));
        self.record(path, validate_description(choice.name(), "name").map(drop));
        self.record(path, validate_description_localizations(choice.name_localizations(), "name"));
    }
}
