//! Read-only views of commands parsed back from a backend.
//!
//! Views are plain data with no validation and no parent links. A field is
//! `None` when the backend it came from can't report it, which is different
//! from the backend reporting an empty or default value.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use slash_schema_core::{
    BackendId, Bounds, ChannelType, ChoiceValue, ContextType, Feature, Locale, Localizations,
    OptionType, PartialSupport, PermissionType,
};
use tracing::debug;

use crate::codes::{
    channel_type_from_code, context_from_code, option_type_from_code, permissions_from_bitfield,
};
use crate::error::{BridgeError, Result};
use crate::request::{ChoiceRequest, CommandRequest, OptionRequest, WireLocalizations};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandView {
    pub name: String,
    pub description: String,
    pub name_localizations: Localizations,
    pub description_localizations: Localizations,
    pub options: Vec<OptionView>,
    pub default_disabled: Option<bool>,
    pub required_permissions: Option<BTreeSet<PermissionType>>,
    pub enabled_in_dms: Option<bool>,
    pub nsfw: Option<bool>,
    pub contexts: Option<BTreeSet<ContextType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionView {
    pub option_type: OptionType,
    pub name: String,
    pub description: String,
    pub name_localizations: Option<Localizations>,
    pub description_localizations: Option<Localizations>,
    pub required: bool,
    pub autocompletable: Option<bool>,
    pub choices: Vec<ChoiceView>,
    pub options: Vec<OptionView>,
    pub channel_types: BTreeSet<ChannelType>,
    pub integer_bounds: Bounds<i64>,
    pub number_bounds: Bounds<f64>,
    pub string_length_bounds: Bounds<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceView {
    pub name: String,
    pub name_localizations: Option<Localizations>,
    pub value: ChoiceValue,
}

impl CommandView {
    /// Types of the top-level options, in order.
    pub fn option_types(&self) -> Vec<OptionType> {
        self.options.iter().map(|option| option.option_type).collect()
    }
}

/// Parses a wire request as the given backend would report it.
pub(crate) fn parse_command(backend: BackendId, request: &CommandRequest) -> Result<CommandView> {
    let required_permissions = request
        .default_member_permissions
        .as_deref()
        .map(permissions_from_bitfield)
        .transpose()?;

    let contexts = if Feature::Contexts.is_supported_by(backend) {
        request
            .contexts
            .as_ref()
            .map(|codes| codes.iter().map(|code| context_from_code(*code)).collect())
    } else {
        None
    };

    let nsfw = if Feature::NsfwFlag.is_supported_by(backend) {
        Some(request.nsfw.unwrap_or(false))
    } else {
        None
    };

    Ok(CommandView {
        name: request.name.clone(),
        description: request.description.clone(),
        name_localizations: parse_localizations(&request.name_localizations),
        description_localizations: parse_localizations(&request.description_localizations),
        options: request
            .options
            .iter()
            .map(|option| parse_option(backend, option))
            .collect::<Result<_>>()?,
        default_disabled: request.default_permission.map(|enabled| !enabled),
        required_permissions,
        enabled_in_dms: Some(request.dm_permission.unwrap_or(true)),
        nsfw,
        contexts,
    })
}

fn parse_option(backend: BackendId, request: &OptionRequest) -> Result<OptionView> {
    let option_type = option_type_from_code(request.kind);
    let reads_localizations = Feature::OptionLocalizations.is_supported_by(backend);

    let mut integer_bounds = Bounds::default();
    let mut number_bounds = Bounds::default();
    match option_type {
        OptionType::Integer => {
            integer_bounds = Bounds {
                min: request.min_value.as_ref().map(|value| as_integer(value, "min_value")).transpose()?,
                max: request.max_value.as_ref().map(|value| as_integer(value, "max_value")).transpose()?,
            };
        }
        OptionType::Number => {
            number_bounds = Bounds {
                min: request.min_value.as_ref().and_then(serde_json::Number::as_f64),
                max: request.max_value.as_ref().and_then(serde_json::Number::as_f64),
            };
        }
        _ => {}
    }

    Ok(OptionView {
        option_type,
        name: request.name.clone(),
        description: request.description.clone(),
        name_localizations: reads_localizations.then(|| parse_localizations(&request.name_localizations)),
        description_localizations: reads_localizations
            .then(|| parse_localizations(&request.description_localizations)),
        required: option_type.is_subcommand_like() || request.required.unwrap_or(false),
        autocompletable: Feature::Autocomplete
            .is_supported_by(backend)
            .then(|| request.autocomplete.unwrap_or(false)),
        choices: request.choices.iter().map(|choice| parse_choice(backend, choice)).collect(),
        options: request
            .options
            .iter()
            .map(|option| parse_option(backend, option))
            .collect::<Result<_>>()?,
        channel_types: request.channel_types.iter().map(|code| channel_type_from_code(*code)).collect(),
        integer_bounds,
        number_bounds,
        string_length_bounds: Bounds { min: request.min_length, max: request.max_length },
    })
}

fn parse_choice(backend: BackendId, request: &ChoiceRequest) -> ChoiceView {
    ChoiceView {
        name: request.name.clone(),
        name_localizations: Feature::ChoiceLocalizations
            .is_supported_by(backend)
            .then(|| parse_localizations(&request.name_localizations)),
        value: request.value.clone(),
    }
}

fn as_integer(value: &serde_json::Number, field: &str) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| BridgeError::InvalidPayload(format!("{field} {value} is not an integer")))
}

fn parse_localizations(wire: &WireLocalizations) -> Localizations {
    let mut localizations = Localizations::new();
    for (tag, text) in wire {
        match Locale::from_tag(tag) {
            Some(locale) => {
                localizations.insert(locale, text.clone());
            }
            None => debug!(tag = %tag, "Dropping unknown locale tag"),
        }
    }
    localizations
}
