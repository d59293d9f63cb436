//! Translation of validated trees into wire requests.
//!
//! A [`Backend`] turns one command of a [`SchemaTree`] into its own request
//! type and parses such a request back into a [`CommandView`]. The schema is
//! assumed valid; translation only adds capability checks on top.
//!
//! # Examples
//!
//! ```
//! use slash_schema_bridge::{Backend, BridgeError, WireBackend};
//! use slash_schema_core::{BackendId, SchemaTree};
//!
//! let mut tree = SchemaTree::new();
//! let cmd = tree.create_command("spicy", "Age restricted").unwrap();
//! tree.command_mut(cmd).unwrap().set_nsfw(true).unwrap();
//!
//! let jda = WireBackend::new(BackendId::Jda);
//! assert_eq!(jda.translate(&tree, cmd).unwrap().nsfw, Some(true));
//!
//! let d4j = WireBackend::new(BackendId::Discord4j);
//! assert!(matches!(d4j.translate(&tree, cmd), Err(BridgeError::Unsupported { .. })));
//! ```

use std::fmt::Display;

use slash_schema_core::{
    BackendId, ChoiceId, ChoiceValue, CommandId, Feature, Localizations, OptionId, OptionType,
    PartialSupport, SchemaTree,
};
use tracing::debug;

use crate::codes::{
    CHAT_INPUT, channel_type_code, context_code, option_type_code, permissions_to_bitfield,
};
use crate::error::{BridgeError, Result};
use crate::request::{ChoiceRequest, CommandRequest, OptionRequest, WireLocalizations};
use crate::view::{CommandView, parse_command};

/// A collaborator that sends commands to Discord through some library.
pub trait Backend {
    /// What [`translate`](Backend::translate) produces.
    type Request;

    fn id(&self) -> BackendId;

    /// Translates one command and everything under it.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Unsupported`] when the command uses a value or
    /// feature the backend can't express.
    fn translate(&self, tree: &SchemaTree, command: CommandId) -> Result<Self::Request>;

    /// Reads a request back the way the backend would report it.
    fn parse(&self, request: &Self::Request) -> Result<CommandView>;
}

/// Backend that emits Discord's JSON request shape, restricted to what one
/// library profile supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireBackend {
    backend: BackendId,
    strict_locales: bool,
}

impl WireBackend {
    pub fn new(backend: BackendId) -> Self {
        Self { backend, strict_locales: false }
    }

    /// Rejects unsupported locales instead of dropping them.
    pub fn with_strict_locales(mut self, strict: bool) -> Self {
        self.strict_locales = strict;
        self
    }

    fn unsupported(&self, what: impl Display) -> BridgeError {
        debug!(backend = %self.backend, what = %what, "Rejecting unsupported value");
        BridgeError::Unsupported { backend: self.backend, what: what.to_string() }
    }

    fn require<T: PartialSupport + Display>(&self, value: T, kind: &str) -> Result<()> {
        if value.is_supported_by(self.backend) {
            Ok(())
        } else {
            Err(self.unsupported(format!("{kind} {value}")))
        }
    }

    fn require_feature(&self, feature: Feature, at: &str) -> Result<()> {
        if feature.is_supported_by(self.backend) {
            Ok(())
        } else {
            Err(self.unsupported(format!("{feature} (used by {at})")))
        }
    }

    fn localizations(&self, map: &Localizations, at: &str) -> Result<WireLocalizations> {
        let mut wire = WireLocalizations::new();
        for (locale, text) in map {
            if locale.is_supported_by(self.backend) {
                wire.insert(locale.tag(), text.clone());
            } else if self.strict_locales {
                return Err(self.unsupported(format!("locale {locale} (used by {at})")));
            } else {
                debug!(backend = %self.backend, %locale, at, "Dropping unsupported localization");
            }
        }
        Ok(wire)
    }

    fn translate_option(&self, tree: &SchemaTree, id: OptionId, path: &str) -> Result<OptionRequest> {
        let option = tree.option(id)?;
        let path = format!("{path}/{}", option.name());
        let option_type = option.option_type();

        self.require(option_type, "option type")?;
        let kind = option_type_code(option_type)
            .ok_or_else(|| self.unsupported(format!("option type {option_type}")))?;

        let mut channel_types = Vec::with_capacity(option.channel_type_bounds().len());
        for &channel_type in option.channel_type_bounds() {
            self.require(channel_type, "channel type")?;
            let code = channel_type_code(channel_type)
                .ok_or_else(|| self.unsupported(format!("channel type {channel_type}")))?;
            channel_types.push(code);
        }

        let (min_value, max_value) = match option_type {
            OptionType::Integer => {
                let bounds = option.integer_bounds();
                (bounds.min.map(serde_json::Number::from), bounds.max.map(serde_json::Number::from))
            }
            OptionType::Number => {
                let bounds = option.number_bounds();
                (
                    bounds.min.and_then(serde_json::Number::from_f64),
                    bounds.max.and_then(serde_json::Number::from_f64),
                )
            }
            _ => (None, None),
        };

        let choices = option
            .choices()
            .iter()
            .map(|&choice| self.translate_choice(tree, choice, &path))
            .collect::<Result<Vec<_>>>()?;
        let options = option
            .options()
            .iter()
            .map(|&child| self.translate_option(tree, child, &path))
            .collect::<Result<Vec<_>>>()?;

        let string_length = option.string_length_bounds();
        Ok(OptionRequest {
            kind,
            name: option.name().to_string(),
            name_localizations: self.localizations(option.name_localizations(), &path)?,
            description: option.description().to_string(),
            description_localizations: self.localizations(option.description_localizations(), &path)?,
            required: (!option_type.is_subcommand_like()).then_some(option.is_required()),
            autocomplete: option.is_autocompletable().then_some(true),
            choices,
            options,
            channel_types,
            min_value,
            max_value,
            min_length: string_length.min,
            max_length: string_length.max,
        })
    }

    fn translate_choice(&self, tree: &SchemaTree, id: ChoiceId, path: &str) -> Result<ChoiceRequest> {
        let choice = tree.choice(id)?;
        let path = format!("{path}/{}", choice.name());

        if !choice.name_localizations().is_empty() {
            self.require_feature(Feature::ChoiceLocalizations, &path)?;
        }
        if !matches!(choice.value(), ChoiceValue::Text(_)) {
            self.require_feature(Feature::NumericChoices, &path)?;
        }

        Ok(ChoiceRequest {
            name: choice.name().to_string(),
            name_localizations: self.localizations(choice.name_localizations(), &path)?,
            value: choice.value().clone(),
        })
    }
}

impl Backend for WireBackend {
    type Request = CommandRequest;

    fn id(&self) -> BackendId {
        self.backend
    }

    fn translate(&self, tree: &SchemaTree, command: CommandId) -> Result<CommandRequest> {
        let cmd = tree.command(command)?;
        let path = cmd.name();
        debug!(backend = %self.backend, command = path, "Translating command");

        let contexts = match cmd.contexts() {
            Some(contexts) => {
                self.require_feature(Feature::Contexts, path)?;
                let mut codes = Vec::with_capacity(contexts.len());
                for &context in contexts {
                    self.require(context, "context")?;
                    let code = context_code(context)
                        .ok_or_else(|| self.unsupported(format!("context {context}")))?;
                    codes.push(code);
                }
                Some(codes)
            }
            None => None,
        };

        if cmd.is_nsfw() {
            self.require_feature(Feature::NsfwFlag, path)?;
        }
        let nsfw = Feature::NsfwFlag.is_supported_by(self.backend).then_some(cmd.is_nsfw());

        let default_member_permissions = match cmd.required_permissions() {
            Some(permissions) => {
                for &permission in permissions {
                    self.require(permission, "permission")?;
                }
                Some(permissions_to_bitfield(permissions))
            }
            None => None,
        };

        let options = cmd
            .options()
            .iter()
            .map(|&option| self.translate_option(tree, option, path))
            .collect::<Result<Vec<_>>>()?;

        Ok(CommandRequest {
            kind: CHAT_INPUT,
            name: cmd.name().to_string(),
            name_localizations: self.localizations(cmd.name_localizations(), path)?,
            description: cmd.description().to_string(),
            description_localizations: self.localizations(cmd.description_localizations(), path)?,
            options,
            default_member_permissions,
            default_permission: Some(!cmd.is_default_disabled()),
            dm_permission: Some(cmd.is_enabled_in_dms()),
            nsfw,
            contexts,
        })
    }

    fn parse(&self, request: &CommandRequest) -> Result<CommandView> {
        parse_command(self.backend, request)
    }
}
