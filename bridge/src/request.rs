//! Wire model of an application-command create request.
//!
//! Field names and numeric codes follow Discord's JSON shape, so a
//! [`CommandRequest`] serializes straight into a request body:
//!
//! ```json
//! {
//!   "type": 1,
//!   "name": "ban",
//!   "description": "Ban a member",
//!   "options": [{ "type": 6, "name": "user", "description": "Member", "required": true }],
//!   "default_member_permissions": "4",
//!   "dm_permission": false
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use slash_schema_core::ChoiceValue;

use crate::codes::CHAT_INPUT;
use crate::error::Result;

/// Locale tag to localized text.
pub type WireLocalizations = BTreeMap<String, String>;

fn chat_input() -> u8 {
    CHAT_INPUT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(rename = "type", default = "chat_input")]
    pub kind: u8,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub name_localizations: WireLocalizations,
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description_localizations: WireLocalizations,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_member_permissions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permission: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dm_permission: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRequest {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub name_localizations: WireLocalizations,
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description_localizations: WireLocalizations,
    /// Absent means not required. Never sent for subcommands and groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_types: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub name_localizations: WireLocalizations,
    pub value: ChoiceValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<CommandRequest>),
    One(Box<CommandRequest>),
}

/// Reads one request object or an array of them.
///
/// # Errors
///
/// Returns [`BridgeError::Json`](crate::BridgeError::Json) if the input is
/// neither.
pub fn requests_from_json(input: &str) -> Result<Vec<CommandRequest>> {
    Ok(match serde_json::from_str(input)? {
        OneOrMany::Many(requests) => requests,
        OneOrMany::One(request) => vec![*request],
    })
}
