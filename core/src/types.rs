//! Enumerations and value types used by the schema model.
//!
//! These are plain values: they carry no parent links and can be copied or
//! serialized freely. Every enumeration can be walked with
//! [`strum::IntoEnumIterator`] and displays in Discord's upper-case spelling
//! (locales display as their tag, e.g. `en-US`).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Largest magnitude allowed for integer and number values and bounds (2^53).
pub const MAX_NUMBER: i64 = 1 << 53;
/// Smallest value allowed for integer and number values and bounds.
pub const MIN_NUMBER: i64 = -MAX_NUMBER;
/// Largest value allowed for string length bounds.
pub const MAX_STRING_LENGTH: u32 = 6000;

/// Type of a command option.
///
/// `Unknown` only appears when reading data produced elsewhere; it can never
/// be set on an option.
///
/// # Examples
///
/// ```
/// use slash_schema_core::OptionType;
///
/// assert!(OptionType::Integer.can_be_choices());
/// assert!(!OptionType::Boolean.can_be_choices());
/// assert_eq!(OptionType::SubcommandGroup.to_string(), "SUBCOMMAND_GROUP");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    Subcommand,
    SubcommandGroup,
    String,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Attachment,
    Unknown,
}

impl OptionType {
    /// Whether this type groups other options instead of carrying a value.
    pub fn is_subcommand_like(self) -> bool {
        matches!(self, Self::Subcommand | Self::SubcommandGroup)
    }

    /// Whether options of this type may carry static choices or autocomplete.
    pub fn can_be_choices(self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Number)
    }

    /// Whether a choice value is representable by this type.
    ///
    /// `Number` accepts integer values as well as floating point ones.
    pub fn accepts(self, value: &ChoiceValue) -> bool {
        match (self, value) {
            (Self::String, ChoiceValue::Text(_)) => true,
            (Self::Integer, ChoiceValue::Integer(_)) => true,
            (Self::Number, ChoiceValue::Integer(_) | ChoiceValue::Number(_)) => true,
            _ => false,
        }
    }

    /// Whether every value representable by `other` is representable by `self`.
    pub fn is_assignable_from(self, other: OptionType) -> bool {
        self == other || (self == Self::Number && other == Self::Integer)
    }
}

/// Type of a Discord channel, used to restrict `CHANNEL` options.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelType {
    Private,
    /// Bots can't join group chats, so this is effectively unused.
    Group,
    ServerText,
    ServerVoice,
    ServerCategory,
    ServerNews,
    ServerStage,
    ServerThreadNews,
    ServerThreadPublic,
    ServerThreadPrivate,
    ServerForum,
    ServerMedia,
    Unknown,
}

/// Context a command may be invoked from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextType {
    /// Use of a command in a server.
    Server,
    /// Use of a command in a DM with the command's bot.
    BotDm,
    /// Use of a command in a DM unrelated to the command's bot.
    OtherDm,
    Unknown,
}

/// Discord permission, used for a command's default required permissions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionType {
    // General server permissions
    ViewChannel,
    ManageChannels,
    ManageRoles,
    CreateExpressions,
    ManageExpressions,
    ViewAuditLog,
    ViewServerInsights,
    ManageWebhooks,
    ManageServer,
    // Membership permissions
    CreateInstantInvite,
    ChangeNickname,
    ManageNicknames,
    KickMembers,
    BanMembers,
    ModerateMembers,
    // Text channel permissions
    SendMessages,
    SendMessagesInThreads,
    CreatePublicThreads,
    CreatePrivateThreads,
    EmbedLinks,
    AttachFile,
    AddReactions,
    UseExternalEmojis,
    UseExternalStickers,
    MentionAnyone,
    ManageMessages,
    ManageThreads,
    ReadMessageHistory,
    SendTtsMessages,
    SendVoiceMessages,
    CreatePolls,
    // Voice channel permissions
    ConnectVoice,
    Speak,
    /// Includes camera and streaming.
    Video,
    UseSoundboard,
    UseExternalSoundboard,
    UseVoiceActivity,
    PrioritySpeaker,
    MuteMembers,
    DeafenMembers,
    MoveMembers,
    SetChannelStatus,
    // Application permissions
    UseApplicationCommands,
    StartEmbeddedActivities,
    UseExternalApps,
    // Stage channel permissions
    RequestToSpeak,
    // Event permissions
    CreateEvents,
    ManageEvents,
    Administrator,
}

impl PermissionType {
    /// Readable name, as shown in the Discord client.
    pub fn readable_name(self) -> &'static str {
        match self {
            Self::ViewChannel => "View Channel",
            Self::ManageChannels => "Manage Channels",
            Self::ManageRoles => "Manage Roles",
            Self::CreateExpressions => "Create Expressions",
            Self::ManageExpressions => "Manage Expressions",
            Self::ViewAuditLog => "View Audit Log",
            Self::ViewServerInsights => "View Server Insights",
            Self::ManageWebhooks => "Manage Webhooks",
            Self::ManageServer => "Manage Server",
            Self::CreateInstantInvite => "Create Invite",
            Self::ChangeNickname => "Change Nickname",
            Self::ManageNicknames => "Manage Nickname",
            Self::KickMembers => "Kick Members",
            Self::BanMembers => "Ban Members",
            Self::ModerateMembers => "Time out Members",
            Self::SendMessages => "Send Messages",
            Self::SendMessagesInThreads => "Send Messages in Threads",
            Self::CreatePublicThreads => "Create Public Threads",
            Self::CreatePrivateThreads => "Create Private Threads",
            Self::EmbedLinks => "Embed Links",
            Self::AttachFile => "Attach Files",
            Self::AddReactions => "Add Reactions",
            Self::UseExternalEmojis => "Use External Emojis",
            Self::UseExternalStickers => "Use External Stickers",
            Self::MentionAnyone => "Mention @everyone, @here and All Roles",
            Self::ManageMessages => "Manage Messages",
            Self::ManageThreads => "Manage Threads",
            Self::ReadMessageHistory => "Read Message History",
            Self::SendTtsMessages => "Send TTS Messages",
            Self::SendVoiceMessages => "Send Voice Messages",
            Self::CreatePolls => "Create Polls",
            Self::ConnectVoice => "Connect",
            Self::Speak => "Speak",
            Self::Video => "Video",
            Self::UseSoundboard => "Use Soundboard",
            Self::UseExternalSoundboard => "Use External Sounds",
            Self::UseVoiceActivity => "Use Voice Activity",
            Self::PrioritySpeaker => "Priority Speaker",
            Self::MuteMembers => "Mute Members",
            Self::DeafenMembers => "Deafen Members",
            Self::MoveMembers => "Move Members",
            Self::SetChannelStatus => "Set Voice Channel Status",
            Self::UseApplicationCommands => "Use Application Commands",
            Self::StartEmbeddedActivities => "Use Activities",
            Self::UseExternalApps => "Use External Apps",
            Self::RequestToSpeak => "Request to Speak",
            Self::CreateEvents => "Create Events",
            Self::ManageEvents => "Manage Events",
            Self::Administrator => "Administrator",
        }
    }
}

/// Locale supported by Discord for localized names and descriptions.
///
/// Serializes and displays as the Discord locale tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Locale {
    #[serde(rename = "da")]
    #[strum(serialize = "da")]
    Danish,
    #[serde(rename = "de")]
    #[strum(serialize = "de")]
    German,
    #[serde(rename = "en-GB")]
    #[strum(serialize = "en-GB")]
    EnglishUk,
    #[serde(rename = "en-US")]
    #[strum(serialize = "en-US")]
    EnglishUs,
    #[serde(rename = "es-ES")]
    #[strum(serialize = "es-ES")]
    Spanish,
    #[serde(rename = "es-419")]
    #[strum(serialize = "es-419")]
    SpanishLatam,
    #[serde(rename = "fr")]
    #[strum(serialize = "fr")]
    French,
    #[serde(rename = "hr")]
    #[strum(serialize = "hr")]
    Croatian,
    #[serde(rename = "it")]
    #[strum(serialize = "it")]
    Italian,
    #[serde(rename = "lt")]
    #[strum(serialize = "lt")]
    Lithuanian,
    #[serde(rename = "hu")]
    #[strum(serialize = "hu")]
    Hungarian,
    #[serde(rename = "nl")]
    #[strum(serialize = "nl")]
    Dutch,
    #[serde(rename = "no")]
    #[strum(serialize = "no")]
    Norwegian,
    #[serde(rename = "pl")]
    #[strum(serialize = "pl")]
    Polish,
    #[serde(rename = "pt-BR")]
    #[strum(serialize = "pt-BR")]
    PortugueseBrazilian,
    #[serde(rename = "ro")]
    #[strum(serialize = "ro")]
    Romanian,
    #[serde(rename = "fi")]
    #[strum(serialize = "fi")]
    Finnish,
    #[serde(rename = "sv-SE")]
    #[strum(serialize = "sv-SE")]
    Swedish,
    #[serde(rename = "vi")]
    #[strum(serialize = "vi")]
    Vietnamese,
    #[serde(rename = "tr")]
    #[strum(serialize = "tr")]
    Turkish,
    #[serde(rename = "cs")]
    #[strum(serialize = "cs")]
    Czech,
    #[serde(rename = "el")]
    #[strum(serialize = "el")]
    Greek,
    #[serde(rename = "bg")]
    #[strum(serialize = "bg")]
    Bulgarian,
    #[serde(rename = "ru")]
    #[strum(serialize = "ru")]
    Russian,
    #[serde(rename = "uk")]
    #[strum(serialize = "uk")]
    Ukrainian,
    #[serde(rename = "hi")]
    #[strum(serialize = "hi")]
    Hindi,
    #[serde(rename = "th")]
    #[strum(serialize = "th")]
    Thai,
    #[serde(rename = "zh-CN")]
    #[strum(serialize = "zh-CN")]
    ChineseChina,
    #[serde(rename = "ja")]
    #[strum(serialize = "ja")]
    Japanese,
    #[serde(rename = "zh-TW")]
    #[strum(serialize = "zh-TW")]
    ChineseTaiwan,
    #[serde(rename = "ko")]
    #[strum(serialize = "ko")]
    Korean,
}

impl Locale {
    /// Discord locale tag, e.g. `"en-US"`.
    pub fn tag(self) -> String {
        self.to_string()
    }

    /// Looks up a locale by its Discord tag. Unrecognized tags yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use slash_schema_core::Locale;
    ///
    /// assert_eq!(Locale::from_tag("pt-BR"), Some(Locale::PortugueseBrazilian));
    /// assert_eq!(Locale::from_tag("tlh"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        use strum::IntoEnumIterator;

        Self::iter().find(|locale| locale.to_string() == tag)
    }
}

/// Per-locale variants of a name or description.
pub type Localizations = BTreeMap<Locale, String>;

/// Literal value of a choice.
///
/// Deserializes untagged: strings become [`Text`](ChoiceValue::Text), whole
/// numbers become [`Integer`](ChoiceValue::Integer), anything else numeric
/// becomes [`Number`](ChoiceValue::Number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "'{text}'"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ChoiceValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Optional inclusive `(min, max)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds<T> {
    /// Inclusive lower bound.
    pub min: Option<T>,
    /// Inclusive upper bound.
    pub max: Option<T>,
}

impl<T> Bounds<T> {
    /// Whether neither endpoint is set.
    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_number_accepts_integers() {
        assert!(OptionType::Number.accepts(&ChoiceValue::Integer(3)));
        assert!(OptionType::Number.accepts(&ChoiceValue::Number(3.5)));
        assert!(!OptionType::Integer.accepts(&ChoiceValue::Number(3.5)));
        assert!(!OptionType::String.accepts(&ChoiceValue::Integer(3)));
    }

    #[test]
    fn test_locale_tags_round_trip() {
        for locale in Locale::iter() {
            assert_eq!(Locale::from_tag(&locale.tag()), Some(locale));
        }
    }

    #[test]
    fn test_display_spelling() {
        assert_eq!(OptionType::String.to_string(), "STRING");
        assert_eq!(ChannelType::ServerThreadPublic.to_string(), "SERVER_THREAD_PUBLIC");
        assert_eq!(PermissionType::SendTtsMessages.to_string(), "SEND_TTS_MESSAGES");
        assert_eq!(Locale::SpanishLatam.to_string(), "es-419");
    }

    #[test]
    fn test_choice_value_untagged_serde() {
        let values: Vec<ChoiceValue> = serde_json::from_str(r#"["a", 4, 4.5]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ChoiceValue::Text("a".into()),
                ChoiceValue::Integer(4),
                ChoiceValue::Number(4.5)
            ]
        );
    }
}
