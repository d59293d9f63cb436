//! Numeric wire codes for option types, channel types, contexts, and
//! permission bits.
//!
//! Encoding is total for every member except `UNKNOWN`, which has no code.
//! Decoding maps codes it doesn't recognize to `UNKNOWN` (or drops them, for
//! permission bits) so payloads from newer API versions still parse.

use std::collections::BTreeSet;

use slash_schema_core::{ChannelType, ContextType, OptionType, PermissionType};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Wire `type` of a chat-input application command.
pub const CHAT_INPUT: u8 = 1;

pub(crate) fn option_type_code(option_type: OptionType) -> Option<u8> {
    let code = match option_type {
        OptionType::Subcommand => 1,
        OptionType::SubcommandGroup => 2,
        OptionType::String => 3,
        OptionType::Integer => 4,
        OptionType::Boolean => 5,
        OptionType::User => 6,
        OptionType::Channel => 7,
        OptionType::Role => 8,
        OptionType::Mentionable => 9,
        OptionType::Number => 10,
        OptionType::Attachment => 11,
        OptionType::Unknown => return None,
    };
    Some(code)
}

pub(crate) fn option_type_from_code(code: u8) -> OptionType {
    OptionType::iter()
        .find(|candidate| option_type_code(*candidate) == Some(code))
        .unwrap_or(OptionType::Unknown)
}

pub(crate) fn channel_type_code(channel_type: ChannelType) -> Option<u8> {
    let code = match channel_type {
        ChannelType::ServerText => 0,
        ChannelType::Private => 1,
        ChannelType::ServerVoice => 2,
        ChannelType::Group => 3,
        ChannelType::ServerCategory => 4,
        ChannelType::ServerNews => 5,
        ChannelType::ServerThreadNews => 10,
        ChannelType::ServerThreadPublic => 11,
        ChannelType::ServerThreadPrivate => 12,
        ChannelType::ServerStage => 13,
        ChannelType::ServerForum => 15,
        ChannelType::ServerMedia => 16,
        ChannelType::Unknown => return None,
    };
    Some(code)
}

pub(crate) fn channel_type_from_code(code: u8) -> ChannelType {
    ChannelType::iter()
        .find(|candidate| channel_type_code(*candidate) == Some(code))
        .unwrap_or(ChannelType::Unknown)
}

pub(crate) fn context_code(context: ContextType) -> Option<u8> {
    match context {
        ContextType::Server => Some(0),
        ContextType::BotDm => Some(1),
        ContextType::OtherDm => Some(2),
        ContextType::Unknown => None,
    }
}

pub(crate) fn context_from_code(code: u8) -> ContextType {
    ContextType::iter()
        .find(|candidate| context_code(*candidate) == Some(code))
        .unwrap_or(ContextType::Unknown)
}

/// Bit position of a permission in Discord's permission bitfield.
pub(crate) fn permission_bit(permission: PermissionType) -> u32 {
    match permission {
        PermissionType::CreateInstantInvite => 0,
        PermissionType::KickMembers => 1,
        PermissionType::BanMembers => 2,
        PermissionType::Administrator => 3,
        PermissionType::ManageChannels => 4,
        PermissionType::ManageServer => 5,
        PermissionType::AddReactions => 6,
        PermissionType::ViewAuditLog => 7,
        PermissionType::PrioritySpeaker => 8,
        PermissionType::Video => 9,
        PermissionType::ViewChannel => 10,
        PermissionType::SendMessages => 11,
        PermissionType::SendTtsMessages => 12,
        PermissionType::ManageMessages => 13,
        PermissionType::EmbedLinks => 14,
        PermissionType::AttachFile => 15,
        PermissionType::ReadMessageHistory => 16,
        PermissionType::MentionAnyone => 17,
        PermissionType::UseExternalEmojis => 18,
        PermissionType::ViewServerInsights => 19,
        PermissionType::ConnectVoice => 20,
        PermissionType::Speak => 21,
        PermissionType::MuteMembers => 22,
        PermissionType::DeafenMembers => 23,
        PermissionType::MoveMembers => 24,
        PermissionType::UseVoiceActivity => 25,
        PermissionType::ChangeNickname => 26,
        PermissionType::ManageNicknames => 27,
        PermissionType::ManageRoles => 28,
        PermissionType::ManageWebhooks => 29,
        PermissionType::ManageExpressions => 30,
        PermissionType::UseApplicationCommands => 31,
        PermissionType::RequestToSpeak => 32,
        PermissionType::ManageEvents => 33,
        PermissionType::ManageThreads => 34,
        PermissionType::CreatePublicThreads => 35,
        PermissionType::CreatePrivateThreads => 36,
        PermissionType::UseExternalStickers => 37,
        PermissionType::SendMessagesInThreads => 38,
        PermissionType::StartEmbeddedActivities => 39,
        PermissionType::ModerateMembers => 40,
        PermissionType::UseSoundboard => 42,
        PermissionType::CreateExpressions => 43,
        PermissionType::CreateEvents => 44,
        PermissionType::UseExternalSoundboard => 45,
        PermissionType::SendVoiceMessages => 46,
        PermissionType::SetChannelStatus => 48,
        PermissionType::CreatePolls => 49,
        PermissionType::UseExternalApps => 50,
    }
}

/// Encodes permissions as the decimal bitfield string Discord expects.
pub(crate) fn permissions_to_bitfield(permissions: &BTreeSet<PermissionType>) -> String {
    permissions
        .iter()
        .fold(0u64, |bits, permission| bits | (1u64 << permission_bit(*permission)))
        .to_string()
}

/// Decodes a decimal bitfield string. Bits with no known permission are dropped.
pub(crate) fn permissions_from_bitfield(bitfield: &str) -> Result<BTreeSet<PermissionType>> {
    let bits: u64 = bitfield.parse().map_err(|_| {
        BridgeError::InvalidPayload(format!("permission bitfield '{bitfield}' is not a number"))
    })?;

    let permissions: BTreeSet<_> = PermissionType::iter()
        .filter(|permission| bits & (1u64 << permission_bit(*permission)) != 0)
        .collect();

    let known = permissions
        .iter()
        .fold(0u64, |acc, permission| acc | (1u64 << permission_bit(*permission)));
    if bits & !known != 0 {
        debug!(unknown_bits = bits & !known, "Dropping unknown permission bits");
    }
    Ok(permissions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let codes: BTreeSet<_> = OptionType::iter().filter_map(option_type_code).collect();
        assert_eq!(codes.len(), OptionType::iter().count() - 1);

        let bits: BTreeSet<_> = PermissionType::iter().map(permission_bit).collect();
        assert_eq!(bits.len(), PermissionType::iter().count());
    }

    #[test]
    fn test_unknown_codes_decode_to_unknown() {
        assert_eq!(option_type_from_code(99), OptionType::Unknown);
        assert_eq!(channel_type_from_code(14), ChannelType::Unknown);
        assert_eq!(context_from_code(7), ContextType::Unknown);
        assert_eq!(option_type_from_code(10), OptionType::Number);
    }

    #[test]
    fn test_bitfield() {
        let permissions = BTreeSet::from([PermissionType::Administrator, PermissionType::KickMembers]);
        assert_eq!(permissions_to_bitfield(&permissions), "10");

        let decoded = permissions_from_bitfield(&((1u64 << 63) | 8).to_string()).unwrap();
        assert_eq!(decoded, BTreeSet::from([PermissionType::Administrator]));

        assert!(matches!(
            permissions_from_bitfield("lots"),
            Err(BridgeError::InvalidPayload(_))
        ));
    }
}
