//! Backend capability queries.
//!
//! Not every backend library can express every enum member or schema
//! feature. [`PartialSupport`] lets callers ask, before building a tree,
//! whether a value is safe to use with a given [`BackendId`]:
//!
//! ```
//! use slash_schema_core::{BackendId, ChannelType, Feature, PartialSupport, supported_values};
//!
//! assert!(ChannelType::ServerForum.is_supported_by(BackendId::Jda));
//! assert!(!ChannelType::ServerForum.is_supported_by(BackendId::Discord4j));
//! assert!(!Feature::NsfwFlag.is_supported_by(BackendId::Discord4j));
//!
//! let channels = supported_values::<ChannelType>(BackendId::Javacord);
//! assert!(!channels.contains(&ChannelType::ServerMedia));
//! ```
//!
//! Capability rejections happen at translation time and are separate from the
//! schema rules enforced on every mutation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{ChannelType, ContextType, Locale, OptionType, PermissionType};

/// Identifies a backend library profile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BackendId {
    /// Supports every value; translation is lossless.
    #[default]
    Identity,
    Javacord,
    Discord4j,
    Jda,
    Kord,
    DiscordJar,
}

/// Schema features that some backends cannot express.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    /// Restricting the contexts a command can be used in.
    Contexts,
    /// Marking a command as age restricted.
    NsfwFlag,
    /// Localized names on choices.
    ChoiceLocalizations,
    /// INTEGER and NUMBER choice values sent as numbers.
    NumericChoices,
    /// Reading option localizations back from the backend.
    OptionLocalizations,
    /// Reading the autocomplete flag back from the backend.
    Autocomplete,
}

/// Marks an enumeration whose members may be unsupported by some backends.
pub trait PartialSupport: Copy + IntoEnumIterator {
    /// Whether `backend` can express this value.
    fn is_supported_by(self, backend: BackendId) -> bool;
}

/// Lists every member of `T` that `backend` supports, in declaration order.
pub fn supported_values<T: PartialSupport>(backend: BackendId) -> Vec<T> {
    T::iter().filter(|value| value.is_supported_by(backend)).collect()
}

impl PartialSupport for OptionType {
    fn is_supported_by(self, backend: BackendId) -> bool {
        backend == BackendId::Identity || self != OptionType::Unknown
    }
}

impl PartialSupport for ChannelType {
    fn is_supported_by(self, backend: BackendId) -> bool {
        use ChannelType::*;

        match backend {
            BackendId::Identity => true,
            _ if self == Unknown => false,
            BackendId::Javacord => self != ServerMedia,
            BackendId::Discord4j => !matches!(
                self,
                ServerThreadNews | ServerThreadPublic | ServerThreadPrivate | ServerForum | ServerMedia
            ),
            BackendId::Jda | BackendId::Kord | BackendId::DiscordJar => true,
        }
    }
}

impl PartialSupport for PermissionType {
    fn is_supported_by(self, backend: BackendId) -> bool {
        use PermissionType::*;

        match backend {
            BackendId::Identity | BackendId::Jda => true,
            BackendId::Javacord => !matches!(
                self,
                CreateExpressions
                    | SendVoiceMessages
                    | CreatePolls
                    | UseSoundboard
                    | UseExternalSoundboard
                    | SetChannelStatus
                    | UseExternalApps
                    | CreateEvents
                    | ManageEvents
            ),
            BackendId::Discord4j | BackendId::DiscordJar => !matches!(
                self,
                CreateExpressions | CreatePolls | SetChannelStatus | UseExternalApps | CreateEvents
            ),
            BackendId::Kord => !matches!(self, CreatePolls | SetChannelStatus | UseExternalApps),
        }
    }
}

impl PartialSupport for ContextType {
    fn is_supported_by(self, backend: BackendId) -> bool {
        backend == BackendId::Identity || (self != ContextType::Unknown && Feature::Contexts.is_supported_by(backend))
    }
}

impl PartialSupport for Locale {
    fn is_supported_by(self, backend: BackendId) -> bool {
        // Their locale enums predate es-419.
        !(self == Locale::SpanishLatam && matches!(backend, BackendId::Javacord | BackendId::DiscordJar))
    }
}

impl PartialSupport for Feature {
    fn is_supported_by(self, backend: BackendId) -> bool {
        match (self, backend) {
            (_, BackendId::Identity) => true,
            (Feature::Contexts, _) => false,
            (Feature::NsfwFlag, BackendId::Discord4j) => false,
            (Feature::ChoiceLocalizations | Feature::NumericChoices, BackendId::DiscordJar) => false,
            (Feature::OptionLocalizations | Feature::Autocomplete, BackendId::Kord) => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_supports_everything() {
        assert_eq!(
            supported_values::<OptionType>(BackendId::Identity).len(),
            OptionType::iter().count()
        );
        assert_eq!(
            supported_values::<Feature>(BackendId::Identity).len(),
            Feature::iter().count()
        );
    }

    #[test]
    fn test_unknown_members_unsupported_by_libraries() {
        for backend in BackendId::iter().filter(|b| *b != BackendId::Identity) {
            assert!(!OptionType::Unknown.is_supported_by(backend));
            assert!(!ChannelType::Unknown.is_supported_by(backend));
            assert!(!ContextType::Unknown.is_supported_by(backend));
        }
    }

    #[test]
    fn test_permission_tables() {
        assert!(!PermissionType::ManageEvents.is_supported_by(BackendId::Javacord));
        assert!(PermissionType::ManageEvents.is_supported_by(BackendId::Kord));
        assert!(!PermissionType::CreatePolls.is_supported_by(BackendId::Kord));
        assert!(PermissionType::Administrator.is_supported_by(BackendId::DiscordJar));
    }

    #[test]
    fn test_locale_gaps() {
        assert!(!Locale::SpanishLatam.is_supported_by(BackendId::Javacord));
        assert!(Locale::SpanishLatam.is_supported_by(BackendId::Jda));
        assert_eq!(
            supported_values::<Locale>(BackendId::DiscordJar).len(),
            Locale::iter().count() - 1
        );
    }

    #[test]
    fn test_backend_id_spelling() {
        assert_eq!(BackendId::DiscordJar.to_string(), "discord-jar");
        assert_eq!(BackendId::Discord4j.to_string(), "discord4j");
    }
}
