use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

id_type!(
    /// Identifier of a user account.
    ActorId
);
id_type!(ConversationId);
id_type!(MessageId);

// -- Actors --

/// Current capability flags. An actor may hold both, one or neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFlags {
    #[serde(default)]
    pub is_client: bool,
    #[serde(default)]
    pub is_freelance: bool,
}

/// Legacy single-valued account type, kept for older account records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Customer,
    Provider,
}

/// Account as delivered by the user directory, in either representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRecord {
    pub id: ActorId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub roles: Option<RoleFlags>,
    #[serde(default)]
    pub account_type: Option<AccountType>,
}

/// Normalized account. Only the boolean flags survive ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub display_name: String,
    pub roles: RoleFlags,
}

impl Actor {
    pub fn new(id: ActorId, display_name: impl Into<String>, roles: RoleFlags) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            roles,
        }
    }
}

impl From<ActorRecord> for Actor {
    /// Flags win whenever they are present; `account_type` only fills in for
    /// records that predate them.
    fn from(record: ActorRecord) -> Self {
        let roles = match (record.roles, record.account_type) {
            (Some(flags), _) => flags,
            (None, Some(AccountType::Customer)) => RoleFlags {
                is_client: true,
                is_freelance: false,
            },
            (None, Some(AccountType::Provider)) => RoleFlags {
                is_client: false,
                is_freelance: true,
            },
            (None, None) => RoleFlags::default(),
        };

        Self {
            id: record.id,
            display_name: record.display_name,
            roles,
        }
    }
}

// -- Localization --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    En,
    #[default]
    Et,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
            Language::Et => "et",
        }
    }

    /// First supported language in an `Accept-Language` header value.
    /// Quality weights are ignored; header order is taken as preference.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .filter_map(|tag| tag.trim().split('-').next())
            .find_map(|primary| primary.parse().ok())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLanguage(pub String);

impl fmt::Display for UnsupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language '{}', expected ru, en or et", self.0)
    }
}

impl std::error::Error for UnsupportedLanguage {}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            "et" => Ok(Language::Et),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}

// -- Conversations --

/// What a conversation was started about. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ConversationContext {
    Task(Uuid),
    Proposal(Uuid),
    Booking(Uuid),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    File,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: ActorId,
    pub body: String,
    pub kind: MessageKind,
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}

/// A thread between a fixed set of participants. Owns its messages.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: Vec<ActorId>,
    pub context: Option<ConversationContext>,
    pub last_message_id: Option<MessageId>,
    pub unread: HashMap<ActorId, u32>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(participants: Vec<ActorId>, context: Option<ConversationContext>) -> Self {
        let now = Utc::now();
        let unread = participants.iter().map(|id| (*id, 0)).collect();
        Self {
            id: ConversationId::new(),
            participants,
            context,
            last_message_id: None,
            unread,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_participant(&self, actor_id: &ActorId) -> bool {
        self.participants.contains(actor_id)
    }

    /// True when the participant set is exactly `{a, b}`, in either order.
    pub fn is_between(&self, a: &ActorId, b: &ActorId) -> bool {
        self.participants.len() == 2 && self.is_participant(a) && self.is_participant(b)
    }

    pub fn last_message(&self) -> Option<&Message> {
        let id = self.last_message_id?;
        self.messages.iter().rev().find(|m| m.id == id)
    }

    pub fn unread_for(&self, actor_id: &ActorId) -> u32 {
        self.unread.get(actor_id).copied().unwrap_or(0)
    }
}
