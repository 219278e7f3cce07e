use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    ActorId, Conversation, ConversationContext, ConversationId, Language, Message, MessageId,
    MessageKind,
};

// -- Session claims --

/// Bearer-token claims issued by the external auth service. Only decoded here.
///
/// `lang` is the issuer's locale tag, kept verbatim; an unsupported value
/// must not invalidate the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: ActorId,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Claims {
    /// Supported language named by the `lang` claim, if any.
    pub fn language(&self) -> Option<Language> {
        self.lang.as_deref().and_then(Language::from_accept_language)
    }
}

// -- Gate --

#[derive(Debug, Serialize, Deserialize)]
pub struct GateResponse {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// -- Conversations --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateConversationRequest {
    pub target_id: ActorId,
    #[serde(default)]
    pub initial_message: Option<String>,
    #[serde(default)]
    pub context: Option<ConversationContext>,
}

/// A conversation as seen by one participant.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub id: ConversationId,
    pub participants: Vec<ActorId>,
    pub context: Option<ConversationContext>,
    pub last_message: Option<MessageResponse>,
    pub unread_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationResponse {
    pub fn for_viewer(conversation: &Conversation, viewer: &ActorId) -> Self {
        Self {
            id: conversation.id,
            participants: conversation.participants.clone(),
            context: conversation.context,
            last_message: conversation.last_message().map(MessageResponse::from),
            unread_count: conversation.unread_for(viewer),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

// -- Messages --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub body: String,
    #[serde(default)]
    pub kind: MessageKind,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: ActorId,
    pub body: String,
    pub kind: MessageKind,
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            body: message.body.clone(),
            kind: message.kind,
            read: message.read,
            sent_at: message.sent_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadResponse {
    pub total: u32,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub reason: String,
}
