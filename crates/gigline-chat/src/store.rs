use chrono::Utc;
use gigline_types::models::{
    ActorId, Conversation, ConversationContext, ConversationId, Message, MessageId, MessageKind,
};
use tracing::{debug, info};

use crate::error::ChatError;
use crate::gate::ConversationGate;
use crate::session::Session;

/// One session's view of its conversations, in creation order.
///
/// Not synchronized: callers serialize mutations (one writer per call).
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == *id)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Return the conversation between the session actor and `target_id`,
    /// creating it if the gate allows. One conversation per unordered pair.
    ///
    /// `initial_message` is only posted when a new conversation is created;
    /// a blank one is treated as absent.
    pub fn find_or_create_conversation(
        &mut self,
        gate: &ConversationGate<'_>,
        session: &Session,
        target_id: ActorId,
        initial_message: Option<&str>,
        context: Option<ConversationContext>,
    ) -> Result<&Conversation, ChatError> {
        gate.check(session.actor.as_ref(), &target_id)
            .map_err(ChatError::GateRejected)?;
        let initiator = session.actor_id().ok_or(ChatError::NotAuthenticated)?;

        if let Some(idx) = self
            .conversations
            .iter()
            .position(|c| c.is_between(&initiator, &target_id))
        {
            debug!(conversation_id = %self.conversations[idx].id, "Reusing existing conversation");
            return Ok(&self.conversations[idx]);
        }

        let conversation = Conversation::new(vec![initiator, target_id], context);
        let conversation_id = conversation.id;
        info!(%conversation_id, %initiator, target = %target_id, "Conversation created");
        self.conversations.push(conversation);

        if let Some(body) = initial_message.filter(|b| !b.trim().is_empty()) {
            self.send_message(&conversation_id, Some(initiator), body)?;
        }

        self.get(&conversation_id).ok_or(ChatError::ConversationNotFound)
    }

    pub fn send_message(
        &mut self,
        conversation_id: &ConversationId,
        sender: Option<ActorId>,
        body: &str,
    ) -> Result<&Message, ChatError> {
        self.send_message_with_kind(conversation_id, sender, body, MessageKind::Text)
    }

    /// Append a message. Validation happens before any mutation.
    pub fn send_message_with_kind(
        &mut self,
        conversation_id: &ConversationId,
        sender: Option<ActorId>,
        body: &str,
        kind: MessageKind,
    ) -> Result<&Message, ChatError> {
        let sender = sender.ok_or(ChatError::NotAuthenticated)?;

        let body = body.trim();
        if body.is_empty() {
            return Err(ChatError::EmptyBody);
        }

        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == *conversation_id)
            .ok_or(ChatError::ConversationNotFound)?;

        if !conversation.is_participant(&sender) {
            return Err(ChatError::NotAParticipant);
        }

        let now = Utc::now();
        let message = Message {
            id: MessageId::new(),
            conversation_id: conversation.id,
            sender_id: sender,
            body: body.to_string(),
            kind,
            read: false,
            sent_at: now,
        };

        conversation.last_message_id = Some(message.id);
        conversation.updated_at = now;
        for participant in &conversation.participants {
            if *participant != sender {
                *conversation.unread.entry(*participant).or_insert(0) += 1;
            }
        }

        debug!(%conversation_id, message_id = %message.id, %sender, ?kind, "Message appended");
        conversation.messages.push(message);

        conversation
            .messages
            .last()
            .ok_or(ChatError::ConversationNotFound)
    }

    /// Zero the actor's unread counter and flag messages they received as read.
    /// Unknown conversations and non-participants are ignored.
    pub fn mark_as_read(&mut self, conversation_id: &ConversationId, actor_id: &ActorId) {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == *conversation_id)
        else {
            return;
        };

        if !conversation.is_participant(actor_id) {
            return;
        }

        conversation.unread.insert(*actor_id, 0);
        for message in conversation
            .messages
            .iter_mut()
            .filter(|m| m.sender_id != *actor_id)
        {
            message.read = true;
        }
        debug!(%conversation_id, %actor_id, "Conversation marked read");
    }

    pub fn unread_count(&self, conversation_id: &ConversationId, actor_id: &ActorId) -> u32 {
        self.get(conversation_id)
            .map(|c| c.unread_for(actor_id))
            .unwrap_or(0)
    }

    pub fn total_unread(&self, actor_id: &ActorId) -> u32 {
        self.conversations
            .iter()
            .filter(|c| c.is_participant(actor_id))
            .map(|c| c.unread_for(actor_id))
            .sum()
    }

    /// Conversations the actor takes part in, most recently active first.
    /// Equal timestamps list the later-created conversation first.
    pub fn conversations_for(&self, actor_id: &ActorId) -> Vec<&Conversation> {
        let mut list: Vec<&Conversation> = self
            .conversations
            .iter()
            .rev()
            .filter(|c| c.is_participant(actor_id))
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        list
    }

    /// Messages in chronological order, visible to participants only.
    pub fn messages(
        &self,
        conversation_id: &ConversationId,
        reader: &ActorId,
    ) -> Result<&[Message], ChatError> {
        let conversation = self
            .get(conversation_id)
            .ok_or(ChatError::ConversationNotFound)?;
        if !conversation.is_participant(reader) {
            return Err(ChatError::NotAParticipant);
        }
        Ok(&conversation.messages)
    }
}
