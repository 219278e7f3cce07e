use gigline_types::models::Language;

/// Why the gate refused a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("initiator is not authenticated")]
    NotAuthenticated,

    #[error("cannot start a conversation with yourself")]
    SelfMessage,

    #[error("target actor does not exist")]
    UnknownTarget,

    #[error("customers may not message other customers")]
    CustomerToCustomerBlocked,
}

impl GateError {
    pub fn code(self) -> &'static str {
        match self {
            GateError::NotAuthenticated => "not_authenticated",
            GateError::SelfMessage => "self_message",
            GateError::UnknownTarget => "unknown_target",
            GateError::CustomerToCustomerBlocked => "customer_to_customer_blocked",
        }
    }

    pub fn reason(self, lang: Language) -> &'static str {
        match (self, lang) {
            (GateError::NotAuthenticated, lang) => not_authenticated(lang),
            (GateError::SelfMessage, Language::En) => "You cannot message yourself.",
            (GateError::SelfMessage, Language::Ru) => "Нельзя написать самому себе.",
            (GateError::SelfMessage, Language::Et) => "Iseendale ei saa sõnumit saata.",
            (GateError::UnknownTarget, Language::En) => "This user could not be found.",
            (GateError::UnknownTarget, Language::Ru) => "Пользователь не найден.",
            (GateError::UnknownTarget, Language::Et) => "Kasutajat ei leitud.",
            (GateError::CustomerToCustomerBlocked, Language::En) => {
                "Customers can only message service providers."
            }
            (GateError::CustomerToCustomerBlocked, Language::Ru) => {
                "Заказчики могут писать только исполнителям."
            }
            (GateError::CustomerToCustomerBlocked, Language::Et) => {
                "Kliendid saavad sõnumeid saata ainult teenusepakkujatele."
            }
        }
    }
}

/// Failures of the conversation store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("conversation rejected: {0}")]
    GateRejected(#[from] GateError),

    #[error("sender is not authenticated")]
    NotAuthenticated,

    #[error("message body is empty")]
    EmptyBody,

    #[error("conversation not found")]
    ConversationNotFound,

    #[error("actor is not a participant in this conversation")]
    NotAParticipant,
}

impl ChatError {
    pub fn code(self) -> &'static str {
        match self {
            ChatError::GateRejected(inner) => inner.code(),
            ChatError::NotAuthenticated => "not_authenticated",
            ChatError::EmptyBody => "empty_body",
            ChatError::ConversationNotFound => "conversation_not_found",
            ChatError::NotAParticipant => "not_a_participant",
        }
    }

    /// User-facing text. A gate rejection carries the gate's own reason.
    pub fn reason(self, lang: Language) -> &'static str {
        match (self, lang) {
            (ChatError::GateRejected(inner), lang) => inner.reason(lang),
            (ChatError::NotAuthenticated, lang) => not_authenticated(lang),
            (ChatError::EmptyBody, Language::En) => "Message cannot be empty.",
            (ChatError::EmptyBody, Language::Ru) => "Сообщение не может быть пустым.",
            (ChatError::EmptyBody, Language::Et) => "Sõnum ei tohi olla tühi.",
            (ChatError::ConversationNotFound, Language::En) => "Conversation not found.",
            (ChatError::ConversationNotFound, Language::Ru) => "Диалог не найден.",
            (ChatError::ConversationNotFound, Language::Et) => "Vestlust ei leitud.",
            (ChatError::NotAParticipant, Language::En) => {
                "You are not a participant in this conversation."
            }
            (ChatError::NotAParticipant, Language::Ru) => "Вы не участник этого диалога.",
            (ChatError::NotAParticipant, Language::Et) => "Te ei osale selles vestluses.",
        }
    }
}

fn not_authenticated(lang: Language) -> &'static str {
    match lang {
        Language::En => "Please sign in to send messages.",
        Language::Ru => "Войдите, чтобы отправлять сообщения.",
        Language::Et => "Sõnumite saatmiseks logige sisse.",
    }
}
