use gigline_types::models::{Actor, ActorId, Language};

/// Explicit per-call context: who is acting, and in which language
/// user-facing reasons should be rendered.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub actor: Option<Actor>,
    pub language: Language,
}

impl Session {
    pub fn anonymous(language: Language) -> Self {
        Self {
            actor: None,
            language,
        }
    }

    pub fn signed_in(actor: Actor, language: Language) -> Self {
        Self {
            actor: Some(actor),
            language,
        }
    }

    pub fn actor_id(&self) -> Option<ActorId> {
        self.actor.as_ref().map(|a| a.id)
    }
}
