use gigline_types::models::{Actor, ActorId, Language};
use tracing::debug;

use crate::directory::ActorDirectory;
use crate::error::GateError;
use crate::role::classify;
use crate::session::Session;

/// Decides whether two actors may converse. Read-only.
pub struct ConversationGate<'a> {
    directory: &'a dyn ActorDirectory,
}

/// Outcome of a gate check in the shape the UI consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub allowed: bool,
    pub reason: Option<GateError>,
}

impl GateDecision {
    pub fn localized_reason(&self, lang: Language) -> Option<&'static str> {
        self.reason.map(|r| r.reason(lang))
    }
}

impl From<Result<(), GateError>> for GateDecision {
    fn from(result: Result<(), GateError>) -> Self {
        match result {
            Ok(()) => Self {
                allowed: true,
                reason: None,
            },
            Err(reason) => Self {
                allowed: false,
                reason: Some(reason),
            },
        }
    }
}

impl<'a> ConversationGate<'a> {
    pub fn new(directory: &'a dyn ActorDirectory) -> Self {
        Self { directory }
    }

    /// Rules are evaluated in order; the first failure wins.
    pub fn check(&self, initiator: Option<&Actor>, target_id: &ActorId) -> Result<(), GateError> {
        let initiator = initiator.ok_or(GateError::NotAuthenticated)?;

        if initiator.id == *target_id {
            return Err(GateError::SelfMessage);
        }

        let target = self
            .directory
            .lookup(target_id)
            .ok_or(GateError::UnknownTarget)?;

        let from = classify(initiator);
        let to = classify(&target);

        if from.is_customer_only() && to.is_customer_only() {
            debug!(initiator = %initiator.id, target = %target.id, "Customer-to-customer conversation blocked");
            return Err(GateError::CustomerToCustomerBlocked);
        }

        // TODO: reject provider-only targets that are unavailable once the booking
        // calendar exposes an availability signal. Until then this rule always passes.

        debug!(initiator = %initiator.id, ?from, target = %target.id, ?to, "Conversation allowed");
        Ok(())
    }

    pub fn decide(&self, session: &Session, target_id: &ActorId) -> GateDecision {
        self.check(session.actor.as_ref(), target_id).into()
    }
}
