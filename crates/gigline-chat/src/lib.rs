//! Messaging rules for the marketplace: who may talk to whom, and the
//! per-session conversation store the UI layer reads and appends to.
//!
//! Flow: caller -> [`role::classify`] for both parties -> [`gate::ConversationGate`]
//! -> on approval, [`store::ConversationStore`] mutation.

pub mod directory;
pub mod error;
pub mod gate;
pub mod role;
pub mod session;
pub mod store;

pub use directory::{ActorDirectory, InMemoryDirectory};
pub use error::{ChatError, GateError};
pub use gate::{ConversationGate, GateDecision};
pub use role::{Role, classify};
pub use session::Session;
pub use store::ConversationStore;
