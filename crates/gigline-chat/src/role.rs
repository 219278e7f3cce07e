use gigline_types::models::{Actor, RoleFlags};

/// Normalized role. Computed once per actor; nothing else branches on raw flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// No role selected yet. Role-gated actions must be blocked by the caller.
    Unassigned,
    Customer,
    Provider,
    Dual,
}

impl Role {
    pub fn is_customer(self) -> bool {
        matches!(self, Role::Customer | Role::Dual)
    }

    pub fn is_provider(self) -> bool {
        matches!(self, Role::Provider | Role::Dual)
    }

    pub fn is_customer_only(self) -> bool {
        self == Role::Customer
    }
}

impl From<RoleFlags> for Role {
    fn from(flags: RoleFlags) -> Self {
        match (flags.is_client, flags.is_freelance) {
            (true, true) => Role::Dual,
            (true, false) => Role::Customer,
            (false, true) => Role::Provider,
            (false, false) => Role::Unassigned,
        }
    }
}

/// Derive `(is_customer, is_provider)` for an actor from its normalized flags.
///
/// The legacy `accountType` was folded in when the record entered the
/// directory and only counts for records without flags. Where a record
/// carries both and they disagree, the flags decide: a client-flagged record
/// with `accountType: provider` is a customer, not dual-role.
pub fn classify(actor: &Actor) -> Role {
    Role::from(actor.roles)
}
