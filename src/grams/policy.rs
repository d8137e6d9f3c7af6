use crate::grams::error::GramError;
use crate::grams::model::{Gram, UserId};
use crate::types::Action;

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Only the owner may modify a gram
pub fn decide(principal: &UserId, gram: &Gram) -> Decision {
    if gram.is_owned_by(principal) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Turn an absent principal into `Unauthenticated`
pub fn require_user(principal: Option<UserId>, action: Action) -> Result<UserId, GramError> {
    debug_assert!(action.requires_authentication());
    principal.ok_or_else(|| {
        tracing::debug!("anonymous {} sent to sign in", action);
        GramError::Unauthenticated
    })
}

pub fn authorize(principal: &UserId, gram: &Gram) -> Result<(), GramError> {
    match decide(principal, gram) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::warn!("user {} denied access to gram {} owned by {}", principal, gram.id, gram.owner);
            Err(GramError::Forbidden { gram: gram.id, user: *principal })
        }
    }
}
