use thiserror::Error;

use crate::grams::model::{GramId, UserId};
use crate::grams::store::StoreError;
use crate::grams::validation::{FieldErrors, GramForm, Rejection};
use crate::pictures::PictureError;
use crate::types::View;

/// Terminal outcomes of a gram action other than success
#[derive(Debug, Error)]
pub enum GramError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("gram {0} not found")]
    NotFound(String),

    #[error("user {user} may not modify gram {gram}")]
    Forbidden { gram: GramId, user: UserId },

    #[error("gram is invalid: {errors}")]
    Invalid {
        view: View,
        errors: FieldErrors,
        form: GramForm,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Picture(#[from] PictureError),
}

impl GramError {
    pub fn invalid(view: View, rejection: Rejection) -> Self {
        GramError::Invalid {
            view,
            errors: rejection.errors,
            form: rejection.form,
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        GramError::NotFound(id.into())
    }
}
