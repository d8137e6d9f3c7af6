/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Controller actions exposed for grams.
/// Used by the request handler for logging and by views to identify themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Index,
    New,
    Show,
    Create,
    Edit,
    Update,
    Destroy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::New => "new",
            Action::Show => "show",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }

    /// Only the public listing may be reached without a principal
    pub fn requires_authentication(&self) -> bool {
        !matches!(self, Action::Index)
    }

    /// Actions that additionally require the principal to own the target gram
    pub fn requires_ownership(&self) -> bool {
        matches!(self, Action::Edit | Action::Update | Action::Destroy)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Views a successful render can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[serde(rename = "grams/index")]
    GramsIndex,
    #[serde(rename = "grams/new")]
    GramsNew,
    #[serde(rename = "grams/show")]
    GramsShow,
    #[serde(rename = "grams/edit")]
    GramsEdit,
    #[serde(rename = "users/sessions/new")]
    SignIn,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::GramsIndex => "grams/index",
            View::GramsNew => "grams/new",
            View::GramsShow => "grams/show",
            View::GramsEdit => "grams/edit",
            View::SignIn => "users/sessions/new",
        }
    }
}

/// Well-known redirect targets
pub mod paths {
    pub const ROOT: &str = "/";
    pub const SIGN_IN: &str = "/users/sign_in";
}
