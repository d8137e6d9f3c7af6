pub mod controller;
pub mod error;
pub mod model;
pub mod policy;
pub mod store;
pub mod validation;

pub use controller::{GramController, Outcome, Page};
pub use error::GramError;
pub use model::{Gram, GramChanges, GramId, NewGram, Picture, UserId};
pub use store::{GramPage, GramStore, MemoryGramStore, PageRequest, StoreError};
pub use validation::{FieldErrors, GramForm, GramParams, PictureRules};
