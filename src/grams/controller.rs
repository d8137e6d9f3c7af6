//! The gram resource request handler.
//!
//! Every action receives its principal explicitly and returns an [`Outcome`]
//! or a terminal [`GramError`]. For edit, update and destroy the checks run
//! in a fixed order: authentication, then existence, then ownership, so an
//! anonymous request for a missing gram is still sent to the login page.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::PaginationConfig;
use crate::grams::error::GramError;
use crate::grams::model::{Gram, GramChanges, GramId, NewGram, UserId};
use crate::grams::policy;
use crate::grams::store::{GramPage, GramStore, PageRequest};
use crate::grams::validation::{self, GramForm, GramParams, PictureRules};
use crate::pictures::PictureStore;
use crate::types::{paths, Action, View};

/// Successful response descriptor
#[derive(Debug, Clone)]
pub enum Outcome {
    Render(Page),
    Redirect { location: &'static str },
}

impl Outcome {
    fn to_root() -> Self {
        Outcome::Redirect { location: paths::ROOT }
    }
}

/// Data for a rendered view
#[derive(Debug, Clone)]
pub enum Page {
    Index(GramPage),
    New(GramForm),
    Show(Gram),
    Edit { gram: Gram, form: GramForm },
}

impl Page {
    pub fn view(&self) -> View {
        match self {
            Page::Index(_) => View::GramsIndex,
            Page::New(_) => View::GramsNew,
            Page::Show(_) => View::GramsShow,
            Page::Edit { .. } => View::GramsEdit,
        }
    }
}

pub struct GramController {
    grams: Arc<dyn GramStore>,
    pictures: Arc<dyn PictureStore>,
    rules: PictureRules,
    pagination: PaginationConfig,
}

impl GramController {
    pub fn new(
        grams: Arc<dyn GramStore>,
        pictures: Arc<dyn PictureStore>,
        rules: PictureRules,
        pagination: PaginationConfig,
    ) -> Self {
        Self { grams, pictures, rules, pagination }
    }

    /// GET / - public listing
    pub async fn index(&self, page: Option<u32>, per_page: Option<u32>) -> Result<Outcome, GramError> {
        let request = PageRequest::clamped(
            page,
            per_page,
            self.pagination.default_per_page,
            self.pagination.max_per_page,
        );
        let page = self.grams.list(request).await?;
        Ok(Outcome::Render(Page::Index(page)))
    }

    /// GET /grams/new
    pub async fn new_form(&self, principal: Option<UserId>) -> Result<Outcome, GramError> {
        policy::require_user(principal, Action::New)?;
        Ok(Outcome::Render(Page::New(GramForm::default())))
    }

    /// GET /grams/:id - any signed-in user may view any gram
    pub async fn show(&self, principal: Option<UserId>, id: &str) -> Result<Outcome, GramError> {
        policy::require_user(principal, Action::Show)?;
        let gram = self.load(id).await?;
        Ok(Outcome::Render(Page::Show(gram)))
    }

    /// POST /grams
    pub async fn create(&self, principal: Option<UserId>, params: GramParams) -> Result<Outcome, GramError> {
        let owner = policy::require_user(principal, Action::Create)?;
        let input = validation::validate_create(params, &self.rules)
            .map_err(|rejection| GramError::invalid(View::GramsNew, rejection))?;

        let picture = self.pictures.put(input.picture).await?;
        let new_gram = NewGram {
            message: input.message,
            picture: picture.clone(),
            owner,
        };

        match self.grams.create(new_gram).await {
            Ok(gram) => {
                info!("user {} created gram {}", owner, gram.id);
                Ok(Outcome::to_root())
            }
            Err(e) => {
                self.discard_picture(&picture.key).await;
                Err(e.into())
            }
        }
    }

    /// GET /grams/:id/edit
    pub async fn edit(&self, principal: Option<UserId>, id: &str) -> Result<Outcome, GramError> {
        let (_, gram) = self.load_owned(principal, id, Action::Edit).await?;
        let form = GramForm::from(&gram);
        Ok(Outcome::Render(Page::Edit { gram, form }))
    }

    /// PATCH /grams/:id
    pub async fn update(
        &self,
        principal: Option<UserId>,
        id: &str,
        params: GramParams,
    ) -> Result<Outcome, GramError> {
        let (user, gram) = self.load_owned(principal, id, Action::Update).await?;
        let input = validation::validate_update(gram.id, params, &self.rules)
            .map_err(|rejection| GramError::invalid(View::GramsEdit, rejection))?;

        let replacement = match input.picture {
            Some(upload) => Some(self.pictures.put(upload).await?),
            None => None,
        };
        let changes = GramChanges {
            message: input.message,
            picture: replacement.clone(),
        };

        match self.grams.update(gram.id, changes).await {
            Ok(Some(updated)) => {
                if replacement.is_some() && updated.picture.key != gram.picture.key {
                    self.discard_picture(&gram.picture.key).await;
                }
                info!("user {} updated gram {}", user, updated.id);
                Ok(Outcome::to_root())
            }
            // Destroyed between lookup and write
            Ok(None) => {
                if let Some(picture) = &replacement {
                    self.discard_picture(&picture.key).await;
                }
                Err(GramError::not_found(gram.id.to_string()))
            }
            Err(e) => {
                if let Some(picture) = &replacement {
                    self.discard_picture(&picture.key).await;
                }
                Err(e.into())
            }
        }
    }

    /// DELETE /grams/:id
    pub async fn destroy(&self, principal: Option<UserId>, id: &str) -> Result<Outcome, GramError> {
        let (user, gram) = self.load_owned(principal, id, Action::Destroy).await?;

        if !self.grams.delete(gram.id).await? {
            return Err(GramError::not_found(gram.id.to_string()));
        }
        self.discard_picture(&gram.picture.key).await;

        info!("user {} destroyed gram {}", user, gram.id);
        Ok(Outcome::to_root())
    }

    async fn load(&self, id: &str) -> Result<Gram, GramError> {
        let gram_id = GramId::parse(id).ok_or_else(|| GramError::not_found(id))?;
        self.grams
            .find(gram_id)
            .await?
            .ok_or_else(|| GramError::not_found(id))
    }

    /// Authentication, existence, ownership - in that order
    async fn load_owned(
        &self,
        principal: Option<UserId>,
        id: &str,
        action: Action,
    ) -> Result<(UserId, Gram), GramError> {
        debug_assert!(action.requires_ownership());
        let user = policy::require_user(principal, action)?;
        let gram = self.load(id).await?;
        policy::authorize(&user, &gram)?;
        tracing::debug!("user {} authorized to {} gram {}", user, action, gram.id);
        Ok((user, gram))
    }

    async fn discard_picture(&self, key: &str) {
        if let Err(e) = self.pictures.remove(key).await {
            warn!("failed to remove picture {}: {}", key, e);
        }
    }
}
