//! Explicit payload validation for create and update.
//!
//! Validation never touches a store: it turns submitted [`GramParams`] into a
//! typed input or a [`Rejection`] carrying field errors and the submitted
//! values so the form can be re-rendered as the user left it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::grams::model::{Gram, GramId};
use crate::pictures::PictureUpload;

/// Content types accepted for picture attachments
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Raw submitted payload for create/update
#[derive(Debug, Clone, Default)]
pub struct GramParams {
    pub message: Option<String>,
    pub picture: Option<PictureUpload>,
    /// Problems found while decoding the request body
    pub payload_errors: Vec<String>,
}

impl GramParams {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn picture(mut self, upload: PictureUpload) -> Self {
        self.picture = Some(upload);
        self
    }
}

/// Form values echoed back to the client
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GramForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<GramId>,
    pub message: Option<String>,
    /// File name of the submitted or current picture
    pub picture: Option<String>,
}

impl GramForm {
    fn from_params(params: &GramParams, id: Option<GramId>) -> Self {
        Self {
            id,
            message: params.message.clone(),
            picture: params.picture.as_ref().map(|p| p.filename.clone()),
        }
    }
}

impl From<&Gram> for GramForm {
    fn from(gram: &Gram) -> Self {
        Self {
            id: Some(gram.id),
            message: Some(gram.message.clone()),
            picture: Some(gram.picture.filename.clone()),
        }
    }
}

/// Field name → messages, ordered by field for stable output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// "message can't be blank" style sentences
    pub fn full_messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{} {}", field, m)))
            .collect()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

/// Limits applied to picture uploads
#[derive(Debug, Clone, Copy)]
pub struct PictureRules {
    pub max_bytes: usize,
}

impl Default for PictureRules {
    fn default() -> Self {
        Self { max_bytes: 10 * 1024 * 1024 }
    }
}

/// Validated create input
#[derive(Debug)]
pub struct CreateInput {
    pub message: String,
    pub picture: PictureUpload,
}

/// Validated update input
#[derive(Debug)]
pub struct UpdateInput {
    pub message: String,
    pub picture: Option<PictureUpload>,
}

/// Failed validation with the values to re-render
#[derive(Debug, Clone)]
pub struct Rejection {
    pub errors: FieldErrors,
    pub form: GramForm,
}

pub fn validate_create(params: GramParams, rules: &PictureRules) -> Result<CreateInput, Rejection> {
    let mut errors = check_common(&params, rules);
    if params.picture.is_none() {
        errors.add("picture", "can't be blank");
    }

    match (params.message, params.picture) {
        (Some(message), Some(picture)) if errors.is_empty() => Ok(CreateInput { message, picture }),
        (message, picture) => Err(Rejection {
            form: GramForm::from_params(
                &GramParams { message, picture, payload_errors: Vec::new() },
                None,
            ),
            errors,
        }),
    }
}

pub fn validate_update(
    id: GramId,
    params: GramParams,
    rules: &PictureRules,
) -> Result<UpdateInput, Rejection> {
    let errors = check_common(&params, rules);

    match params.message {
        Some(message) if errors.is_empty() => Ok(UpdateInput { message, picture: params.picture }),
        message => Err(Rejection {
            form: GramForm::from_params(
                &GramParams { message, picture: params.picture, payload_errors: Vec::new() },
                Some(id),
            ),
            errors,
        }),
    }
}

fn check_common(params: &GramParams, rules: &PictureRules) -> FieldErrors {
    let mut errors = FieldErrors::default();

    for problem in &params.payload_errors {
        errors.add("base", problem.clone());
    }

    match params.message.as_deref() {
        Some(message) if !message.trim().is_empty() => {}
        _ => errors.add("message", "can't be blank"),
    }

    if let Some(picture) = &params.picture {
        check_picture(picture, rules, &mut errors);
    }

    errors
}

fn check_picture(picture: &PictureUpload, rules: &PictureRules, errors: &mut FieldErrors) {
    if picture.bytes.is_empty() {
        errors.add("picture", "can't be empty");
    }
    if picture.bytes.len() > rules.max_bytes {
        errors.add("picture", format!("must be at most {} bytes", rules.max_bytes));
    }
    if !ALLOWED_CONTENT_TYPES.contains(&picture.content_type.as_str()) {
        errors.add(
            "picture",
            format!("must be one of {}", ALLOWED_CONTENT_TYPES.join(", ")),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> PictureUpload {
        PictureUpload::new("picture.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn create_accepts_message_and_picture() {
        let params = GramParams::with_message("Hello!").picture(png());
        let input = validate_create(params, &PictureRules::default()).unwrap();
        assert_eq!(input.message, "Hello!");
        assert_eq!(input.picture.filename, "picture.png");
    }

    #[test]
    fn whitespace_message_is_blank() {
        let rejection = validate_create(GramParams::with_message(" "), &PictureRules::default()).unwrap_err();
        assert_eq!(rejection.errors.get("message"), ["can't be blank"]);
        // submitted value is preserved for the re-render
        assert_eq!(rejection.form.message.as_deref(), Some(" "));
    }

    #[test]
    fn create_requires_picture() {
        let rejection = validate_create(GramParams::with_message("Hello!"), &PictureRules::default()).unwrap_err();
        assert!(rejection.errors.contains("picture"));
        assert!(!rejection.errors.contains("message"));
    }

    #[test]
    fn update_allows_missing_picture() {
        let id = GramId::new();
        let input = validate_update(id, GramParams::with_message("changed"), &PictureRules::default()).unwrap();
        assert_eq!(input.message, "changed");
        assert!(input.picture.is_none());
    }

    #[test]
    fn update_rejection_keeps_identifier() {
        let id = GramId::new();
        let rejection = validate_update(id, GramParams::default(), &PictureRules::default()).unwrap_err();
        assert_eq!(rejection.form.id, Some(id));
        assert_eq!(rejection.errors.full_messages(), vec!["message can't be blank".to_string()]);
    }

    #[test]
    fn picture_rules_are_enforced() {
        let rules = PictureRules { max_bytes: 2 };
        let params = GramParams::with_message("hi")
            .picture(PictureUpload::new("doc.pdf", "application/pdf", vec![1, 2, 3]));
        let rejection = validate_create(params, &rules).unwrap_err();
        assert_eq!(rejection.errors.get("picture").len(), 2);
    }

    #[test]
    fn payload_errors_surface_on_base() {
        let mut params = GramParams::with_message("hi").picture(png());
        params.payload_errors.push("could not be decoded".to_string());
        let rejection = validate_create(params, &PictureRules::default()).unwrap_err();
        assert_eq!(rejection.errors.get("base"), ["could not be decoded"]);
    }
}
