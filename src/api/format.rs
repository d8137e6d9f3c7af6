use serde_json::{json, Map, Value};

use crate::grams::controller::Page;
use crate::grams::model::Gram;
use crate::grams::store::GramPage;

/// Convert a gram into the public wire format
/// { id, type, attributes, relationships, meta, links }
pub fn gram_to_api_value(gram: &Gram) -> Value {
    json!({
        "id": gram.id,
        "type": "grams",
        "attributes": {
            "message": gram.message,
            "picture": {
                "url": gram.picture.url(),
                "filename": gram.picture.filename,
                "content_type": gram.picture.content_type,
                "size": gram.picture.size,
                "digest": gram.picture.digest,
            },
        },
        "relationships": {
            "user": { "data": { "type": "users", "id": gram.owner } }
        },
        "meta": {
            "created_at": gram.created_at.to_rfc3339(),
            "updated_at": gram.updated_at.to_rfc3339(),
        },
        "links": {
            "self": format!("/grams/{}", gram.id),
            "edit": format!("/grams/{}/edit", gram.id),
        }
    })
}

/// Convert a list of grams to API values
pub fn grams_to_api_values(grams: &[Gram]) -> Vec<Value> {
    grams.iter().map(gram_to_api_value).collect()
}

fn index_to_api_value(page: &GramPage) -> Value {
    let mut links = Map::new();
    links.insert("self".into(), Value::String(page_link(page.page, page.per_page)));
    if page.page > 1 {
        links.insert("prev".into(), Value::String(page_link(page.page - 1, page.per_page)));
    }
    if u64::from(page.page) * u64::from(page.per_page) < page.total {
        links.insert("next".into(), Value::String(page_link(page.page + 1, page.per_page)));
    }

    json!({
        "grams": grams_to_api_values(&page.grams),
        "page": page.page,
        "per_page": page.per_page,
        "total": page.total,
        "links": Value::Object(links),
    })
}

fn page_link(page: u32, per_page: u32) -> String {
    format!("/?page={}&per_page={}", page, per_page)
}

/// Data section for a rendered page
pub fn page_to_api_value(page: &Page) -> Value {
    match page {
        Page::Index(index) => index_to_api_value(index),
        Page::New(form) => json!({ "form": form, "action": "/grams", "method": "POST" }),
        Page::Show(gram) => json!({ "gram": gram_to_api_value(gram) }),
        Page::Edit { gram, form } => json!({
            "gram": gram_to_api_value(gram),
            "form": form,
            "action": format!("/grams/{}", gram.id),
            "method": "PATCH",
        }),
    }
}
