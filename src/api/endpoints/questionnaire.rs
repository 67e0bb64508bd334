//! `GET /api/questionnaire`: the form a client should render.

use axum::{Extension, Json};
use serde::Serialize;

use crate::api::types::SessionContext;
use crate::screening::features::{Feature, FieldKind, MAX_AGE, MIN_AGE};

#[derive(Serialize)]
pub struct QuestionnaireResponse {
    pub user: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Allowed answers; empty for age.
    pub options: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

pub async fn form(Extension(session): Extension<SessionContext>) -> Json<QuestionnaireResponse> {
    let fields = Feature::ALL
        .iter()
        .map(|&feature| {
            let is_age = feature.kind() == FieldKind::Age;
            FieldSpec {
                name: feature.name(),
                label: feature.label(),
                kind: feature.kind(),
                options: feature.options(),
                min: is_age.then_some(MIN_AGE),
                max: is_age.then_some(MAX_AGE),
            }
        })
        .collect();

    Json(QuestionnaireResponse {
        user: session.username,
        fields,
    })
}
