/*
 * Responsibility
 * - GET /me
 * - Guard が載せた Identity をそのまま返す (認証済みなら誰でも可)
 */
use axum::Json;

use crate::api::v1::extractors::identity::{CurrentIdentity, Identity};

pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<Identity> {
    Json(identity)
}
