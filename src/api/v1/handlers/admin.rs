/*
 * Responsibility
 * - GET /admin
 * - admin グループ、または admin:access 権限を持つ呼び出し元のみ (routes 側の Policy)
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::identity::CurrentIdentity;
use crate::api::v1::routes::ADMIN_GROUP;

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub subject_id: String,
    pub provider: String,
    pub group: String,
    pub via_permission: bool,
}

pub async fn admin_overview(CurrentIdentity(identity): CurrentIdentity) -> Json<AdminOverview> {
    let via_permission = !identity.is_in_group(&[ADMIN_GROUP]);

    Json(AdminOverview {
        subject_id: identity.subject_id,
        provider: identity.provider,
        group: identity.group,
        via_permission,
    })
}
