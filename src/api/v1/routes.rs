/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/me と /admin は Guard の内側
 * - ルートごとの Policy はここで一度だけ組み立てる
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{admin::admin_overview, health::health, me::me};
use crate::middleware::auth::guard::Guard;
use crate::services::auth::Policy;
use crate::state::AppState;

pub(crate) const ADMIN_GROUP: &str = "admin";
pub(crate) const ADMIN_PERMISSION: &str = "admin:access";

pub fn routes(state: &AppState) -> Router<AppState> {
    let authenticated: Router<AppState> =
        Guard::new(state.verifier.clone()).apply(Router::new().route("/me", get(me)));

    let admin: Router<AppState> = Guard::new(state.verifier.clone())
        .with_policy(
            Policy::new()
                .with_groups([ADMIN_GROUP])
                .with_permissions([ADMIN_PERMISSION]),
        )
        .apply(Router::new().route("/admin", get(admin_overview)));

    Router::new()
        .route("/health", get(health))
        .merge(authenticated)
        .merge(admin)
}
