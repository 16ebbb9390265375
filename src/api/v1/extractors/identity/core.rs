use axum::extract::FromRequestParts;
use axum::http::{Extensions, Request, request::Parts};

use crate::error::AuthError;

use super::Identity;

/// request extensions 上の格納キー
/// crate 外からは生成も取得もできないので、他の middleware と衝突しない
#[derive(Clone)]
struct VerifiedIdentity(Identity);

/// Guard が検証済みの Identity を extensions に載せる
pub(crate) fn attach(extensions: &mut Extensions, identity: Identity) {
    extensions.insert(VerifiedIdentity(identity));
}

fn lookup(extensions: &Extensions) -> Result<&Identity, AuthError> {
    extensions
        .get::<VerifiedIdentity>()
        .map(|v| &v.0)
        .ok_or(AuthError::IdentityNotFound)
}

/// Returns the identity a [`Guard`](crate::Guard) attached to this request.
///
/// Fails with [`AuthError::IdentityNotFound`] when the request never went
/// through a guard; a zero-valued identity is never returned.
pub fn extract_identity<B>(req: &Request<B>) -> Result<Identity, AuthError> {
    lookup(req.extensions()).cloned()
}

/// Handler で Identity を受け取るための extractor
/// Guard が Identity を extensions に insert 済みである前提
/// 見つからない場合は 401 を返す（Guard 未設定のルート）
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        lookup(&parts.extensions).cloned().map(CurrentIdentity)
    }
}
