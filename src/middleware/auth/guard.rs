//! Bearer token 検証 → Policy 判定 → Identity を extensions に入れる
//!
//! Pipeline (fail-fast, 最初の失敗で 401):
//! 1. `Authorization` ヘッダの有無
//! 2. `<scheme> <token>` の形 (scheme 自体は検証しない)
//! 3. 署名検証
//! 4. claims の期限チェック (exp / nbf)
//! 5. claims → Identity
//! 6. Policy 判定 (設定されている場合のみ)
//! 7. Identity を extensions に格納して次の handler へ

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{self, HeaderMap, HeaderValue, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::identity::{self, Identity};
use crate::error::AuthError;
use crate::services::auth::{Policy, TokenVerifier};

/// How a rejected request is rendered. Either way the status is 401.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RejectionFormat {
    /// `application/json` body `{"message": "<reason>"}`.
    #[default]
    Json,
    /// `text/plain` body carrying the bare reason.
    PlainText,
}

impl RejectionFormat {
    pub fn render(self, err: &AuthError) -> Response {
        match self {
            RejectionFormat::Json => err.clone().into_response(),
            RejectionFormat::PlainText => (
                err.status(),
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("text/plain; charset=utf-8"),
                    ),
                    (
                        header::X_CONTENT_TYPE_OPTIONS,
                        HeaderValue::from_static("nosniff"),
                    ),
                ],
                format!("{err}\n"),
            )
                .into_response(),
        }
    }
}

/// Authentication gate for a group of routes.
///
/// Cheap to clone; the verifier and policy are shared read-only.
///
/// ```ignore
/// let reports = Router::new().route("/reports", get(list_reports));
/// let reports = Guard::new(verifier.clone())
///     .with_policy(Policy::new().with_groups(["admin"]).with_permissions(["reports:read"]))
///     .apply(reports);
/// ```
#[derive(Debug, Clone)]
pub struct Guard {
    verifier: Arc<TokenVerifier>,
    policy: Option<Arc<Policy>>,
    rejection: RejectionFormat,
}

impl Guard {
    /// Any caller with a valid token passes until a policy is attached.
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self {
            verifier,
            policy: None,
            rejection: RejectionFormat::default(),
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }

    pub fn with_rejection_format(mut self, format: RejectionFormat) -> Self {
        self.rejection = format;
        self
    }

    /// Runs the verification pipeline against request headers without
    /// forwarding anything.
    pub fn check(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = bearer_token(headers).inspect_err(|err| {
            tracing::debug!(error = %err, "rejecting request without usable credentials");
        })?;

        let identity = self.verifier.verify(token).inspect_err(|err| {
            tracing::warn!(error = ?err, "access token verification failed");
        })?;

        if let Some(policy) = self.policy.as_deref() {
            if !policy.is_satisfied_by(&identity) {
                tracing::warn!(
                    subject_id = %identity.subject_id,
                    provider = %identity.provider,
                    group = %identity.group,
                    "access policy denied request"
                );
                return Err(AuthError::InsufficientAccess);
            }
        }

        Ok(identity)
    }

    /// Verifies the request and attaches the identity to its extensions.
    ///
    /// For callers that gate a request themselves and read the identity
    /// back later with [`extract_identity`](crate::extract_identity).
    pub fn authorize<B>(&self, req: &mut http::Request<B>) -> Result<(), AuthError> {
        let identity = self.check(req.headers())?;

        tracing::debug!(
            subject_id = %identity.subject_id,
            provider = %identity.provider,
            "request authorized"
        );

        // middleware → extractor への受け渡し
        identity::attach(req.extensions_mut(), identity);
        Ok(())
    }

    /// Puts every route already registered on `router` behind this guard.
    ///
    /// Uses `route_layer`, so unmatched paths still answer 404 rather than
    /// 401. Add the routes first; axum panics on a `route_layer` over an
    /// empty router.
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(self, guard_middleware))
    }
}

async fn guard_middleware(State(guard): State<Guard>, mut req: Request, next: Next) -> Response {
    if let Err(err) = guard.authorize(&mut req) {
        return guard.rejection.render(&err);
    }

    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingCredential)?;

    // exactly "<scheme> <token>", split on a single space; the scheme bytes are not inspected
    let mut parts = value.as_bytes().split(|b| *b == b' ');
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => token,
        _ => return Err(AuthError::MalformedCredential),
    };

    std::str::from_utf8(token).map_err(|_| AuthError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &'static [u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(value).unwrap(),
        );
        headers
    }

    #[test]
    fn missing_or_empty_header() {
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        );
        assert_eq!(
            bearer_token(&headers_with(b"")),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn header_must_have_exactly_two_parts() {
        for value in [
            &b"Bearer"[..],
            &b"Bearer a b"[..],
            &b"Bearer  token"[..],
            &b"Bearer token "[..],
        ] {
            let headers = headers_with(value);
            assert_eq!(
                bearer_token(&headers),
                Err(AuthError::MalformedCredential),
                "{:?}",
                String::from_utf8_lossy(value)
            );
        }
    }

    #[test]
    fn scheme_is_not_validated() {
        assert_eq!(bearer_token(&headers_with(b"Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with(b"Token xyz")), Ok("xyz"));
        assert_eq!(bearer_token(&headers_with(b"Bearer ")), Ok(""));
    }

    #[test]
    fn non_ascii_scheme_is_accepted() {
        assert_eq!(
            bearer_token(&headers_with("Bearér abc.def.ghi".as_bytes())),
            Ok("abc.def.ghi")
        );
        assert_eq!(
            bearer_token(&headers_with(b"\xff\xfe abc.def.ghi")),
            Ok("abc.def.ghi")
        );
    }

    #[test]
    fn non_utf8_token_is_an_invalid_jwt() {
        assert_eq!(
            bearer_token(&headers_with(b"Bearer \xfftoken")),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn plain_text_rejection() {
        let res = RejectionFormat::PlainText.render(&AuthError::InvalidSignature);
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
