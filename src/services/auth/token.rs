/*
 * Responsibility
 * - Bearer トークン (HS256 JWT) の署名検証 → claims の期限チェック → Identity への変換
 * - jsonwebtoken のエラーを AuthError (InvalidSignature / InvalidClaims) に振り分ける
 * - 認可 (Policy) は Guard 側で行う
 */
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};

use crate::api::v1::extractors::identity::Identity;
use crate::config::{Config, SigningSecret};
use crate::error::AuthError;

/// HS256 access-token verifier built once at startup.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Verifier with no issuer/audience requirements and zero leeway.
    pub fn new(secret: &SigningSecret) -> Self {
        Self::with_options(secret, 0, None, None)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_options(
            &config.jwt_secret,
            config.jwt_leeway_seconds,
            config.jwt_issuer.as_deref(),
            config.jwt_audience.as_deref(),
        )
    }

    pub fn with_options(
        secret: &SigningSecret,
        leeway_seconds: u64,
        issuer: Option<&str>,
        audience: Option<&str>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp / nbf are checked only when the token carries them
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;

        let mut required: Vec<&str> = Vec::new();
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
            required.push("iss");
        }
        match audience {
            Some(aud) => {
                validation.set_audience(&[aud]);
                required.push("aud");
            }
            // A token carrying `aud` would otherwise be rejected when no audience is configured.
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify the signature, validate the claim set and decode the caller.
    ///
    /// jsonwebtoken checks the signature before it looks at the claims, so a
    /// forged token is always `InvalidSignature`, never `InvalidClaims`.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = jsonwebtoken::decode::<Identity>(token, &self.decoding_key, &self.validation)
            .map_err(|err| self.classify(token, err))?;

        let identity = data.claims;
        if identity.subject_id.is_empty() || identity.provider.is_empty() {
            tracing::warn!(
                subject_id = %identity.subject_id,
                provider = %identity.provider,
                "verified token without a complete subject/provider pair"
            );
        }

        Ok(identity)
    }

    fn classify(&self, token: &str, err: jsonwebtoken::errors::Error) -> AuthError {
        match err.kind() {
            ErrorKind::ExpiredSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Json(_) => AuthError::InvalidClaims(err.to_string()),
            // header and payload share these kinds; only a payload behind a good signature is a claims error
            ErrorKind::Base64(_) | ErrorKind::Utf8(_) if self.is_signed_payload(token) => {
                AuthError::InvalidClaims(err.to_string())
            }
            _ => AuthError::InvalidSignature,
        }
    }

    fn is_signed_payload(&self, token: &str) -> bool {
        if jsonwebtoken::decode_header(token).is_err() {
            return false;
        }
        let Some((message, signature)) = token.rsplit_once('.') else {
            return false;
        };

        jsonwebtoken::crypto::verify(
            signature,
            message.as_bytes(),
            &self.decoding_key,
            Algorithm::HS256,
        )
        .unwrap_or(false)
    }
}
