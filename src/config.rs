/*
 * Responsibility
 * - 環境変数の読み込み (PORT, JWT_SECRET, JWT_* など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 署名用シークレットはプロセス起動時に一度だけ読む
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Shortest `JWT_SECRET` the process accepts, in bytes.
pub const MIN_SECRET_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    TooShort { key: &'static str, min: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::TooShort { key, min } => {
                write!(f, "invalid configuration: {} must be at least {} characters", key, min)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Shared HMAC secret used to verify access tokens.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.len() < MIN_SECRET_LEN {
            return Err(ConfigError::TooShort {
                key: "JWT_SECRET",
                min: MIN_SECRET_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub jwt_secret: SigningSecret,
    pub jwt_leeway_seconds: u64,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    ///
    /// Call once before serving; an error here must stop the process.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))
            .and_then(|s| SigningSecret::new(s))?;

        let jwt_leeway_seconds = match lookup("JWT_LEEWAY_SECONDS") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("JWT_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let jwt_issuer = non_empty(lookup("JWT_ISSUER"));
        let jwt_audience = non_empty(lookup("JWT_AUDIENCE"));

        Ok(Self {
            addr,
            jwt_secret,
            jwt_leeway_seconds,
            jwt_issuer,
            jwt_audience,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
