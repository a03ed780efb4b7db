//! DSQL token generator implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_dsql::auth_token::{AuthTokenGenerator, Config as TokenConfig};
use chrono::{DateTime, Utc};
use errors::{AppError, AppResult};
use secrecy::{ExposeSecret, Secret};
use tracing::{debug, info};

use crate::config::{DsqlAuthConfig, MAX_EXPIRES_IN_SECS};
use crate::error::map_sdk_error;

/// Kind of token to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `DbConnectAdmin`, for the `admin` role
    Admin,
    /// `DbConnect`, for custom roles
    Regular,
}

/// Parameters of a single token request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub hostname: String,
    pub region: String,
    pub expires_in: Duration,
    pub kind: TokenKind,
}

/// A generated token, used as the database password
#[derive(Clone)]
pub struct AuthToken {
    value: Secret<String>,
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Wrap a token issued now and valid for `expires_in`
    pub fn new(value: impl Into<String>, expires_in: Duration) -> Self {
        let ttl = chrono::Duration::from_std(expires_in).unwrap_or(chrono::Duration::zero());
        Self {
            value: Secret::new(value.into()),
            expires_at: Utc::now() + ttl,
        }
    }

    /// Token value
    pub fn secret(&self) -> &Secret<String> {
        &self.value
    }

    /// Expiry instant
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token has already expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token provider trait for abstraction
#[async_trait]
pub trait AuthTokenProvider: Send + Sync {
    /// Generate a token for the given request
    async fn generate_token(&self, request: &TokenRequest) -> AppResult<AuthToken>;
}

/// Token generator backed by the AWS SDK
///
/// Signing happens locally with the credentials of the configured profile;
/// no network call is made to DSQL itself.
pub struct DsqlTokenGenerator {
    sdk_config: SdkConfig,
}

impl DsqlTokenGenerator {
    /// Load AWS credentials for the configured profile and region
    pub async fn new(config: &DsqlAuthConfig) -> Self {
        info!(
            profile = %config.profile,
            region = %config.region,
            "Loading AWS credentials"
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&config.profile)
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self { sdk_config }
    }

    /// Create from an already loaded SDK configuration
    pub fn from_sdk_config(sdk_config: SdkConfig) -> Self {
        Self { sdk_config }
    }
}

#[async_trait]
impl AuthTokenProvider for DsqlTokenGenerator {
    async fn generate_token(&self, request: &TokenRequest) -> AppResult<AuthToken> {
        if request.hostname.is_empty() {
            return Err(AppError::config("DSQL hostname is empty"));
        }
        let expires_in_secs = request.expires_in.as_secs();
        if expires_in_secs == 0 || expires_in_secs > MAX_EXPIRES_IN_SECS {
            return Err(AppError::config(format!(
                "DSQL token lifetime must be within 1..={} seconds, got {}",
                MAX_EXPIRES_IN_SECS, expires_in_secs
            )));
        }

        debug!(
            hostname = %request.hostname,
            kind = ?request.kind,
            expires_in_secs,
            "Generating DSQL auth token"
        );

        let token_config = TokenConfig::builder()
            .hostname(request.hostname.clone())
            .region(Region::new(request.region.clone()))
            .expires_in(expires_in_secs)
            .build()
            .map_err(|e| map_sdk_error(e, "Failed to build token generator config"))?;

        let generator = AuthTokenGenerator::new(token_config);
        let token = match request.kind {
            TokenKind::Admin => generator.db_connect_admin_auth_token(&self.sdk_config).await,
            TokenKind::Regular => generator.db_connect_auth_token(&self.sdk_config).await,
        }
        .map_err(|e| map_sdk_error(e, "Failed to generate DSQL auth token"))?;

        let token = AuthToken::new(token.to_string(), request.expires_in);
        info!(
            hostname = %request.hostname,
            expires_at = %token.expires_at(),
            "DSQL auth token generated"
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DsqlAuthConfigBuilder;

    fn test_sdk_config() -> SdkConfig {
        SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build()
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new(
            "host/?Action=DbConnectAdmin&X-Amz-Signature=abc",
            Duration::from_secs(60),
        );
        let debug_output = format!("{:?}", token);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("X-Amz-Signature"));
    }

    #[test]
    fn test_token_expiry() {
        let token = AuthToken::new("t", Duration::from_secs(3600));
        assert!(!token.is_expired());
        assert!(token.expires_at() > Utc::now());

        let expired = AuthToken::new("t", Duration::ZERO);
        assert!(expired.is_expired());
    }

    #[tokio::test]
    async fn test_empty_hostname_is_rejected() {
        let generator = DsqlTokenGenerator::from_sdk_config(test_sdk_config());
        let request = DsqlAuthConfigBuilder::new("").build().token_request();

        let result = generator.generate_token(&request).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_rejected() {
        let generator = DsqlTokenGenerator::from_sdk_config(test_sdk_config());

        for secs in [0, MAX_EXPIRES_IN_SECS + 1] {
            let request = DsqlAuthConfigBuilder::new("abc.dsql.us-east-1.on.aws")
                .with_expires_in(secs)
                .build()
                .token_request();

            let result = generator.generate_token(&request).await;
            assert!(matches!(result, Err(AppError::Config(_))), "expires_in {}", secs);
        }
    }

    #[tokio::test]
    #[ignore] // Requires AWS credentials for the default profile
    async fn test_generate_admin_token() {
        let host = std::env::var("DSQL_HOST").expect("DSQL_HOST not set");
        let config = DsqlAuthConfigBuilder::new(host).with_expires_in(900).build();

        let generator = DsqlTokenGenerator::new(&config).await;
        let token = generator.generate_token(&config.token_request()).await.unwrap();
        assert!(!token.is_empty());
        assert!(token.secret().expose_secret().contains("DbConnectAdmin"));
    }
}
