//! DSQL authentication configuration

use std::time::Duration;

use crate::client::{TokenKind, TokenRequest};

/// Token generator configuration
#[derive(Debug, Clone)]
pub struct DsqlAuthConfig {
    /// Cluster endpoint, e.g. `xxxx.dsql.us-east-1.on.aws`
    pub hostname: String,

    /// AWS region of the cluster
    pub region: String,

    /// Shared-credentials profile used to sign the token
    pub profile: String,

    /// Database role the token is issued for
    pub username: String,

    /// Requested token lifetime in seconds
    pub expires_in_secs: u64,
}

/// Identity-service default lifetime (15 minutes)
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 900;

/// Longest lifetime the identity service accepts (one week)
pub const MAX_EXPIRES_IN_SECS: u64 = 604_800;

/// Role that requires an admin token
pub const ADMIN_ROLE: &str = "admin";

impl Default for DsqlAuthConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            region: "us-east-1".to_string(),
            profile: "default".to_string(),
            username: ADMIN_ROLE.to_string(),
            expires_in_secs: DEFAULT_EXPIRES_IN_SECS,
        }
    }
}

impl DsqlAuthConfig {
    /// Token kind implied by the database role
    pub fn token_kind(&self) -> TokenKind {
        if self.username == ADMIN_ROLE {
            TokenKind::Admin
        } else {
            TokenKind::Regular
        }
    }

    /// Build the request sent to the identity service
    pub fn token_request(&self) -> TokenRequest {
        TokenRequest {
            hostname: self.hostname.clone(),
            region: self.region.clone(),
            expires_in: Duration::from_secs(self.expires_in_secs),
            kind: self.token_kind(),
        }
    }
}

/// Builder for DsqlAuthConfig
pub struct DsqlAuthConfigBuilder {
    config: DsqlAuthConfig,
}

impl DsqlAuthConfigBuilder {
    /// Create a new builder with the cluster endpoint
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            config: DsqlAuthConfig {
                hostname: hostname.into(),
                ..Default::default()
            },
        }
    }

    /// Set region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    /// Set credentials profile
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.config.profile = profile.into();
        self
    }

    /// Set database role
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    /// Set token lifetime
    pub fn with_expires_in(mut self, expires_in_secs: u64) -> Self {
        self.config.expires_in_secs = expires_in_secs;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DsqlAuthConfig {
        self.config
    }
}
