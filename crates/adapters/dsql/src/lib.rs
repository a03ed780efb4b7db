//! adapter-dsql - Aurora DSQL authentication adapter
//!
//! Generates short-lived IAM authentication tokens that are used in place of a
//! static database password:
//! - Admin tokens (`DbConnectAdmin`) for the `admin` role
//! - Regular tokens (`DbConnect`) for any other role
//! - Automatic error mapping to AppError

pub mod client;
pub mod config;
pub mod error;

pub use client::{AuthToken, AuthTokenProvider, DsqlTokenGenerator, TokenKind, TokenRequest};
pub use config::{DsqlAuthConfig, DsqlAuthConfigBuilder};
