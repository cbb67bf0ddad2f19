use async_trait::async_trait;

use assumers_schema::credentials::Credentials;

use crate::profile::ProfileDescriptor;

pub mod aws_sdk;

/// Base credential material for a profile, before any region is attached.
/// Implementations wrap whatever mechanism the profile needs (static keys,
/// role chains, SSO token cache, credential_process).
#[async_trait]
pub trait RetrieveCredentials: Send + Sync {
    async fn retrieve_credentials(
        &self,
        profile: &ProfileDescriptor,
        mfa_token: Option<&str>,
    ) -> anyhow::Result<Credentials>;
}
