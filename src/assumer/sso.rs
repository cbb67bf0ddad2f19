use async_trait::async_trait;

use assumers_schema::credentials::CredentialSet;

use crate::assumer::{resolve_region, retrieve_base, Assumer, ExtraArgs, Providers};
use crate::context::ResolveContext;
use crate::error::{AssumeError, Operation};
use crate::profile::{NormalizedProfile, ProfileDescriptor};

/// IAM Identity Center profiles. The SDK reads the cached SSO token and
/// exchanges it for role credentials, which the console accepts directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct SsoAssumer;

impl SsoAssumer {
    pub const KIND: &'static str = "AWS_SSO";
}

#[async_trait]
impl Assumer for SsoAssumer {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, profile: &NormalizedProfile) -> bool {
        profile.sso_account_id().is_some()
    }

    async fn resolve_terminal(
        &self,
        ctx: &ResolveContext,
        providers: &Providers,
        profile: &ProfileDescriptor,
        args: &ExtraArgs,
    ) -> Result<CredentialSet, AssumeError> {
        let op = Operation::ResolveTerminal;
        let credentials = retrieve_base(ctx, providers, profile, args, Self::KIND, op).await?;

        let p = &profile.normalized;
        let region = match p.region().or_else(|| p.sso_region()) {
            Some(region) => region.to_string(),
            None => resolve_region(ctx, providers, profile, Self::KIND, op).await?.name,
        };
        Ok(CredentialSet::new(credentials, region))
    }
}
