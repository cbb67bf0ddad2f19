use async_trait::async_trait;
use tracing::debug;

use assumers_schema::credentials::CredentialSet;

use crate::assumer::{resolve_region, retrieve_base, Assumer, ExtraArgs, Providers};
use crate::context::ResolveContext;
use crate::error::{AssumeError, Operation};
use crate::profile::{NormalizedProfile, ProfileDescriptor};

/// Profiles backed by an external broker through `credential_process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialProcessAssumer;

impl CredentialProcessAssumer {
    pub const KIND: &'static str = "AWS_CREDENTIAL_PROCESS";
}

#[async_trait]
impl Assumer for CredentialProcessAssumer {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, profile: &NormalizedProfile) -> bool {
        profile.credential_process().is_some()
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
        let region = resolve_region(ctx, providers, profile, Self::KIND, op).await?;
        Ok(CredentialSet::new(credentials, region.name))
    }

    async fn resolve_console(
        &self,
        ctx: &ResolveContext,
        providers: &Providers,
        profile: &ProfileDescriptor,
        args: &ExtraArgs,
    ) -> Result<CredentialSet, AssumeError> {
        let op = Operation::ResolveConsole;
        let credentials = retrieve_base(ctx, providers, profile, args, Self::KIND, op).await?;
        if credentials.is_temporary() {
            let region = resolve_region(ctx, providers, profile, Self::KIND, op).await?;
            return Ok(CredentialSet::new(credentials, region.name));
        }

        debug!("broker returned long-lived keys. profile:{}", profile.name());
        providers
            .federation
            .resolve(ctx, profile, Self::KIND, &credentials)
            .await
    }
}
