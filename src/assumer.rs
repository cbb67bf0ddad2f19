use std::sync::Arc;

use async_trait::async_trait;

use assumers_schema::credentials::{CredentialSet, Credentials};

use crate::context::ResolveContext;
use crate::credentials::RetrieveCredentials;
use crate::error::{AssumeError, Operation};
use crate::federation::{FederationResolver, IssueFederationToken};
use crate::profile::{NormalizedProfile, ProfileDescriptor};
use crate::region::{ResolveRegion, ResolvedRegion};

pub mod credential_process;
pub mod iam;
pub mod sso;

/// Caller-supplied arguments that ride along with a resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraArgs {
    pub mfa_token: Option<String>,
    pub args: Vec<String>,
}

impl ExtraArgs {
    pub fn mfa_token(&self) -> Option<&str> {
        self.mfa_token.as_deref()
    }
}

/// External collaborators shared by every assumer. Holds no mutable state.
#[derive(Clone)]
pub struct Providers {
    pub credentials: Arc<dyn RetrieveCredentials>,
    pub regions: Arc<dyn ResolveRegion>,
    pub federation: FederationResolver,
}

impl Providers {
    pub fn new(
        credentials: Arc<dyn RetrieveCredentials>,
        regions: Arc<dyn ResolveRegion>,
        issuer: Arc<dyn IssueFederationToken>,
    ) -> Providers {
        let federation = FederationResolver::new(regions.clone(), issuer);
        Providers {
            credentials,
            regions,
            federation,
        }
    }
}

/// How a console launch gets its credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStrategy<'a> {
    /// Role credentials are console-capable as they are.
    AssumeRole { role_arn: &'a str },
    /// No assumable role; exchange the profile's credentials for a
    /// federation token.
    Federate,
}

pub fn console_strategy(profile: &NormalizedProfile) -> ConsoleStrategy<'_> {
    match profile.role_arn() {
        Some(role_arn) => ConsoleStrategy::AssumeRole { role_arn },
        None => ConsoleStrategy::Federate,
    }
}

#[async_trait]
pub trait Assumer: Send + Sync {
    /// Stable identifier, e.g. `AWS_IAM`.
    fn kind(&self) -> &'static str;

    /// Pure predicate over the normalized profile. Never touches the network.
    fn matches(&self, profile: &NormalizedProfile) -> bool;

    /// A catch-all claims every profile no other assumer claimed and has to
    /// be registered last.
    fn is_catch_all(&self) -> bool {
        false
    }

    async fn resolve_terminal(
        &self,
        ctx: &ResolveContext,
        providers: &Providers,
        profile: &ProfileDescriptor,
        args: &ExtraArgs,
    ) -> Result<CredentialSet, AssumeError>;

    async fn resolve_console(
        &self,
        ctx: &ResolveContext,
        providers: &Providers,
        profile: &ProfileDescriptor,
        args: &ExtraArgs,
    ) -> Result<CredentialSet, AssumeError> {
        self.resolve_terminal(ctx, providers, profile, args).await
    }
}

/// Base credentials for `profile`, with cancellation and failures mapped
/// into the error taxonomy.
pub(crate) async fn retrieve_base(
    ctx: &ResolveContext,
    providers: &Providers,
    profile: &ProfileDescriptor,
    args: &ExtraArgs,
    kind: &'static str,
    operation: Operation,
) -> Result<Credentials, AssumeError> {
    ctx.run(
        providers
            .credentials
            .retrieve_credentials(profile, args.mfa_token()),
    )
    .await
    .map_err(|reason| AssumeError::cancelled(profile.name(), operation, reason))?
    .map_err(|e| AssumeError::resolution(profile.name(), kind, operation, e))
}

pub(crate) async fn resolve_region(
    ctx: &ResolveContext,
    providers: &Providers,
    profile: &ProfileDescriptor,
    kind: &'static str,
    operation: Operation,
) -> Result<ResolvedRegion, AssumeError> {
    ctx.run(providers.regions.resolve_region(profile))
        .await
        .map_err(|reason| AssumeError::cancelled(profile.name(), operation, reason))?
        .map_err(|e| AssumeError::resolution(profile.name(), kind, operation, e))
}
