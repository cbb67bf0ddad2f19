use tracing::{debug, info};

use assumers_schema::credentials::{CredentialSet, ProfileCredentials};

use crate::assumer::{Assumer, ExtraArgs, Providers};
use crate::context::ResolveContext;
use crate::error::{AssumeError, Operation};
use crate::profile::load::LoadProfiles;
use crate::profile::ProfileDescriptor;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Terminal,
    Console,
}

impl Target {
    fn operation(self) -> Operation {
        match self {
            Target::Terminal => Operation::ResolveTerminal,
            Target::Console => Operation::ResolveConsole,
        }
    }
}

/// Entry point for command handlers: load a profile by name, dispatch it to
/// its assumer and resolve credentials for the requested target.
///
/// Holds no per-call state, so one instance can serve concurrent callers.
pub struct Assumers<L> {
    loader: L,
    registry: Registry,
    providers: Providers,
}

impl<L> Assumers<L>
where
    L: LoadProfiles,
{
    pub fn new(loader: L, registry: Registry, providers: Providers) -> Self {
        Self {
            loader,
            registry,
            providers,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub async fn assume_terminal(
        &self,
        ctx: &ResolveContext,
        profile_name: &str,
        args: &ExtraArgs,
    ) -> Result<CredentialSet, AssumeError> {
        self.assume(ctx, profile_name, Target::Terminal, args)
            .await
            .map(|p| p.credentials)
    }

    pub async fn assume_console(
        &self,
        ctx: &ResolveContext,
        profile_name: &str,
        args: &ExtraArgs,
    ) -> Result<CredentialSet, AssumeError> {
        self.assume(ctx, profile_name, Target::Console, args)
            .await
            .map(|p| p.credentials)
    }

    /// Kind of the assumer responsible for the profile. Reads configuration
    /// only; no credential or network calls are made.
    pub async fn detect_kind(&self, profile_name: &str) -> Result<&'static str, AssumeError> {
        let profile = self.load(&ResolveContext::new(), profile_name).await?;
        self.dispatch(&profile).map(|a| a.kind())
    }

    pub async fn assume(
        &self,
        ctx: &ResolveContext,
        profile_name: &str,
        target: Target,
        args: &ExtraArgs,
    ) -> Result<ProfileCredentials, AssumeError> {
        ctx.check()
            .map_err(|reason| AssumeError::cancelled(profile_name, target.operation(), reason))?;

        let profile = self.load(ctx, profile_name).await?;
        let assumer = self.dispatch(&profile)?;
        debug!(
            "resolving credentials. profile:{}, kind:{}, target:{:?}",
            profile_name,
            assumer.kind(),
            target
        );

        let credentials = match target {
            Target::Terminal => {
                assumer
                    .resolve_terminal(ctx, &self.providers, &profile, args)
                    .await?
            }
            Target::Console => {
                assumer
                    .resolve_console(ctx, &self.providers, &profile, args)
                    .await?
            }
        };
        info!(
            "credentials resolved. profile:{}, kind:{}, region:{}, expires_at:{:?}",
            profile_name,
            assumer.kind(),
            credentials.region(),
            credentials.credentials().expires_at()
        );

        Ok(ProfileCredentials {
            profile_name: profile.name().to_string(),
            kind: assumer.kind().to_string(),
            credentials,
        })
    }

    async fn load(
        &self,
        ctx: &ResolveContext,
        profile_name: &str,
    ) -> Result<ProfileDescriptor, AssumeError> {
        ctx.run(self.loader.load_profile(profile_name))
            .await
            .map_err(|reason| AssumeError::cancelled(profile_name, Operation::LoadProfile, reason))?
            .map_err(|e| AssumeError::config(profile_name, e))
    }

    fn dispatch(&self, profile: &ProfileDescriptor) -> Result<&dyn Assumer, AssumeError> {
        self.registry
            .select(profile)
            .ok_or_else(|| AssumeError::Dispatch {
                profile: profile.name().to_string(),
            })
    }
}
