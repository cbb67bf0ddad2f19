use async_trait::async_trait;
use tracing::debug;

use assumers_schema::credentials::CredentialSet;

use crate::assumer::{
    console_strategy, resolve_region, retrieve_base, Assumer, ConsoleStrategy, ExtraArgs,
    Providers,
};
use crate::context::ResolveContext;
use crate::error::{AssumeError, Operation};
use crate::profile::{NormalizedProfile, ProfileDescriptor};

/// Static IAM user keys, optionally chained into a role through
/// `role_arn`/`source_profile`. Claims every profile that no more specific
/// assumer claimed.
#[derive(Debug, Default, Clone, Copy)]
pub struct IamAssumer;

impl IamAssumer {
    pub const KIND: &'static str = "AWS_IAM";

    async fn resolve_with_region(
        &self,
        ctx: &ResolveContext,
        providers: &Providers,
        profile: &ProfileDescriptor,
        args: &ExtraArgs,
        op: Operation,
    ) -> Result<CredentialSet, AssumeError> {
        let credentials = retrieve_base(ctx, providers, profile, args, Self::KIND, op).await?;
        let region = resolve_region(ctx, providers, profile, Self::KIND, op).await?;
        Ok(CredentialSet::new(credentials, region.name))
    }
}

#[async_trait]
impl Assumer for IamAssumer {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn matches(&self, _profile: &NormalizedProfile) -> bool {
        true
    }

    fn is_catch_all(&self) -> bool {
        true
    }

    async fn resolve_terminal(
        &self,
        ctx: &ResolveContext,
        providers: &Providers,
        profile: &ProfileDescriptor,
        args: &ExtraArgs,
    ) -> Result<CredentialSet, AssumeError> {
        self.resolve_with_region(ctx, providers, profile, args, Operation::ResolveTerminal)
            .await
    }

    async fn resolve_console(
        &self,
        ctx: &ResolveContext,
        providers: &Providers,
        profile: &ProfileDescriptor,
        args: &ExtraArgs,
    ) -> Result<CredentialSet, AssumeError> {
        match console_strategy(&profile.normalized) {
            ConsoleStrategy::AssumeRole { role_arn } => {
                debug!("console via role. profile:{}, role:{}", profile.name(), role_arn);
                self.resolve_with_region(ctx, providers, profile, args, Operation::ResolveConsole)
                    .await
            }
            ConsoleStrategy::Federate => {
                debug!("console via federation token. profile:{}", profile.name());
                let base = retrieve_base(
                    ctx,
                    providers,
                    profile,
                    args,
                    Self::KIND,
                    Operation::ResolveConsole,
                )
                .await?;
                providers
                    .federation
                    .resolve(ctx, profile, Self::KIND, &base)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{descriptor, Fakes, DEV_ROLE};
    use chrono::Utc;

    #[test]
    fn matches_everything() {
        let sso = descriptor("sso", &[("sso_account_id", "222222222222")]);
        assert!(IamAssumer.matches(&sso.normalized));
        assert!(IamAssumer.is_catch_all());
    }

    #[tokio::test]
    async fn terminal_attaches_profile_region() {
        let fakes = Fakes::default();
        let profile = descriptor("dev", &[("region", "eu-west-1")]);

        let set = IamAssumer
            .resolve_terminal(
                &ResolveContext::new(),
                &fakes.providers(),
                &profile,
                &ExtraArgs::default(),
            )
            .await
            .unwrap();

        assert_eq!(set.region(), "eu-west-1");
        assert!(!set.credentials().is_temporary());
    }

    #[tokio::test]
    async fn console_with_role_uses_role_credentials() {
        let fakes = Fakes::default();
        let profile = descriptor("dev", &[("role_arn", DEV_ROLE)]);

        let set = IamAssumer
            .resolve_console(
                &ResolveContext::new(),
                &fakes.providers(),
                &profile,
                &ExtraArgs::default(),
            )
            .await
            .unwrap();

        assert!(set.credentials().expires_at().unwrap() > Utc::now());
        assert_eq!(fakes.issuer.calls(), 0);
    }

    #[tokio::test]
    async fn console_without_role_federates_profile_credentials() {
        let fakes = Fakes::default();
        let profile = descriptor("dev-user", &[("role_arn", "")]);

        let set = IamAssumer
            .resolve_console(
                &ResolveContext::new(),
                &fakes.providers(),
                &profile,
                &ExtraArgs::default(),
            )
            .await
            .unwrap();

        assert!(set.credentials().is_temporary());
        assert_eq!(fakes.issuer.calls(), 1);
        assert_eq!(fakes.issuer.bases(), vec!["AKIA-dev-user".to_string()]);
    }

    #[tokio::test]
    async fn unresolvable_role_is_not_federated() {
        let fakes = Fakes::default();
        let profile = descriptor(
            "dev",
            &[("role_arn", "arn:aws:iam::000000000000:role/Missing")],
        );

        let e = IamAssumer
            .resolve_console(
                &ResolveContext::new(),
                &fakes.providers(),
                &profile,
                &ExtraArgs::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            e,
            AssumeError::Resolution {
                kind: IamAssumer::KIND,
                ..
            }
        ));
        assert_eq!(fakes.issuer.calls(), 0);
    }

    #[tokio::test]
    async fn role_errors_name_the_requested_operation() {
        let fakes = Fakes::default();
        let profile = descriptor(
            "dev",
            &[("role_arn", "arn:aws:iam::000000000000:role/Missing")],
        );
        let ctx = ResolveContext::new();
        let args = ExtraArgs::default();

        let console = IamAssumer
            .resolve_console(&ctx, &fakes.providers(), &profile, &args)
            .await
            .unwrap_err();
        assert!(matches!(
            console,
            AssumeError::Resolution {
                operation: Operation::ResolveConsole,
                ..
            }
        ));
        assert!(console.to_string().starts_with("resolve-console failed"));

        let terminal = IamAssumer
            .resolve_terminal(&ctx, &fakes.providers(), &profile, &args)
            .await
            .unwrap_err();
        assert!(matches!(
            terminal,
            AssumeError::Resolution {
                operation: Operation::ResolveTerminal,
                ..
            }
        ));
    }
}
