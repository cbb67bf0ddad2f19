use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use assumers_schema::credentials::{CredentialSet, Credentials};

use crate::context::ResolveContext;
use crate::defaults;
use crate::error::{AssumeError, Operation};
use crate::profile::ProfileDescriptor;
use crate::region::ResolveRegion;

pub mod aws_sdk;

/// `GetFederationToken` rejects names longer than this.
const MAX_SESSION_NAME_LEN: usize = 32;

#[async_trait]
pub trait IssueFederationToken: Send + Sync {
    async fn issue_federation_token(
        &self,
        base: &Credentials,
        region: &str,
        session_name: &str,
    ) -> anyhow::Result<Credentials>;
}

/// Exchanges long-lived credentials for a federation token that the browser
/// console accepts.
#[derive(Clone)]
pub struct FederationResolver {
    regions: Arc<dyn ResolveRegion>,
    issuer: Arc<dyn IssueFederationToken>,
}

impl FederationResolver {
    pub fn new(
        regions: Arc<dyn ResolveRegion>,
        issuer: Arc<dyn IssueFederationToken>,
    ) -> FederationResolver {
        FederationResolver { regions, issuer }
    }

    pub fn session_name(&self, display_name: &str) -> String {
        session_name(defaults::FEDERATION_SESSION_PREFIX, display_name)
    }

    pub async fn resolve(
        &self,
        ctx: &ResolveContext,
        profile: &ProfileDescriptor,
        kind: &'static str,
        base: &Credentials,
    ) -> Result<CredentialSet, AssumeError> {
        let name = profile.name();
        let cancelled = |reason| AssumeError::cancelled(name, Operation::ResolveConsole, reason);

        // the token service is regional, so the region comes first
        let region = ctx
            .run(self.regions.resolve_region(profile))
            .await
            .map_err(cancelled)?
            .map_err(|e| AssumeError::federation(name, kind, e))?;

        let session_name = self.session_name(profile.display_name());
        info!(
            "issuing federation token. profile:{}, region:{}, session:{}",
            name, region.name, session_name
        );

        let credentials = ctx
            .run(
                self.issuer
                    .issue_federation_token(base, &region.name, &session_name),
            )
            .await
            .map_err(cancelled)?
            .map_err(|e| AssumeError::federation(name, kind, e))?;

        if !credentials.is_temporary() {
            return Err(AssumeError::federation(
                name,
                kind,
                anyhow::anyhow!("federation token has no session token"),
            ));
        }

        Ok(CredentialSet::new(credentials, region.name))
    }
}

fn session_name(prefix: &str, display_name: &str) -> String {
    let allowed = |c: char| c.is_ascii_alphanumeric() || "_+=,.@-".contains(c);
    format!("{}{}", prefix, display_name)
        .chars()
        .map(|c| if allowed(c) { c } else { '-' })
        .take(MAX_SESSION_NAME_LEN)
        .collect()
}
