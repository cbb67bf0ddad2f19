use std::time::SystemTime;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sts::types::PolicyDescriptorType;
use aws_types::region::Region;

use assumers_schema::credentials::Credentials;

use crate::credentials::aws_sdk::expiration_from;
use crate::federation::IssueFederationToken;

mod defaults {
    /// Session policies only narrow the caller's own permissions, so this
    /// leaves the federated user with exactly what the IAM user has.
    pub const POLICY_ARN: &str = "arn:aws:iam::aws:policy/AdministratorAccess";
}

/// Calls STS `GetFederationToken` signed with the profile's own
/// (long-lived) credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsSdkFederationTokenIssuer;

#[async_trait]
impl IssueFederationToken for AwsSdkFederationTokenIssuer {
    async fn issue_federation_token(
        &self,
        base: &Credentials,
        region: &str,
        session_name: &str,
    ) -> anyhow::Result<Credentials> {
        let provider = aws_credential_types::Credentials::new(
            base.key(),
            base.secret(),
            base.token().map(|s| s.to_string()),
            base.expires_at().map(SystemTime::from),
            "assumers",
        );
        let config = aws_sdk_sts::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(provider)
            .build();
        let client = aws_sdk_sts::Client::from_conf(config);

        let output = client
            .get_federation_token()
            .name(session_name)
            .policy_arns(PolicyDescriptorType::builder().arn(defaults::POLICY_ARN).build())
            .send()
            .await?;
        let creds = output
            .credentials()
            .ok_or_else(|| anyhow::anyhow!("get-federation-token didn't return a credential"))?;

        Ok(Credentials::temporary(
            creds.access_key_id(),
            creds.secret_access_key(),
            creds.session_token(),
            expiration_from(creds.expiration())?,
        ))
    }
}
