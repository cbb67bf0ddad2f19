use std::sync::Arc;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_sts::primitives::DateTime as StsDateTime;
use aws_types::region::Region;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

use assumers_schema::credentials::Credentials;

use crate::credentials::RetrieveCredentials;
use crate::defaults;
use crate::mfa::{ReadMfaToken, StdinMfaTokenReader};
use crate::profile::ProfileDescriptor;

pub(crate) fn expiration_from(dt: &StsDateTime) -> anyhow::Result<DateTime<Utc>> {
    Utc.timestamp_opt(dt.secs(), dt.subsec_nanos())
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid expiration returned by sts. secs:{}", dt.secs()))
}

fn credentials_from(creds: aws_credential_types::Credentials, duration_seconds: i32) -> Credentials {
    match creds.session_token() {
        Some(token) => {
            // some providers hand out session tokens without an expiry
            let expires_at = creds
                .expiry()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|| Utc::now() + Duration::seconds(i64::from(duration_seconds)));
            Credentials::temporary(
                creds.access_key_id(),
                creds.secret_access_key(),
                token,
                expires_at,
            )
        }
        None => Credentials::long_lived(creds.access_key_id(), creds.secret_access_key()),
    }
}

struct AssumeRoleInput {
    role_arn: String,
    role_session_name: String,
    duration_seconds: i32,
    external_id: Option<String>,
    mfa_serial: String,
    token_code: String,
}

impl AssumeRoleInput {
    async fn send(self, client: aws_sdk_sts::Client) -> anyhow::Result<Credentials> {
        let mut builder = client
            .assume_role()
            .role_arn(self.role_arn)
            .role_session_name(self.role_session_name)
            .duration_seconds(self.duration_seconds)
            .serial_number(self.mfa_serial)
            .token_code(self.token_code);

        builder = self
            .external_id
            .into_iter()
            .fold(builder, |builder, external_id| {
                builder.external_id(external_id)
            });

        let output = builder.send().await?;
        let creds = output
            .credentials()
            .ok_or_else(|| anyhow::anyhow!("assume-role didn't return a credential"))?;

        Ok(Credentials::temporary(
            creds.access_key_id(),
            creds.secret_access_key(),
            creds.session_token(),
            expiration_from(creds.expiration())?,
        ))
    }
}

/// Retrieves credentials through the AWS SDK's default provider chain for
/// the profile. Role profiles guarded by `mfa_serial` are assumed manually,
/// since the SDK provider chain cannot prompt for a token code.
pub struct AwsSdkCredentialsRetriever {
    mfa_reader: Arc<dyn ReadMfaToken>,
}

impl Default for AwsSdkCredentialsRetriever {
    fn default() -> Self {
        AwsSdkCredentialsRetriever {
            mfa_reader: Arc::new(StdinMfaTokenReader),
        }
    }
}

impl AwsSdkCredentialsRetriever {
    pub fn with_mfa_reader(mfa_reader: Arc<dyn ReadMfaToken>) -> AwsSdkCredentialsRetriever {
        AwsSdkCredentialsRetriever { mfa_reader }
    }

    async fn sts_assume_role(
        &self,
        profile: &ProfileDescriptor,
        input: AssumeRoleInput,
    ) -> anyhow::Result<Credentials> {
        let p = &profile.normalized;
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = p.region() {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(source_profile_name) = p.source_profile() {
            loader = loader.profile_name(source_profile_name);
        }

        let config = loader.load().await;
        let client = aws_sdk_sts::Client::new(&config);
        input.send(client).await
    }

    async fn credentials_provider(
        &self,
        profile: &ProfileDescriptor,
        duration_seconds: i32,
    ) -> anyhow::Result<Credentials> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile.name())
            .load()
            .await;

        let credentials_provider = config
            .credentials_provider()
            .ok_or_else(|| anyhow::anyhow!("no credentials provider found"))?;

        let creds = credentials_provider.provide_credentials().await?;
        Ok(credentials_from(creds, duration_seconds))
    }
}

#[async_trait]
impl RetrieveCredentials for AwsSdkCredentialsRetriever {
    async fn retrieve_credentials(
        &self,
        profile: &ProfileDescriptor,
        mfa_token: Option<&str>,
    ) -> anyhow::Result<Credentials> {
        let p = &profile.normalized;
        let duration_seconds = p
            .duration_seconds
            .map(i32::try_from)
            .unwrap_or(Ok(defaults::DURATION_SECONDS))?;

        match (p.role_arn(), p.mfa_serial()) {
            (Some(role_arn), Some(mfa_serial)) => {
                debug!("assuming role with mfa. profile:{}", profile.name());
                let token_code = match mfa_token {
                    Some(token) => token.to_string(),
                    None => self.mfa_reader.read_mfa_token(mfa_serial).await?,
                };

                let input = AssumeRoleInput {
                    role_arn: role_arn.to_string(),
                    role_session_name: p
                        .role_session_name()
                        .unwrap_or("assumers-cli")
                        .to_string(),
                    duration_seconds,
                    external_id: p.external_id().map(|s| s.to_string()),
                    mfa_serial: mfa_serial.to_string(),
                    token_code,
                };
                self.sts_assume_role(profile, input).await
            }
            _ => self.credentials_provider(profile, duration_seconds).await,
        }
    }
}
