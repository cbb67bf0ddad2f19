use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

use assumers_schema::credentials::{Credentials, ProfileCredentials};

use crate::handler::HandleCredentials;

/// Sign-in and console hosts differ per partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Partition {
    signin: &'static str,
    console: &'static str,
}

fn partition_for(region: &str) -> Partition {
    if region.starts_with("us-gov-") {
        Partition {
            signin: "https://signin.amazonaws-us-gov.com/federation",
            console: "https://console.amazonaws-us-gov.com/",
        }
    } else if region.starts_with("cn-") {
        Partition {
            signin: "https://signin.amazonaws.cn/federation",
            console: "https://console.amazonaws.cn/",
        }
    } else {
        Partition {
            signin: "https://signin.aws.amazon.com/federation",
            console: "https://console.aws.amazon.com/",
        }
    }
}

/// Turns console credentials into a sign-in URL and prints it.
pub struct ConsoleHandler;

#[async_trait]
impl HandleCredentials for ConsoleHandler {
    async fn handle_credentials(self, credentials: ProfileCredentials) -> anyhow::Result<()> {
        let region = credentials.region_name().to_string();
        let session = FederatedSession::try_from(credentials.credentials.credentials())?;

        let client = FederationClient {
            partition: partition_for(&region),
        };
        let signin_token = client.signin_token(session).await?;
        let url = client.signin_url(signin_token, &region)?;

        info!("console sign-in url issued. profile:{}", credentials.profile_name);
        println!("{}", url);
        Ok(())
    }
}

#[derive(Serialize)]
struct FederatedSession {
    #[serde(rename = "sessionId")]
    id: String,

    #[serde(rename = "sessionKey")]
    key: String,

    #[serde(rename = "sessionToken")]
    token: String,
}

#[derive(Debug, Deserialize)]
struct SigninToken(String);

#[derive(Debug, Deserialize)]
struct FederatedResponse {
    #[serde(rename = "SigninToken")]
    signin_token: SigninToken,
}

impl TryFrom<&Credentials> for FederatedSession {
    type Error = anyhow::Error;

    fn try_from(credentials: &Credentials) -> Result<Self, Self::Error> {
        if let Some(token) = credentials.token() {
            Ok(FederatedSession {
                id: credentials.key().to_string(),
                key: credentials.secret().to_string(),
                token: token.to_string(),
            })
        } else {
            Err(anyhow::anyhow!(
                "session-token is missing; console sign-in needs temporary credentials."
            ))
        }
    }
}

struct FederationClient {
    partition: Partition,
}

impl FederationClient {
    // SessionDuration is omitted; GetFederationToken sessions reject it.
    pub async fn signin_token(&self, session: FederatedSession) -> anyhow::Result<SigninToken> {
        let session = serde_json::to_string(&session)?;
        let query = [("Action", "getSigninToken".to_string()), ("Session", session)];

        let client = reqwest::Client::new();
        let signin_endpoint = self.partition.signin.parse::<Url>()?;
        let response = client
            .get(signin_endpoint)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let response = serde_json::from_str::<FederatedResponse>(&response.text().await?)?;
        Ok(response.signin_token)
    }

    pub fn signin_url(&self, signin_token: SigninToken, region: &str) -> anyhow::Result<Url> {
        let destination = Url::parse_with_params(self.partition.console, [("region", region)])?;
        let query = [
            ("Action", "login".to_string()),
            ("Issuer", "".to_string()),
            ("Destination", destination.to_string()),
            ("SigninToken", signin_token.0),
        ];

        let url = Url::parse_with_params(self.partition.signin, query)?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::profile_credentials;

    #[test]
    fn picks_partition_from_region() {
        assert_eq!(
            partition_for("us-gov-west-1").signin,
            "https://signin.amazonaws-us-gov.com/federation"
        );
        assert_eq!(
            partition_for("cn-north-1").console,
            "https://console.amazonaws.cn/"
        );
        assert_eq!(
            partition_for("eu-west-1").signin,
            "https://signin.aws.amazon.com/federation"
        );
    }

    #[test]
    fn long_lived_credentials_cannot_sign_in() {
        let creds = profile_credentials(false);
        assert!(FederatedSession::try_from(creds.credentials.credentials()).is_err());

        let creds = profile_credentials(true);
        let session = FederatedSession::try_from(creds.credentials.credentials()).unwrap();
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["sessionId"], "ASIAEXAMPLE");
        assert_eq!(json["sessionToken"], "token");
    }

    #[test]
    fn signin_url_carries_token_and_destination() {
        let client = FederationClient {
            partition: partition_for("eu-west-1"),
        };
        let url = client
            .signin_url(SigninToken("abc".to_string()), "eu-west-1")
            .unwrap();

        assert_eq!(url.host_str(), Some("signin.aws.amazon.com"));
        let query = url.query_pairs().into_owned().collect::<Vec<_>>();
        assert!(query.contains(&("Action".to_string(), "login".to_string())));
        assert!(query.contains(&("SigninToken".to_string(), "abc".to_string())));
        assert!(query.contains(&(
            "Destination".to_string(),
            "https://console.aws.amazon.com/?region=eu-west-1".to_string()
        )));
    }
}
