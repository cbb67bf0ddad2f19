use async_trait::async_trait;

use assumers_schema::credentials::ProfileCredentials;

pub mod console;
pub mod export;
pub mod shell;

#[async_trait]
pub trait HandleCredentials {
    async fn handle_credentials(self, credentials: ProfileCredentials) -> anyhow::Result<()>;
}

struct Variable<'a> {
    name: &'a str,
    value: Option<String>,
}

fn into_variables(request: &ProfileCredentials) -> Vec<Variable<'_>> {
    fn v<S: Into<String>>(name: &str, value: Option<S>) -> Variable<'_> {
        Variable {
            name,
            value: value.map(|s| s.into()),
        }
    }

    let creds = request.credentials.credentials();
    vec![
        // for AWS SDK, aws-cli
        v("AWS_PROFILE", Option::<String>::None),
        v("AWS_REGION", Some(request.region_name())),
        v("AWS_DEFAULT_REGION", Some(request.region_name())),
        v("AWS_ACCESS_KEY_ID", Some(creds.key())),
        v("AWS_SECRET_ACCESS_KEY", Some(creds.secret())),
        v("AWS_SESSION_TOKEN", creds.token()),
        v(
            "AWS_SESSION_EXPIRATION",
            creds.expires_at().map(|dt| dt.to_rfc3339()),
        ),
        // for prompts
        v("ASSUMERS_PROFILE", Some(request.profile_name.as_str())),
        v("ASSUMERS_KIND", Some(request.kind.as_str())),
    ]
}
