use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session half of a temporary credential. A session token never travels
/// without its expiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    key: String,
    secret: String,
    session: Option<Session>,
}

impl Credentials {
    pub fn long_lived<K, S>(key: K, secret: S) -> Credentials
    where
        K: Into<String>,
        S: Into<String>,
    {
        Credentials {
            key: key.into(),
            secret: secret.into(),
            session: None,
        }
    }

    pub fn temporary<K, S, T>(key: K, secret: S, token: T, expires_at: DateTime<Utc>) -> Credentials
    where
        K: Into<String>,
        S: Into<String>,
        T: Into<String>,
    {
        Credentials {
            key: key.into(),
            secret: secret.into(),
            session: Some(Session {
                token: token.into(),
                expires_at,
            }),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.session.as_ref().map(|s| s.expires_at)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_temporary(&self) -> bool {
        self.session.is_some()
    }

    /// Long-lived credentials never expire from this crate's point of view.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|at| at <= now).unwrap_or(false)
    }
}

/// Resolved credential material plus the region it should be used in.
/// Built fresh for every resolution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    credentials: Credentials,
    region: String,
}

impl CredentialSet {
    pub fn new<R: Into<String>>(credentials: Credentials, region: R) -> CredentialSet {
        CredentialSet {
            credentials,
            region: region.into(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn into_parts(self) -> (Credentials, String) {
        (self.credentials, self.region)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCredentials {
    pub profile_name: String,
    pub kind: String,
    pub credentials: CredentialSet,
}

impl ProfileCredentials {
    pub fn region_name(&self) -> &str {
        self.credentials.region()
    }
}
