//! In-memory collaborators for unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use assumers_schema::credentials::Credentials;

use crate::assumer::Providers;
use crate::credentials::RetrieveCredentials;
use crate::federation::{FederationResolver, IssueFederationToken};
use crate::profile::load::LoadProfiles;
use crate::profile::{ProfileDescriptor, ProfileSet};
use crate::region::{RegionSource, ResolveRegion, ResolvedRegion};

pub const DEV_ROLE: &str = "arn:aws:iam::111111111111:role/Dev";

pub fn descriptor(name: &str, fields: &[(&str, &str)]) -> ProfileDescriptor {
    let raw = fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<BTreeMap<_, _>>();
    ProfileDescriptor::from_raw(name, raw).unwrap()
}

#[derive(Default)]
pub struct FakeCredentials {
    calls: AtomicUsize,
    temporary: Mutex<HashSet<String>>,
    mfa_tokens: Mutex<Vec<Option<String>>>,
}

impl FakeCredentials {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn issue_temporary_for(&self, profile_name: &str) {
        self.temporary
            .lock()
            .unwrap()
            .insert(profile_name.to_string());
    }

    pub fn mfa_tokens(&self) -> Vec<Option<String>> {
        self.mfa_tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetrieveCredentials for FakeCredentials {
    async fn retrieve_credentials(
        &self,
        profile: &ProfileDescriptor,
        mfa_token: Option<&str>,
    ) -> anyhow::Result<Credentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mfa_tokens
            .lock()
            .unwrap()
            .push(mfa_token.map(|s| s.to_string()));

        let p = &profile.normalized;
        if p.role_arn().map(|arn| arn.ends_with("role/Missing")).unwrap_or(false) {
            anyhow::bail!("AccessDenied: role cannot be assumed");
        }

        let temporary = p.has_role_arn()
            || p.sso_account_id().is_some()
            || self.temporary.lock().unwrap().contains(profile.name());
        if temporary {
            Ok(Credentials::temporary(
                format!("ASIA-{}", profile.name()),
                "secret",
                "session-token",
                Utc::now() + Duration::hours(1),
            ))
        } else {
            Ok(Credentials::long_lived(
                format!("AKIA-{}", profile.name()),
                "secret",
            ))
        }
    }
}

#[derive(Default)]
pub struct FakeRegions {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl FakeRegions {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResolveRegion for FakeRegions {
    async fn resolve_region(&self, profile: &ProfileDescriptor) -> anyhow::Result<ResolvedRegion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("no region could be discovered");
        }

        Ok(match profile.normalized.region() {
            Some(region) => ResolvedRegion {
                name: region.to_string(),
                source: RegionSource::Profile,
            },
            None => ResolvedRegion {
                name: "us-east-1".to_string(),
                source: RegionSource::Default,
            },
        })
    }
}

#[derive(Default)]
pub struct FakeIssuer {
    calls: AtomicUsize,
    reject: AtomicBool,
    long_lived: AtomicBool,
    requests: Mutex<Vec<(String, String)>>,
    bases: Mutex<Vec<String>>,
}

impl FakeIssuer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reject(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    pub fn return_long_lived(&self) {
        self.long_lived.store(true, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bases(&self) -> Vec<String> {
        self.bases.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueFederationToken for FakeIssuer {
    async fn issue_federation_token(
        &self,
        base: &Credentials,
        region: &str,
        session_name: &str,
    ) -> anyhow::Result<Credentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((region.to_string(), session_name.to_string()));
        self.bases.lock().unwrap().push(base.key().to_string());

        if self.reject.load(Ordering::SeqCst) {
            anyhow::bail!("AccessDenied: not authorized to perform sts:GetFederationToken");
        }
        if self.long_lived.load(Ordering::SeqCst) {
            return Ok(Credentials::long_lived("AKIA-federated", "secret"));
        }

        Ok(Credentials::temporary(
            "ASIA-federated",
            "secret",
            "federation-token",
            Utc::now() + Duration::hours(12),
        ))
    }
}

pub struct FakeLoader {
    profiles: ProfileSet,
    calls: AtomicUsize,
}

impl FakeLoader {
    pub fn new<I: IntoIterator<Item = ProfileDescriptor>>(profiles: I) -> FakeLoader {
        FakeLoader {
            profiles: profiles.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoadProfiles for FakeLoader {
    async fn load_profiles(&self) -> anyhow::Result<ProfileSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.profiles.clone())
    }
}

#[derive(Default)]
pub struct Fakes {
    pub credentials: Arc<FakeCredentials>,
    pub regions: Arc<FakeRegions>,
    pub issuer: Arc<FakeIssuer>,
}

impl Fakes {
    pub fn providers(&self) -> Providers {
        Providers::new(
            self.credentials.clone(),
            self.regions.clone(),
            self.issuer.clone(),
        )
    }

    pub fn federation_resolver(&self) -> FederationResolver {
        FederationResolver::new(self.regions.clone(), self.issuer.clone())
    }
}
