use std::collections::BTreeMap;

use anyhow::Context;

pub mod load;
pub mod select;

/// Profile keys captured into [`ProfileDescriptor::raw`]. Secret keys such as
/// `aws_secret_access_key` are never read into a descriptor.
pub const RAW_KEYS: &[&str] = &[
    "region",
    "role_arn",
    "source_profile",
    "credential_source",
    "role_session_name",
    "external_id",
    "duration_seconds",
    "mfa_serial",
    "credential_process",
    "sso_account_id",
    "sso_role_name",
    "sso_region",
    "sso_start_url",
    "sso_session",
];

/// Strongly-typed view of a profile. Derived once from the raw fields;
/// an empty value and an absent value are the same thing here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedProfile {
    pub display_name: String,
    pub role_arn: Option<String>,
    pub sso_account_id: Option<String>,
    pub region: Option<String>,
    pub source_profile: Option<String>,
    pub role_session_name: Option<String>,
    pub external_id: Option<String>,
    pub duration_seconds: Option<u32>,
    pub mfa_serial: Option<String>,
    pub credential_process: Option<String>,
    pub sso_region: Option<String>,
    pub sso_role_name: Option<String>,
    pub sso_start_url: Option<String>,
}

impl NormalizedProfile {
    pub fn role_arn(&self) -> Option<&str> {
        self.role_arn.as_deref()
    }

    pub fn has_role_arn(&self) -> bool {
        self.role_arn.is_some()
    }

    pub fn sso_account_id(&self) -> Option<&str> {
        self.sso_account_id.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn source_profile(&self) -> Option<&str> {
        self.source_profile.as_deref()
    }

    pub fn role_session_name(&self) -> Option<&str> {
        self.role_session_name.as_deref()
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn mfa_serial(&self) -> Option<&str> {
        self.mfa_serial.as_deref()
    }

    pub fn credential_process(&self) -> Option<&str> {
        self.credential_process.as_deref()
    }

    pub fn sso_region(&self) -> Option<&str> {
        self.sso_region.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDescriptor {
    pub name: String,
    pub raw: BTreeMap<String, String>,
    pub normalized: NormalizedProfile,
}

impl ProfileDescriptor {
    pub fn from_raw<S: Into<String>>(
        name: S,
        raw: BTreeMap<String, String>,
    ) -> anyhow::Result<ProfileDescriptor> {
        let name = name.into();
        let normalized = normalize(&name, &raw)?;
        Ok(ProfileDescriptor {
            name,
            raw,
            normalized,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.normalized.display_name
    }
}

fn normalize(name: &str, raw: &BTreeMap<String, String>) -> anyhow::Result<NormalizedProfile> {
    let field = |key: &str| {
        raw.get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    };

    let duration_seconds = field("duration_seconds")
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("invalid duration_seconds. profile:{}, value:{}", name, s))
        })
        .transpose()?;

    Ok(NormalizedProfile {
        display_name: name.to_string(),
        role_arn: field("role_arn"),
        sso_account_id: field("sso_account_id"),
        region: field("region"),
        source_profile: field("source_profile"),
        role_session_name: field("role_session_name"),
        external_id: field("external_id"),
        duration_seconds,
        mfa_serial: field("mfa_serial"),
        credential_process: field("credential_process"),
        sso_region: field("sso_region"),
        sso_role_name: field("sso_role_name"),
        sso_start_url: field("sso_start_url"),
    })
}

#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    pub profiles: BTreeMap<String, ProfileDescriptor>,
}

impl ProfileSet {
    pub fn get_profile(&self, profile_name: &str) -> Option<&ProfileDescriptor> {
        self.profiles.get(profile_name)
    }

    pub fn take_profile(&mut self, profile_name: &str) -> Option<ProfileDescriptor> {
        self.profiles.remove(profile_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(|k| k.as_str())
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ProfileDescriptor> {
        self.profiles.values()
    }
}

impl FromIterator<ProfileDescriptor> for ProfileSet {
    fn from_iter<T: IntoIterator<Item = ProfileDescriptor>>(iter: T) -> Self {
        let profiles = iter.into_iter().map(|p| (p.name.clone(), p)).collect();
        ProfileSet { profiles }
    }
}
