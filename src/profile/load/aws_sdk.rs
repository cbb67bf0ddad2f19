use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_config::profile::load;
use aws_runtime::env_config::file::EnvConfigFiles;
use aws_runtime::env_config::section::EnvConfigSections;
use aws_types::os_shim_internal::{Env, Fs};
use tracing::warn;

use crate::profile::load::LoadProfiles;
use crate::profile::{ProfileDescriptor, ProfileSet, RAW_KEYS};

fn profile_from(name: &str, value: &aws_config::profile::Profile) -> anyhow::Result<ProfileDescriptor> {
    let raw = RAW_KEYS
        .iter()
        .filter_map(|&k| value.get(k).map(|v| (k.to_string(), v.to_string())))
        .collect::<BTreeMap<_, _>>();

    ProfileDescriptor::from_raw(name, raw)
}

// A malformed profile is left out of the set; it must not hide its siblings.
impl From<EnvConfigSections> for ProfileSet {
    fn from(value: EnvConfigSections) -> Self {
        value
            .profiles()
            .filter_map(|n| value.get_profile(n).map(|p| (n, profile_from(n, p))))
            .filter_map(|(n, profile)| match profile {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!("skipping malformed profile. profile:{}, error:{:#}", n, e);
                    None
                }
            })
            .collect()
    }
}

/// Reads `~/.aws/config` and `~/.aws/credentials` (or the paths named by
/// `AWS_CONFIG_FILE` / `AWS_SHARED_CREDENTIALS_FILE`).
#[derive(Debug, Default)]
pub struct AwsSdkProfileLoader {
    profile_files: EnvConfigFiles,
    fs: Fs,
    env: Env,
}

#[async_trait]
impl LoadProfiles for AwsSdkProfileLoader {
    async fn load_profiles(&self) -> anyhow::Result<ProfileSet> {
        let sections = self.load_sections().await?;
        Ok(ProfileSet::from(sections))
    }

    async fn load_profile(&self, profile_name: &str) -> anyhow::Result<ProfileDescriptor> {
        let sections = self.load_sections().await?;
        let profile = sections
            .get_profile(profile_name)
            .ok_or_else(|| anyhow::anyhow!("No profile found. profile_name:{}", profile_name))?;
        profile_from(profile_name, profile)
    }
}

impl AwsSdkProfileLoader {
    async fn load_sections(&self) -> anyhow::Result<EnvConfigSections> {
        Ok(load(&self.fs, &self.env, &self.profile_files, None).await?)
    }
}
