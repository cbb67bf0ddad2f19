use async_trait::async_trait;

use crate::profile::{ProfileDescriptor, ProfileSet};

pub mod aws_sdk;

#[async_trait]
pub trait LoadProfiles: Send + Sync {
    async fn load_profiles(&self) -> anyhow::Result<ProfileSet>;

    async fn load_profile(&self, profile_name: &str) -> anyhow::Result<ProfileDescriptor> {
        let mut profiles = self.load_profiles().await?;
        profiles
            .take_profile(profile_name)
            .ok_or_else(|| anyhow::anyhow!("No profile found. profile_name:{}", profile_name))
    }
}
