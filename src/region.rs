use std::fmt;

use async_trait::async_trait;

use crate::profile::ProfileDescriptor;

pub mod aws_sdk;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    Profile,
    Environment,
    Default,
}

impl fmt::Display for RegionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionSource::Profile => f.write_str("profile"),
            RegionSource::Environment => f.write_str("environment"),
            RegionSource::Default => f.write_str("default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegion {
    pub name: String,
    pub source: RegionSource,
}

#[async_trait]
pub trait ResolveRegion: Send + Sync {
    async fn resolve_region(&self, profile: &ProfileDescriptor) -> anyhow::Result<ResolvedRegion>;
}
