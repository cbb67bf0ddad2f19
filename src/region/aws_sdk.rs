use async_trait::async_trait;
use aws_config::default_provider::region::DefaultRegionChain;
use aws_config::meta::region::ProvideRegion;
use tracing::debug;

use crate::defaults;
use crate::profile::ProfileDescriptor;
use crate::region::{RegionSource, ResolveRegion, ResolvedRegion};

/// Profile region first, then the SDK's default region chain for the
/// profile (environment, shared config, IMDS), then `us-east-1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsSdkRegionResolver;

#[async_trait]
impl ResolveRegion for AwsSdkRegionResolver {
    async fn resolve_region(&self, profile: &ProfileDescriptor) -> anyhow::Result<ResolvedRegion> {
        if let Some(region) = profile.normalized.region() {
            return Ok(ResolvedRegion {
                name: region.to_string(),
                source: RegionSource::Profile,
            });
        }

        let discovered = DefaultRegionChain::builder()
            .profile_name(profile.name())
            .build()
            .region()
            .await;

        let resolved = match discovered {
            Some(region) => ResolvedRegion {
                name: region.to_string(),
                source: RegionSource::Environment,
            },
            None => ResolvedRegion {
                name: defaults::REGION.to_string(),
                source: RegionSource::Default,
            },
        };
        debug!(
            "region resolved. profile:{}, region:{}, source:{}",
            profile.name(),
            resolved.name,
            resolved.source
        );
        Ok(resolved)
    }
}
