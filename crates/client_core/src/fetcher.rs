use std::{collections::HashSet, fs, path::Path, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use shared::{
    domain::{DashboardField, FieldValue, ProfileSnapshot},
    error::{ErrorCode, FetchError},
};

#[async_trait]
pub trait DashboardFetcher: Send + Sync {
    /// Resolves one field. `Ok(None)` means the backend has no value for it.
    async fn fetch(&self, field: DashboardField) -> Result<Option<FieldValue>, FetchError>;
}

pub struct MissingFetcher;

#[async_trait]
impl DashboardFetcher for MissingFetcher {
    async fn fetch(&self, field: DashboardField) -> Result<Option<FieldValue>, FetchError> {
        Err(FetchError::unavailable(field))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    profile: ProfileSnapshot,
    failing: HashSet<DashboardField>,
    latency: Duration,
}

impl StaticFetcher {
    pub fn new(profile: ProfileSnapshot) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read profile fixture '{}'", path.display()))?;
        let profile: ProfileSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("invalid profile fixture '{}'", path.display()))?;
        Ok(Self::new(profile))
    }

    pub fn with_failure(mut self, field: DashboardField) -> Self {
        self.failing.insert(field);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn profile(&self) -> &ProfileSnapshot {
        &self.profile
    }
}

#[async_trait]
impl DashboardFetcher for StaticFetcher {
    async fn fetch(&self, field: DashboardField) -> Result<Option<FieldValue>, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.contains(&field) {
            return Err(FetchError::new(
                field,
                ErrorCode::Internal,
                "simulated backend failure",
            ));
        }
        Ok(self.profile.get(field))
    }
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
