//! Capability directory: the fixed registry of groups

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::{CapabilityGroup, GroupDescriptor};
use crate::config::BtcPayConfig;
use crate::remote::{BtcPayClient, RemoteCollaborator, Unconfigured};
use crate::services;
use crate::Result;

/// Registry of capability groups, fixed after construction
pub struct CapabilityDirectory {
    groups: Vec<CapabilityGroup>,
    index: HashMap<String, usize>,
}

impl CapabilityDirectory {
    /// Build the full BTCPayServer catalogue on one shared collaborator
    pub fn new(remote: Arc<dyn RemoteCollaborator>) -> Self {
        Self::from_groups(services::catalogue(&remote))
    }

    /// Connect to the configured server and build the catalogue
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when the configuration is incomplete.
    pub fn connect(config: &BtcPayConfig) -> Result<Self> {
        let client = BtcPayClient::new(config)?;
        info!(base_url = %config.base_url, "Connected capability directory");
        Ok(Self::new(Arc::new(client)))
    }

    /// Catalogue for offline discovery; every call fails with `reason`
    pub fn offline(reason: impl Into<String>) -> Self {
        Self::new(Arc::new(Unconfigured::new(reason)))
    }

    /// Build from explicit groups, keeping registration order.
    ///
    /// A group whose name is already registered is skipped.
    pub fn from_groups(groups: impl IntoIterator<Item = CapabilityGroup>) -> Self {
        let mut directory = Self {
            groups: Vec::new(),
            index: HashMap::new(),
        };
        for group in groups {
            if directory.index.contains_key(group.name()) {
                warn!(group = %group.name(), "Duplicate capability group skipped");
                continue;
            }
            directory
                .index
                .insert(group.name().to_string(), directory.groups.len());
            directory.groups.push(group);
        }
        directory
    }

    /// Case-sensitive lookup by name
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&CapabilityGroup> {
        self.index.get(name).map(|&i| &self.groups[i])
    }

    /// Group names in registration order
    #[must_use]
    pub fn list_names(&self) -> Vec<&str> {
        self.groups.iter().map(CapabilityGroup::name).collect()
    }

    /// Groups whose category matches exactly
    #[must_use]
    pub fn list_by_category(&self, category: &str) -> Vec<&CapabilityGroup> {
        self.groups
            .iter()
            .filter(|g| g.category() == category)
            .collect()
    }

    /// Distinct categories in first-seen order
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for group in &self.groups {
            if !seen.contains(&group.category()) {
                seen.push(group.category());
            }
        }
        seen
    }

    /// Descriptors of every group in registration order
    #[must_use]
    pub fn describe_all(&self) -> Vec<&GroupDescriptor> {
        self.groups.iter().map(CapabilityGroup::describe).collect()
    }

    /// Number of registered groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
