//! Service identity configuration.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::Labels;

/// Identity of the running process, used to build its [`Service`] record.
///
/// [`Service`]: crate::domain::Service
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service or component name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Build or version marker.
    #[serde(default = "default_build_id")]
    pub build_id: String,

    /// Labels attached to the instance.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ServiceConfig {
    /// Labels as a domain value.
    #[must_use]
    pub fn labels(&self) -> Labels {
        Labels::from(self.labels.clone())
    }
}

fn default_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_build_id() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            build_id: default_build_id(),
            labels: BTreeMap::new(),
        }
    }
}
