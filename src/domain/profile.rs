//! Profile kinds and ownership.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Service;

/// Kind of profile data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    /// CPU time samples.
    Cpu,
    /// Heap allocations.
    Heap,
    /// Goroutine or thread stacks.
    Goroutine,
    /// Lock contention.
    Mutex,
    /// Blocking operations.
    Block,
    /// Any other kind, by name.
    ///
    /// Build it with [`ProfileType::custom`]. A `Custom` holding a known
    /// name such as `"cpu"` is written as that name and reads back as the
    /// known variant.
    #[serde(untagged)]
    Custom(String),
}

impl ProfileType {
    /// Profile kind for `name`, resolving known names to their variant.
    #[must_use]
    pub fn custom(name: impl AsRef<str>) -> Self {
        match name.as_ref() {
            "cpu" => Self::Cpu,
            "heap" => Self::Heap,
            "goroutine" => Self::Goroutine,
            "mutex" => Self::Mutex,
            "block" => Self::Block,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Name of this profile kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cpu => "cpu",
            Self::Heap => "heap",
            Self::Goroutine => "goroutine",
            Self::Mutex => "mutex",
            Self::Block => "block",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::custom(s))
    }
}

/// Profile data of some kind, optionally owned by a service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile kind.
    #[serde(rename = "Type")]
    pub profile_type: ProfileType,

    /// Owning service instance, if any.
    #[serde(rename = "Service")]
    pub service: Option<Arc<Service>>,
}

impl Profile {
    /// A profile with no owning service.
    #[must_use]
    pub const fn anonymous(profile_type: ProfileType) -> Self {
        Self {
            profile_type,
            service: None,
        }
    }

    /// A profile owned by `service`.
    #[must_use]
    pub const fn owned(profile_type: ProfileType, service: Arc<Service>) -> Self {
        Self {
            profile_type,
            service: Some(service),
        }
    }

    /// Whether no service owns this profile.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.service.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Labels;

    #[test]
    fn test_profile_type_names() {
        assert_eq!(ProfileType::Cpu.to_string(), "cpu");
        assert_eq!("heap".parse::<ProfileType>().unwrap(), ProfileType::Heap);
        assert_eq!(
            "wall".parse::<ProfileType>().unwrap(),
            ProfileType::Custom("wall".to_string())
        );
        assert_eq!(ProfileType::Custom("wall".to_string()).as_str(), "wall");
    }

    #[test]
    fn test_profile_type_json() {
        assert_eq!(
            serde_json::to_string(&ProfileType::Goroutine).unwrap(),
            r#""goroutine""#
        );
        assert_eq!(
            serde_json::to_string(&ProfileType::Custom("wall".to_string())).unwrap(),
            r#""wall""#
        );
        assert_eq!(
            serde_json::from_str::<ProfileType>(r#""mutex""#).unwrap(),
            ProfileType::Mutex
        );
        assert_eq!(
            serde_json::from_str::<ProfileType>(r#""wall""#).unwrap(),
            ProfileType::Custom("wall".to_string())
        );
    }

    #[test]
    fn test_custom_normalizes_known_names() {
        assert_eq!(ProfileType::custom("cpu"), ProfileType::Cpu);
        assert_eq!(ProfileType::custom("block"), ProfileType::Block);
        assert_eq!(
            ProfileType::custom("wall"),
            ProfileType::Custom("wall".to_string())
        );

        let kind = ProfileType::custom(String::from("heap"));
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(serde_json::from_str::<ProfileType>(&json).unwrap(), kind);
    }

    #[test]
    fn test_anonymous_profile() {
        let profile = Profile::anonymous(ProfileType::Block);
        assert!(profile.is_anonymous());

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json, serde_json::json!({ "Type": "block", "Service": null }));
    }

    #[test]
    fn test_owned_profiles_share_service() {
        let service = Arc::new(Service::new("render-worker", "build-42", Labels::new()));
        let cpu = Profile::owned(ProfileType::Cpu, Arc::clone(&service));
        let heap = Profile::owned(ProfileType::Heap, Arc::clone(&service));

        assert!(!cpu.is_anonymous());
        assert_eq!(
            cpu.service.as_ref().map(|s| s.token()),
            heap.service.as_ref().map(|s| s.token())
        );
        assert_eq!(Arc::strong_count(&service), 3);
    }
}
