//! Service record construction.

use std::sync::{Arc, LazyLock};

use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::generator::{TokenGenerator, XidGenerator};
use crate::domain::{Labels, Service};

static GLOBAL: LazyLock<ServiceFactory> = LazyLock::new(ServiceFactory::default);

/// Builds [`Service`] records from a token generator and a clock.
#[derive(Clone)]
pub struct ServiceFactory {
    /// Token source.
    generator: Arc<dyn TokenGenerator>,
    /// Creation time source.
    clock: Arc<dyn Clock>,
}

impl ServiceFactory {
    /// Create a factory with explicit collaborators.
    #[must_use]
    pub fn new(generator: Arc<dyn TokenGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { generator, clock }
    }

    /// The process-wide factory: one [`XidGenerator`] and the system clock.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Create a service instance record.
    ///
    /// Mints exactly one fresh token and stamps the clock's current time.
    /// `labels` are moved into the record.
    #[must_use]
    pub fn new_service(
        &self,
        name: impl Into<String>,
        build_id: impl Into<String>,
        labels: Labels,
    ) -> Service {
        let name = name.into();
        let build_id = build_id.into();
        let token = self.generator.next_token();
        let created_at = self.clock.now();

        debug!(
            name = %name,
            build_id = %build_id,
            %token,
            labels = labels.len(),
            "Service instance created"
        );

        Service::from_parts(name, build_id, token, labels, created_at)
    }
}

impl Default for ServiceFactory {
    fn default() -> Self {
        Self::new(Arc::new(XidGenerator::new()), Arc::new(SystemClock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::clock::ManualClock;
    use crate::service::generator::SequenceGenerator;

    use chrono::{TimeZone, Utc};

    #[test]
    fn test_new_service_with_fakes() {
        let now = Utc.with_ymd_and_hms(2026, 1, 23, 12, 0, 0).unwrap();
        let factory = ServiceFactory::new(
            Arc::new(SequenceGenerator::new(1_769_169_600)),
            Arc::new(ManualClock::new(now)),
        );

        let service = factory.new_service(
            "render-worker",
            "build-42",
            Labels::from([("region", "us-east")]),
        );

        assert_eq!(service.name(), "render-worker");
        assert_eq!(service.build_id(), "build-42");
        assert_eq!(service.labels().get("region"), Some("us-east"));
        assert_eq!(service.created_at(), now);
        assert_eq!(service.token().counter(), 1);

        let second = factory.new_service("render-worker", "build-42", Labels::new());
        assert_eq!(second.token().counter(), 2);
        assert_ne!(service.token(), second.token());
    }

    #[test]
    fn test_global_factory_is_shared() {
        assert!(std::ptr::eq(ServiceFactory::global(), ServiceFactory::global()));

        let a = ServiceFactory::global().new_service("a", "1", Labels::new());
        let b = ServiceFactory::global().new_service("b", "1", Labels::new());
        assert_ne!(a.token(), b.token());
        assert_eq!(a.token().machine(), b.token().machine());
        assert_eq!(a.token().pid(), b.token().pid());
    }

    #[test]
    fn test_created_at_is_utc_now() {
        let factory = ServiceFactory::default();
        let before = Utc::now();
        let service = factory.new_service("svc", "dev", Labels::new());
        let after = Utc::now();

        assert!(before <= service.created_at());
        assert!(service.created_at() <= after);
    }
}
