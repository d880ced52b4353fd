//! QoS options.

use std::time::Duration;

use crate::config::schema::{FileGlobalConfiguration, FileRoute};
use crate::resolve::cascade;
use crate::routing::options::QosOptions;

pub trait QosResolver: Send + Sync {
    fn resolve(&self, route: &FileRoute, global: &FileGlobalConfiguration) -> QosOptions;
}

/// Each field: route value, else global default, else zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileQosResolver;

impl QosResolver for FileQosResolver {
    fn resolve(&self, route: &FileRoute, global: &FileGlobalConfiguration) -> QosOptions {
        cascade_qos(route, global)
    }
}

pub fn cascade_qos(route: &FileRoute, global: &FileGlobalConfiguration) -> QosOptions {
    let (route, global) = (&route.qos, &global.qos);
    QosOptions {
        exceptions_allowed_before_breaking: cascade(
            route.exceptions_allowed_before_breaking,
            global.exceptions_allowed_before_breaking,
            0,
        ),
        duration_of_break: Duration::from_millis(cascade(
            route.duration_of_break_ms,
            global.duration_of_break_ms,
            0,
        )),
        timeout: Duration::from_millis(cascade(route.timeout_ms, global.timeout_ms, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_by_field_override() {
        let mut global = FileGlobalConfiguration::default();
        global.qos.exceptions_allowed_before_breaking = Some(5);
        global.qos.duration_of_break_ms = Some(10_000);
        global.qos.timeout_ms = Some(2_000);

        let mut route = FileRoute::default();
        route.qos.timeout_ms = Some(500);

        let options = FileQosResolver.resolve(&route, &global);
        assert_eq!(options.exceptions_allowed_before_breaking, 5);
        assert_eq!(options.duration_of_break, Duration::from_secs(10));
        assert_eq!(options.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_nothing_configured() {
        let options = FileQosResolver.resolve(&FileRoute::default(), &FileGlobalConfiguration::default());
        assert_eq!(options, QosOptions::default());
    }
}
