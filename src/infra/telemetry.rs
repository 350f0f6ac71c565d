use std::sync::Once;

use metrics::{Unit, describe_counter};

use crate::application::invalidation::{
    METRIC_INVALIDATIONS_TOTAL, METRIC_TRACKED_CHANGES_TOTAL,
};
use crate::application::publish::METRIC_PUBLISH_FLUSHES_TOTAL;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Register metric descriptions with the host's installed recorder.
///
/// The host owns recorder and subscriber installation; this only describes
/// the counters the engine emits.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_INVALIDATIONS_TOTAL,
            Unit::Count,
            "Total number of cache tags invalidated."
        );
        describe_counter!(
            METRIC_TRACKED_CHANGES_TOTAL,
            Unit::Count,
            "Total number of tracked entity changes recorded in the publish queue."
        );
        describe_counter!(
            METRIC_PUBLISH_FLUSHES_TOTAL,
            Unit::Count,
            "Total number of publish-queue flushes."
        );
    });
}
