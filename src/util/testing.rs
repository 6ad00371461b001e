use std::env;
use std::sync::Once;

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{ManagerRef, PersonRecord};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "orgtree=trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Record with a `name` field and an optional bare manager id.
pub fn person(id: &str, name: &str, manager: Option<&str>) -> PersonRecord {
    let record = PersonRecord::new(id).with_field("name", name);
    match manager {
        Some(manager) => record.with_manager(manager),
        None => record,
    }
}

/// Record whose manager link is given as raw JSON.
pub fn person_with_raw_manager(id: &str, manager: Value) -> PersonRecord {
    PersonRecord::new(id).with_manager_ref(ManagerRef::from(manager))
}
