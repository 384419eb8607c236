mod assert;
mod labels;

pub use assert::*;
pub use labels::*;

use hostprefix_core::prelude::OutgoingRequest;

pub const TEST_OPERATION: &str = "TestOperation";

/// GET request against `endpoint`, named [`TEST_OPERATION`].
pub fn request(endpoint: &str) -> OutgoingRequest {
    OutgoingRequest::new(TEST_OPERATION, http::Method::GET, endpoint)
        .unwrap_or_else(|e| panic!("invalid test endpoint {endpoint:?}: {e}"))
}

/// Routes `tracing` output through the test harness; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hostprefix_core=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
