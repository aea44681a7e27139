/*!

End-to-end tests for the ACK Firehose controller. This library holds the fixture that creates and
tears down delivery streams, and the checks that compare the custom resource with the Firehose API.
The tests themselves live in `tests/` behind the `integ` feature.

Settings are read from `FIREHOSE_E2E_*` environment variables, see [`TestSettings`].

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use error::{Error, Result};
pub use fixture::{HttpDestStream, TestContext};
pub use settings::TestSettings;
use std::time::Duration;

pub mod assertions;
mod error;
mod fixture;
mod settings;

/// How long to let the controller notice a spec change before waiting for it to sync.
pub const UPDATE_WAIT: Duration = Duration::from_secs(10);

/// Initializes logging for a test. `RUST_LOG` takes precedence, otherwise our crates log at `info`.
/// Safe to call from every test.
pub fn init_test_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        "firehose_e2e=info,firehose_e2e_model=info,aws_utils=info,delivery_stream_test=info",
    ))
    .is_test(true)
    .try_init();
}
