mod crd_client;
mod delivery_stream_client;
mod error;
mod http_status_code;
mod wait;

pub use crd_client::CrdClient;
pub use delivery_stream_client::DeliveryStreamClient;
pub use error::{Error, Result};
pub use http_status_code::{AllowNotFound, HttpStatusCode, StatusCode};
pub use wait::WaitPeriods;
