use crate::clients::{HttpStatusCode, StatusCode};
use snafu::Snafu;
use std::time::Duration;

/// The `Result` type returned by `clients`.
pub type Result<T> = std::result::Result<T, Error>;

/// The public error type returned by `clients`.
#[derive(Debug, Snafu)]
pub struct Error(InnerError);

/// The private error type returned by `clients`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub(crate) enum InnerError {
    #[snafu(display("Unable to serialize '{}': {}", what, source))]
    Serde {
        what: String,
        source: serde_json::Error,
    },

    #[snafu(display("Error initializing the Kubernetes client: {}", source))]
    Initialization { source: kube::Error },

    #[snafu(display("Unable to {} {}: {}", method, what, source))]
    KubeApiCall {
        method: String,
        what: String,
        source: kube::Error,
    },

    #[snafu(display("Unable to {} for '{}': {}", operation, name, source))]
    KubeApiCallFor {
        /// What we were trying to do, e.g. 'patch encryption configuration'.
        operation: String,
        /// The name of the k8s object we were trying to do this for, e.g. 'my-stream'.
        name: String,
        /// The error from kube-rs.
        source: kube::Error,
    },

    #[snafu(display(
        "{} '{}' was not given a status by the controller within {:?}",
        kind,
        name,
        waited
    ))]
    ConsumeTimeout {
        kind: String,
        name: String,
        waited: Duration,
    },

    #[snafu(display(
        "Condition '{}' of {} '{}' did not become '{}' within {:?}, last observed: {}",
        condition_type,
        kind,
        name,
        expected,
        waited,
        last_observed.as_deref().unwrap_or("<none>")
    ))]
    ConditionTimeout {
        kind: String,
        name: String,
        condition_type: String,
        expected: String,
        last_observed: Option<String>,
        waited: Duration,
    },

    #[snafu(display("{} '{}' still existed {:?} after deletion", kind, name, waited))]
    DeleteTimeout {
        kind: String,
        name: String,
        waited: Duration,
    },
}

impl HttpStatusCode for InnerError {
    fn status_code(&self) -> Option<StatusCode> {
        match self {
            InnerError::Serde { .. } | InnerError::Initialization { .. } => None,
            InnerError::KubeApiCall { source: e, .. } => e.status_code(),
            InnerError::KubeApiCallFor { source: e, .. } => e.status_code(),
            InnerError::ConsumeTimeout { .. }
            | InnerError::ConditionTimeout { .. }
            | InnerError::DeleteTimeout { .. } => None,
        }
    }
}

impl HttpStatusCode for Error {
    fn status_code(&self) -> Option<StatusCode> {
        self.0.status_code()
    }
}
