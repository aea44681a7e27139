use aws_utils::bootstrap::BootstrapFailure;
use snafu::Snafu;
use std::path::PathBuf;

/// The exit status used when the AWS resources could not be bootstrapped.
pub(crate) const BOOTSTRAP_FAILURE_EXIT_CODE: i32 = 254;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum Error {
    #[snafu(display("{}", source))]
    Bootstrap { source: BootstrapFailure },

    #[snafu(display("Unable to clean up: {}", failures.join("; ")))]
    Cleanup { failures: Vec<String> },

    #[snafu(display("Unable to read the bootstrap record from '{}': {}", dir.display(), source))]
    ReadRecord {
        dir: PathBuf,
        source: firehose_e2e_model::Error,
    },

    #[snafu(display(
        "{} was not recorded after bootstrapping{}",
        what,
        cleanup_summary(cleanup_errors)
    ))]
    Unrecorded {
        what: String,
        cleanup_errors: Vec<String>,
    },

    #[snafu(display(
        "Unable to write the bootstrap record to '{}': {}{}",
        dir.display(),
        source,
        cleanup_summary(cleanup_errors)
    ))]
    WriteRecord {
        dir: PathBuf,
        source: firehose_e2e_model::Error,
        /// Failures while removing the unrecorded resources. These resources have leaked.
        cleanup_errors: Vec<String>,
    },
}

fn cleanup_summary(cleanup_errors: &[String]) -> String {
    if cleanup_errors.is_empty() {
        String::new()
    } else {
        format!(
            " (cleanup also failed, resources have leaked: {})",
            cleanup_errors.join("; ")
        )
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Error::Bootstrap { .. } => BOOTSTRAP_FAILURE_EXIT_CODE,
            _ => 1,
        }
    }
}

#[test]
fn bootstrap_failures_exit_with_254() {
    let err = Error::Bootstrap {
        source: BootstrapFailure::Provision {
            resource: "role with prefix 'firehose-http-dest-role'".to_string(),
            source: aws_utils::Error::Missing {
                what: "role arn".to_string(),
                from: "create role output".to_string(),
            },
            rollback_errors: vec!["bucket 'firehose-http-dest-abc': access denied".to_string()],
        },
    };
    assert_eq!(err.exit_code(), BOOTSTRAP_FAILURE_EXIT_CODE);
    assert_eq!(err.exit_code(), 254);
    let message = err.to_string();
    assert!(message.contains("role arn was missing"), "{}", message);
    assert!(message.contains("access denied"), "{}", message);
}

#[test]
fn leaked_resources_are_reported_when_the_record_cannot_be_written() {
    let dir = PathBuf::from("/nonexistent/bootstrap");
    let source = firehose_e2e_model::BootstrapResources::read_from(&dir).unwrap_err();
    let err = Error::WriteRecord {
        dir: dir.clone(),
        source,
        cleanup_errors: vec!["role 'firehose-http-dest-role-abc': throttled".to_string()],
    };
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("resources have leaked"));
    assert!(err.to_string().contains("firehose-http-dest-role-abc"));

    let err = Error::WriteRecord {
        dir,
        source: firehose_e2e_model::BootstrapResources::read_from("/nonexistent").unwrap_err(),
        cleanup_errors: Vec::new(),
    };
    assert!(!err.to_string().contains("leaked"));
}

#[test]
fn other_failures_exit_with_1() {
    let err = Error::Cleanup {
        failures: vec!["bucket 'b': gone".to_string()],
    };
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("bucket 'b': gone"));
    let err = Error::Unrecorded {
        what: "role".to_string(),
        cleanup_errors: Vec::new(),
    };
    assert_eq!(err.exit_code(), 1);
}
