use firehose_e2e_model::clients;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("AWS call failed: {}", source))]
    Aws { source: aws_utils::Error },

    #[snafu(display("Kubernetes call failed: {}", source))]
    Client { source: clients::Error },

    #[snafu(display("Unexpected {}: expected '{}', got '{}'", what, expected, actual))]
    Mismatch {
        what: String,
        expected: String,
        actual: String,
    },

    #[snafu(display("{}", source))]
    Model { source: firehose_e2e_model::Error },

    #[snafu(display(
        "Unable to read settings from '{}*' environment variables: {}",
        prefix,
        message
    ))]
    Settings { prefix: String, message: String },

    #[snafu(display("Tags of '{}' differ from the expected tags: {}", name, delta))]
    TagMismatch { name: String, delta: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<clients::Error> for Error {
    fn from(source: clients::Error) -> Self {
        Error::Client { source }
    }
}

impl From<aws_utils::Error> for Error {
    fn from(source: aws_utils::Error) -> Self {
        Error::Aws { source }
    }
}

impl From<firehose_e2e_model::Error> for Error {
    fn from(source: firehose_e2e_model::Error) -> Self {
        Error::Model { source }
    }
}
