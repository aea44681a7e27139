use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
pub struct Error(OpaqueError);
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum OpaqueError {
    #[snafu(display("Unable to access '{}': {}", path.display(), source))]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to deserialize {}: {}", what, source))]
    Json {
        what: String,
        source: serde_json::Error,
    },

    #[snafu(display(
        "Prefix '{}' leaves no room for a random suffix in a name of at most {} characters",
        prefix,
        max_len
    ))]
    NameTooLong { prefix: String, max_len: usize },

    #[snafu(display("Template placeholders were not replaced: {}", placeholders))]
    UnresolvedPlaceholder { placeholders: String },

    #[snafu(display("Unable to serialize or deserialize {}: {}", what, source))]
    Yaml {
        what: String,
        source: serde_yaml::Error,
    },
}
