use crate::error::{self, Result};
use snafu::ensure;

const DELIMITER: &str = "-";

/// Creates a name that starts with `prefix`, followed by `-` and enough random lowercase
/// hexadecimal characters to make the name exactly `max_len` characters long. Used to keep the
/// names of test resources unique across concurrent runs.
pub fn random_suffix_name(prefix: &str, max_len: usize) -> Result<String> {
    let fixed_len = prefix.len() + DELIMITER.len();
    ensure!(
        max_len > fixed_len,
        error::NameTooLongSnafu {
            prefix,
            max_len,
        }
    );
    let suffix_len = max_len - fixed_len;
    let mut suffix = String::with_capacity(suffix_len);
    while suffix.len() < suffix_len {
        suffix.push_str(&uuid::Uuid::new_v4().simple().to_string());
    }
    suffix.truncate(suffix_len);
    Ok(format!("{}{}{}", prefix, DELIMITER, suffix))
}
