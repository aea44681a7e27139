pub use http::StatusCode;
use kube::Error;

pub trait HttpStatusCode {
    fn status_code(&self) -> Option<StatusCode>;

    fn is_status_code(&self, status_code: StatusCode) -> bool {
        self.status_code()
            .map(|some| some == status_code)
            .unwrap_or_default()
    }
}

impl HttpStatusCode for kube::Error {
    fn status_code(&self) -> Option<StatusCode> {
        if let Error::Api(error_response) = self {
            StatusCode::from_u16(error_response.code).ok()
        } else {
            None
        }
    }
}

impl<T, E> HttpStatusCode for std::result::Result<T, E>
where
    E: HttpStatusCode,
{
    fn status_code(&self) -> Option<StatusCode> {
        self.as_ref().err().and_then(|e| e.status_code())
    }
}

/// Turns a `NOT_FOUND` error into `Ok(None)`. The error is handed to `f` first, e.g. for logging.
/// Any other error is returned unchanged.
pub trait AllowNotFound<T, E> {
    fn allow_not_found<F>(self, f: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(E);
}

impl<T, E> AllowNotFound<T, E> for std::result::Result<T, E>
where
    E: HttpStatusCode,
{
    fn allow_not_found<F>(self, f: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(E),
    {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_status_code(StatusCode::NOT_FOUND) => {
                f(e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use kube::error::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "test".to_string(),
            reason: "test".to_string(),
            code,
        })
    }

    #[test]
    fn not_found_becomes_none() {
        let result: std::result::Result<u8, kube::Error> = Err(api_error(404));
        assert!(result.is_status_code(StatusCode::NOT_FOUND));
        let mut seen = false;
        assert!(result.allow_not_found(|_| seen = true).unwrap().is_none());
        assert!(seen);
    }

    #[test]
    fn other_errors_pass_through() {
        let result: std::result::Result<u8, kube::Error> = Err(api_error(409));
        assert_eq!(result.status_code(), Some(StatusCode::CONFLICT));
        assert!(result.allow_not_found(|_| ()).is_err());
        let ok: std::result::Result<u8, kube::Error> = Ok(7);
        assert_eq!(ok.allow_not_found(|_| ()).unwrap(), Some(7));
    }
}
