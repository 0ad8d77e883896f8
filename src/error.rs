use thiserror::Error;

use crate::verdict::Status;

/// Terminal failures of a check invocation. Each variant maps onto one
/// monitoring status and carries the message the plugin prints.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("CRL could not be retrieved: {url}")]
    Retrieval {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CRL could not be parsed: {url}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
}

impl CheckError {
    /// Monitoring status this failure reports as: retrieval problems are
    /// CRITICAL, undecodable content is UNKNOWN.
    pub fn status(&self) -> Status {
        match self {
            CheckError::Retrieval { .. } => Status::Critical,
            CheckError::Parse { .. } => Status::Unknown,
        }
    }
}

/// Reasons a fetched byte stream failed to yield a `nextUpdate` timestamp.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid DER structure: {0}")]
    Der(String),

    #[error("invalid PEM wrapping: {0}")]
    Pem(String),

    #[error("PEM block is not an X509 CRL (label: {0})")]
    PemLabel(String),

    #[error("CRL has no nextUpdate field")]
    MissingNextUpdate,

    #[error("nextUpdate is not a representable instant")]
    InvalidNextUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error(url: &str) -> CheckError {
        CheckError::Parse {
            url: url.to_string(),
            source: ParseError::MissingNextUpdate,
        }
    }

    #[test]
    fn parse_failure_reports_unknown() {
        let err = parse_error("http://crl.example/ca.crl");
        assert_eq!(err.status(), Status::Unknown);
        assert_eq!(err.status().exit_code(), 3);
        assert_eq!(
            err.to_string(),
            "CRL could not be parsed: http://crl.example/ca.crl"
        );
    }

    #[test]
    fn retrieval_failure_reports_critical() {
        // A refused loopback connection gives us a real reqwest::Error.
        let source = reqwest::blocking::Client::new()
            .get("http://127.0.0.1:1/ca.crl")
            .send()
            .unwrap_err();
        let err = CheckError::Retrieval {
            url: "http://127.0.0.1:1/ca.crl".to_string(),
            source,
        };
        assert_eq!(err.status(), Status::Critical);
        assert_eq!(err.status().exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "CRL could not be retrieved: http://127.0.0.1:1/ca.crl"
        );
    }
}
