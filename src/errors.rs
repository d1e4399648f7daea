use thiserror::Error;

#[derive(Debug, Error)]
pub enum DnsError {
    #[error("No zone selected, look up a zone first")]
    NoZoneSelected,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The envelope came back with `success: false`.
    #[error("Cloudflare API error: {message}")]
    Api { message: String, raw: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not a JSON envelope, usually a proxy error page or a cut connection.
    #[error("Could not parse response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Prompt aborted: {0}")]
    Prompt(String),
}

impl DnsError {
    /// Raw response body worth echoing back to the operator, if any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            DnsError::Api { raw, .. } | DnsError::Decode { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl From<inquire::InquireError> for DnsError {
    fn from(err: inquire::InquireError) -> Self {
        DnsError::Prompt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_only_for_remote_failures() {
        let api = DnsError::Api {
            message: "Record does not exist".to_string(),
            raw: r#"{"success":false}"#.to_string(),
        };
        assert_eq!(api.raw_response(), Some(r#"{"success":false}"#));
        assert_eq!(DnsError::NoZoneSelected.raw_response(), None);
        assert_eq!(DnsError::NotFound("Zone".into()).to_string(), "Zone not found");
    }
}
