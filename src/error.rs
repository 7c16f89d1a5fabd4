// Error module: one tagged error type for every stage of the pipeline.
// Transport failures, bad HTTP statuses and VK's own error envelope are
// kept apart so the binary can report each with its own message.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid startup configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or transport failure from the HTTP client. The url it
    /// carries has its query string removed.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// VK answered 200 but the body carried an `error` object.
    #[error("VK API error {code}: {message}")]
    Vk { code: i64, message: String },

    /// A response body could not be decoded into the expected shape.
    #[error("unexpected {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing `{field}` in {endpoint} response")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// VK urls carry the access token in the query string, and reqwest prints
// the url in both Display and Debug.
impl From<reqwest::Error> for Error {
    fn from(mut err: reqwest::Error) -> Self {
        if let Some(url) = err.url_mut() {
            url.set_query(None);
        }
        Error::Request(err)
    }
}

impl Error {
    /// Short label used when logging a failed run.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration",
            Error::Request(_) => "request",
            Error::Status { .. } => "HTTP",
            Error::Vk { .. } => "VK API",
            Error::Decode { .. } | Error::MissingField { .. } => "response format",
            Error::Io(_) => "file system",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vk_error_message_carries_code_and_text() {
        let err = Error::Vk {
            code: 5,
            message: "bad token".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("bad token"));
        assert_eq!(err.category(), "VK API");
    }

    #[test]
    fn decode_and_missing_field_share_a_category() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let decode = Error::Decode {
            endpoint: "xkcd",
            source,
        };
        let missing = Error::MissingField {
            endpoint: "photos.saveWallPhoto",
            field: "response[0]",
        };
        assert_eq!(decode.category(), missing.category());
        assert_eq!(
            missing.to_string(),
            "missing `response[0]` in photos.saveWallPhoto response"
        );
    }

    #[test]
    fn transport_error_drops_query_string() {
        let client = reqwest::blocking::Client::new();
        let err: Error = client
            .get("http://127.0.0.1:1/method/photos.getWallUploadServer")
            .query(&[("group_id", "123"), ("access_token", "SECRETTOKEN")])
            .send()
            .unwrap_err()
            .into();

        assert!(matches!(err, Error::Request(_)));
        assert_eq!(err.category(), "request");
        assert!(!err.to_string().contains("SECRETTOKEN"), "{err}");
        assert!(!format!("{err:?}").contains("SECRETTOKEN"));
        assert!(err.to_string().contains("photos.getWallUploadServer"));
    }

    #[test]
    fn status_error_names_url() {
        let err = Error::Status {
            status: 404,
            url: "https://xkcd.com/1/info.0.json".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://xkcd.com/1/info.0.json");
        assert_eq!(err.category(), "HTTP");
    }
}
