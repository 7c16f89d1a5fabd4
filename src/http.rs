// Shared HTTP plumbing for the xkcd and VK clients.

use crate::error::{Error, Result};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("comic-wall/", env!("CARGO_PKG_VERSION"));

/// Build the blocking client shared by every stage of a run.
pub fn build_client() -> Result<Client> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Turn a non-2xx response into `Error::Status`.
pub fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        // VK urls carry the access token in the query string.
        let mut url = response.url().clone();
        url.set_query(None);
        return Err(Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

/// Read the body and decode it, tagging decode failures with the endpoint.
pub fn decode_json<T: DeserializeOwned>(response: Response, endpoint: &'static str) -> Result<T> {
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|source| Error::Decode { endpoint, source })
}
