// VK client: wall photo upload handshake and community wall posts.
//
// Every VK method can answer HTTP 200 with `{"error": {...}}` instead of a
// `response`, so each JSON body goes through `check_response` before any
// field is read.

use crate::config::{Config, VK_API_VERSION};
use crate::error::{Error, Result};
use crate::http::{check_status, decode_json};
use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize)]
struct VkResponse<T> {
    response: T,
}

#[derive(Deserialize)]
struct VkApiError {
    error_code: i64,
    error_msg: String,
}

#[derive(Deserialize)]
struct UploadServer {
    upload_url: String,
}

/// What the upload server hands back for a posted file. Opaque to us; it is
/// passed verbatim to `photos.saveWallPhoto`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UploadedPhoto {
    pub server: i64,
    pub photo: String,
    pub hash: String,
}

/// A photo registered on the community wall.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedPhoto {
    pub owner_id: i64,
    pub id: i64,
}

impl SavedPhoto {
    /// Attachment reference for `wall.post`, e.g. `photo-123_456`.
    pub fn attachment(&self) -> String {
        format!("photo{}_{}", self.owner_id, self.id)
    }
}

#[derive(Deserialize)]
struct PostCreated {
    post_id: i64,
}

/// Fail on a VK error envelope, otherwise hand the payload back untouched.
pub fn check_response(value: Value) -> Result<Value> {
    if let Some(error) = value.get("error") {
        let error: VkApiError =
            serde_json::from_value(error.clone()).map_err(|source| Error::Decode {
                endpoint: "VK error",
                source,
            })?;
        return Err(Error::Vk {
            code: error.error_code,
            message: error.error_msg,
        });
    }
    Ok(value)
}

fn parse<T: DeserializeOwned>(response: Response, endpoint: &'static str) -> Result<T> {
    let response = check_status(response)?;
    let value = check_response(decode_json(response, endpoint)?)?;
    serde_json::from_value(value).map_err(|source| Error::Decode { endpoint, source })
}

pub struct VkClient {
    client: Client,
    api_url: String,
    token: String,
    group_id: u64,
    wall_owner: String,
}

impl VkClient {
    pub fn new(client: Client, config: &Config) -> Self {
        VkClient {
            client,
            api_url: config.vk_api_url.clone(),
            token: config.token.clone(),
            group_id: config.group_id,
            wall_owner: config.wall_owner_id(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_url, method)
    }

    /// Upload a local image to the community wall album: ask for an upload
    /// url, post the file there, then save it.
    pub fn upload_photo(&self, file: &Path) -> Result<SavedPhoto> {
        let upload_url = self.wall_upload_server()?;
        let uploaded = self.send_file(&upload_url, file)?;
        let saved = self.save_wall_photo(&uploaded)?;
        info!(attachment = %saved.attachment(), "photo uploaded");
        Ok(saved)
    }

    pub fn wall_upload_server(&self) -> Result<String> {
        let group_id = self.group_id.to_string();
        let response = self
            .client
            .get(self.method_url("photos.getWallUploadServer"))
            .query(&[
                ("group_id", group_id.as_str()),
                ("access_token", self.token.as_str()),
                ("v", VK_API_VERSION),
            ])
            .send()?;
        let server: VkResponse<UploadServer> = parse(response, "photos.getWallUploadServer")?;
        debug!(url = %server.response.upload_url, "got upload server");
        Ok(server.response.upload_url)
    }

    pub fn send_file(&self, upload_url: &str, file: &Path) -> Result<UploadedPhoto> {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "comic.png".into());
        let reader = File::open(file)?;
        let part = multipart::Part::reader(reader)
            .file_name(file_name)
            .mime_str("image/png")?;
        let form = multipart::Form::new().part("photo", part);

        debug!(path = %file.display(), "sending file to upload server");
        let response = self.client.post(upload_url).multipart(form).send()?;
        parse(response, "photo upload")
    }

    pub fn save_wall_photo(&self, uploaded: &UploadedPhoto) -> Result<SavedPhoto> {
        let group_id = self.group_id.to_string();
        let server = uploaded.server.to_string();
        let response = self
            .client
            .post(self.method_url("photos.saveWallPhoto"))
            .query(&[
                ("access_token", self.token.as_str()),
                ("server", server.as_str()),
                ("photo", uploaded.photo.as_str()),
                ("hash", uploaded.hash.as_str()),
                ("group_id", group_id.as_str()),
                ("v", VK_API_VERSION),
            ])
            .send()?;
        let saved: VkResponse<Vec<SavedPhoto>> = parse(response, "photos.saveWallPhoto")?;
        saved
            .response
            .into_iter()
            .next()
            .ok_or(Error::MissingField {
                endpoint: "photos.saveWallPhoto",
                field: "response[0]",
            })
    }

    /// Publish a post on the community wall as the community itself.
    /// Returns the new post id.
    pub fn post_to_wall(&self, photo: &SavedPhoto, message: &str) -> Result<i64> {
        let attachment = photo.attachment();
        let response = self
            .client
            .post(self.method_url("wall.post"))
            .query(&[
                ("access_token", self.token.as_str()),
                ("owner_id", self.wall_owner.as_str()),
                ("from_group", "1"),
                ("attachments", attachment.as_str()),
                ("message", message),
                ("v", VK_API_VERSION),
            ])
            .send()?;
        let created: VkResponse<PostCreated> = parse(response, "wall.post")?;
        info!(post_id = created.response.post_id, "posted to wall");
        Ok(created.response.post_id)
    }
}
