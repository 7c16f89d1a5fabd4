// xkcd client: picks a comic, reads its metadata and downloads the image.

use crate::config::MAX_COMIC_NUM;
use crate::error::Result;
use crate::http::{check_status, decode_json};
use rand::Rng;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Metadata of one comic as served by `/{num}/info.0.json`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Comic {
    pub num: u32,
    pub img: String,
    pub title: String,
    pub alt: String,
}

pub struct XkcdClient {
    client: Client,
    base_url: String,
}

/// Draw a comic number in `1..=MAX_COMIC_NUM`.
pub fn random_comic_num<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(1..=MAX_COMIC_NUM)
}

impl XkcdClient {
    /// `base_url` has no trailing slash; `Config` already trims it.
    pub fn new(client: Client, base_url: &str) -> Self {
        XkcdClient {
            client,
            base_url: base_url.to_string(),
        }
    }

    pub fn comic_url(&self, num: u32) -> String {
        format!("{}/{}/info.0.json", self.base_url, num)
    }

    pub fn random_comic(&self) -> Result<Comic> {
        let num = random_comic_num(&mut rand::thread_rng());
        self.comic(num)
    }

    pub fn comic(&self, num: u32) -> Result<Comic> {
        let url = self.comic_url(num);
        debug!(%url, "fetching comic metadata");
        let response = check_status(self.client.get(&url).send()?)?;
        let comic: Comic = decode_json(response, "xkcd")?;
        info!(num = comic.num, title = %comic.title, "picked comic");
        Ok(comic)
    }

    /// Download `img_url` into `dest`, replacing any existing file. The file
    /// is only created once the server has answered with a 2xx status.
    pub fn download_image(&self, img_url: &str, dest: &Path) -> Result<()> {
        debug!(url = %img_url, path = %dest.display(), "downloading image");
        let response = check_status(self.client.get(img_url).send()?)?;
        let bytes = response.bytes()?;
        std::fs::write(dest, &bytes)?;
        debug!(size = bytes.len(), "image saved");
        Ok(())
    }
}
