// Pipeline: fetch a comic, download its image, upload it to VK and post it.
// The image only lives on disk for the duration of `run`.

use crate::asset::LocalAsset;
use crate::config::Config;
use crate::error::Result;
use crate::http::build_client;
use crate::vk::{SavedPhoto, VkClient};
use crate::xkcd::{Comic, XkcdClient};
use indicatif::ProgressBar;
use std::path::PathBuf;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub comic: Comic,
    pub photo: SavedPhoto,
    pub post_id: i64,
}

pub struct Pipeline {
    xkcd: XkcdClient,
    vk: VkClient,
    work_dir: PathBuf,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_client()?;
        Ok(Pipeline {
            xkcd: XkcdClient::new(client.clone(), &config.xkcd_url),
            vk: VkClient::new(client, config),
            work_dir: config.work_dir.clone(),
        })
    }

    /// Run every stage once. `comic_num` picks a specific comic, `None`
    /// draws a random one.
    pub fn run(&self, comic_num: Option<u32>, progress: &ProgressBar) -> Result<Published> {
        progress.set_message("Fetching comic...");
        let comic = match comic_num {
            Some(num) => self.xkcd.comic(num)?,
            None => self.xkcd.random_comic()?,
        };

        // Removed on drop, whichever way this function returns.
        let asset = LocalAsset::for_title(&self.work_dir, &comic.title);

        progress.set_message("Downloading image...");
        self.xkcd.download_image(&comic.img, asset.path())?;

        progress.set_message("Uploading to VK...");
        let photo = self.vk.upload_photo(asset.path())?;

        progress.set_message("Posting to wall...");
        let post_id = self.vk.post_to_wall(&photo, &comic.alt)?;

        Ok(Published {
            comic,
            photo,
            post_id,
        })
    }
}
