// Library root
// -----------
// Posts a random xkcd comic to a VK community wall. The binary (`main.rs`)
// loads the config and hands it to `pipeline::Pipeline`.
//
// Module responsibilities:
// - `config`: environment-backed settings (group id, token, endpoints).
// - `xkcd`: comic metadata and image download.
// - `vk`: wall photo upload handshake, wall posts, VK error envelopes.
// - `asset`: the temporary image file and its cleanup.
// - `pipeline`: runs the stages in order.
// - `ui`: progress spinner for the terminal.
pub mod asset;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod ui;
pub mod vk;
pub mod xkcd;

pub use error::{Error, Result};
