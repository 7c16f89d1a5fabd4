// UI layer: a terminal spinner that names the stage currently running.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the pipeline runs. Stages update its message.
pub fn stage_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
