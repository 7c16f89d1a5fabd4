// Entrypoint for the CLI application.
// - Keeps `main` small: load config, build the pipeline, run it once.
// - A failed run is logged and the process still exits 0; only a bad
//   configuration makes `main` return an error.

use anyhow::Context;
use clap::Parser;
use comic_wall::{config::Config, pipeline::Pipeline, ui::stage_spinner};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "comic-wall")]
#[command(about = "Post a random xkcd comic to a VK community wall", long_about = None)]
struct Cli {
    /// Post this comic number instead of a random one
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    comic: Option<u32>,

    /// Directory for the temporary image file
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    // A missing .env file is fine; the variables may come from the shell.
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("failed to load configuration")?;

    publish(&cli, config)
}

/// Run the pipeline once. Pipeline failures are logged, not returned.
fn publish(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let config = config.with_work_dir(&cli.work_dir);
    let pipeline = Pipeline::new(&config).context("failed to build HTTP client")?;

    let spinner = stage_spinner();
    let outcome = pipeline.run(cli.comic, &spinner);
    spinner.finish_and_clear();

    match outcome {
        Ok(published) => info!(
            comic = published.comic.num,
            post_id = published.post_id,
            "published \"{}\"",
            published.comic.title
        ),
        Err(err) => error!("{} error occurred: {err}", err.category()),
    }
    Ok(())
}
