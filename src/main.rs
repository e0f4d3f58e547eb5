use crate::commands::Cli;
use crate::commands::report::{execute, is_unsupported};
use anyhow::Result;
use cdctl::drive::open_drive;
use clap::Parser;
use log::{debug, error};

mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()?;

    let cli = Cli::parse();
    debug!("Using device {:?}", cli.device);

    // Drive commands block until the hardware answers, so keep them off the async workers.
    let output = tokio::task::spawn_blocking(move || -> Result<String> {
        let mut drive = open_drive(&cli.device)?;
        execute(drive.as_mut(), &cli.command)
    })
    .await?;

    match output {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(err) if is_unsupported(&err) => {
            error!("{err}");
            std::process::exit(2);
        }
        Err(err) => Err(err),
    }
}
