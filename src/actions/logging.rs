//! Device log capture.

use crate::action::Action;
use crate::device::{self, android, ios, Platform};
use crate::error::{Error, Result};
use crate::utils;
use async_trait::async_trait;
use clap::{Arg, ArgMatches};
use log::info;

pub struct LoggingAction;

#[async_trait]
impl Action for LoggingAction {
    fn verb(&self) -> &'static str {
        "logging"
    }

    fn help(&self) -> &'static str {
        "A set of functions related to device logs"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        cmd.subcommand_required(true).subcommand(
            clap::Command::new("start")
                .about("Start logging process")
                .arg(
                    Arg::new("device")
                        .short('d')
                        .long("device")
                        .help("Device to get log from, auto-selected when exactly one is attached"),
                ),
        )
    }

    async fn run(&self, matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("start", sub)) => start(sub).await,
            Some((other, _)) => Err(Error::UnknownAction(format!("logging {other}"))),
            None => Err(Error::UnknownAction("logging".to_string())),
        }
    }
}

async fn start(matches: &ArgMatches) -> Result<()> {
    let explicit = matches.get_one::<String>("device").map(String::as_str);
    let (device, platform) = device::select_any_device(explicit).await?;

    let target = utils::output_dir().join(format!("{}.txt", utils::epoch_millis()));
    info!(
        "Logging in progress to '{}'... To finish press Ctrl+C",
        target.display()
    );

    match platform {
        Platform::Android => {
            android::clear_log(&device).await?;
            android::stream_log(&device, &target).await?;
        }
        Platform::Ios => ios::stream_log(&device, &target).await?,
    }

    println!("\nFind log at {}", target.display());
    Ok(())
}
