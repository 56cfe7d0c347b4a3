//! Screen recording.

use crate::action::Action;
use crate::device::{self, android};
use crate::error::Result;
use crate::utils::{self, constants, media};
use async_trait::async_trait;
use clap::{value_parser, Arg, ArgMatches};
use std::path::Path;

pub struct VideoAction;

#[async_trait]
impl Action for VideoAction {
    fn verb(&self) -> &'static str {
        "video"
    }

    fn help(&self) -> &'static str {
        "Record video from device"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            Arg::new("device")
                .short('d')
                .long("device")
                .help("Device to record video from, auto-selected when exactly one is attached"),
        )
        .arg(
            Arg::new("bitrate")
                .short('b')
                .long("bitrate")
                .value_parser(value_parser!(u32))
                .default_value("8000000")
                .help("Video bit rate, by default 8000000 (8Mbps)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_parser(value_parser!(u32).range(1..=constants::MAX_RECORD_SECONDS as i64))
                .default_value("180")
                .help("Maximum video duration, seconds (at most 180)"),
        )
        .arg(
            Arg::new("compress")
                .short('c')
                .long("compress")
                .value_parser(value_parser!(bool))
                .default_value("true")
                .help("Compress video after recording or not, by default true"),
        )
    }

    async fn run(&self, matches: &ArgMatches) -> Result<()> {
        let explicit = matches.get_one::<String>("device").map(String::as_str);
        let bitrate = *matches.get_one::<u32>("bitrate").expect("defaulted");
        let timeout = *matches.get_one::<u32>("timeout").expect("defaulted");
        let compress = *matches.get_one::<bool>("compress").expect("defaulted");

        let device = device::select_android_device(explicit).await?;

        let device_path = android::record_video(&device, timeout, bitrate).await?;
        let file_name = Path::new(&device_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| device_path.clone());
        let target = utils::output_dir().join(file_name);

        android::download_file(&device, &device_path, &target).await?;
        android::remove_file(&device, &device_path).await?;

        if compress {
            media::compress_video(&target).await?;
        }

        println!("Find result at {}", target.display());
        Ok(())
    }
}
