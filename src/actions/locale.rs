//! Locale changes on Android devices.

use crate::action::Action;
use crate::device::{self, android};
use crate::error::Result;
use async_trait::async_trait;
use clap::{Arg, ArgMatches};

pub struct LocaleAction;

#[async_trait]
impl Action for LocaleAction {
    fn verb(&self) -> &'static str {
        "locale"
    }

    fn help(&self) -> &'static str {
        "Set locale on device"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            Arg::new("device")
                .short('d')
                .long("device")
                .help("Device to set locale on, auto-selected when exactly one is attached"),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .required(true)
                .help("Locale to set on the device, e.g. ru-RU"),
        )
    }

    async fn run(&self, matches: &ArgMatches) -> Result<()> {
        let explicit = matches.get_one::<String>("device").map(String::as_str);
        let locale = matches
            .get_one::<String>("locale")
            .expect("--locale is required");

        let device = device::select_android_device(explicit).await?;
        android::set_locale(&device, locale).await
    }
}
