//! Toggling radios on Android devices.

use crate::action::Action;
use crate::device::{self, android};
use crate::error::{Error, Result};
use async_trait::async_trait;
use clap::{Arg, ArgMatches};

pub struct SwitchAction;

enum Radio {
    Wifi,
    Cellular,
}

#[async_trait]
impl Action for SwitchAction {
    fn verb(&self) -> &'static str {
        "switch"
    }

    fn help(&self) -> &'static str {
        "A set of utils to switch ON/OFF functions on mobile devices"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        cmd.subcommand_required(true)
            .subcommand(configure_toggle(
                clap::Command::new("wifi").about("Switch ON/OFF wifi"),
            ))
            .subcommand(configure_toggle(
                clap::Command::new("cellular").about("Switch ON/OFF cellular data"),
            ))
    }

    async fn run(&self, matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("wifi", sub)) => toggle(sub, Radio::Wifi).await,
            Some(("cellular", sub)) => toggle(sub, Radio::Cellular).await,
            Some((other, _)) => Err(Error::UnknownAction(format!("switch {other}"))),
            None => Err(Error::UnknownAction("switch".to_string())),
        }
    }
}

fn configure_toggle(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        Arg::new("device")
            .short('d')
            .long("device")
            .help("Device identifier, auto-selected when exactly one is attached"),
    )
    .arg(
        Arg::new("state")
            .short('s')
            .long("state")
            .required(true)
            .value_parser(["ON", "OFF"])
            .help("ON to enable, OFF to disable"),
    )
}

async fn toggle(matches: &ArgMatches, radio: Radio) -> Result<()> {
    let explicit = matches.get_one::<String>("device").map(String::as_str);
    let state = matches
        .get_one::<String>("state")
        .and_then(|flag| android::RadioState::from_flag(flag))
        .expect("--state is required and validated");

    let device = device::select_android_device(explicit).await?;
    match radio {
        Radio::Wifi => android::switch_wifi(&device, state).await,
        Radio::Cellular => android::switch_cellular_data(&device, state).await,
    }
}
