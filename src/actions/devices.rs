//! Info about connected devices.

use crate::action::Action;
use crate::device::{self, android, ios, Platform};
use crate::error::{Error, Result};
use crate::utils::constants;
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches};
use colored::Colorize;

pub struct DevicesAction;

#[async_trait]
impl Action for DevicesAction {
    fn verb(&self) -> &'static str {
        "devices"
    }

    fn help(&self) -> &'static str {
        "Get info about connected devices"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            Arg::new("device")
                .short('d')
                .long("device")
                .help("Device to get info about, by default all connected devices"),
        )
        .arg(
            Arg::new("platform")
                .short('p')
                .long("platform")
                .value_parser(constants::PLATFORMS.to_vec())
                .help("Platform to get info about, by default all platforms"),
        )
        .arg(
            Arg::new("hardware")
                .long("hardware")
                .action(ArgAction::SetTrue)
                .help("Only hardware info, by default all info"),
        )
        .arg(
            Arg::new("software")
                .long("software")
                .action(ArgAction::SetTrue)
                .help("Only software info, by default all info"),
        )
    }

    async fn run(&self, matches: &ArgMatches) -> Result<()> {
        let explicit = matches.get_one::<String>("device");
        let platform = matches
            .get_one::<String>("platform")
            .and_then(|name| Platform::from_name(name));
        let hardware = matches.get_flag("hardware");
        let software = matches.get_flag("software");
        let show_hardware = hardware || !software;
        let show_software = software || !hardware;

        let (mut androids, mut ioses) = device::all_devices().await?;
        if let Some(wanted) = explicit {
            androids.retain(|serial| serial == wanted);
            ioses.retain(|udid| udid == wanted);
            if androids.is_empty() && ioses.is_empty() {
                return Err(Error::UnknownDevice(wanted.clone()));
            }
        } else if androids.is_empty() && ioses.is_empty() {
            return Err(Error::NoDevice {
                scope: "Android or iOS",
            });
        }

        if platform != Some(Platform::Ios) {
            for serial in &androids {
                print_android_info(serial, show_hardware, show_software).await?;
            }
        }
        if platform != Some(Platform::Android) {
            for udid in &ioses {
                print_ios_info(udid, show_software).await?;
            }
        }
        Ok(())
    }
}

async fn print_android_info(serial: &str, show_hardware: bool, show_software: bool) -> Result<()> {
    let manufacturer = android::get_manufacturer(serial).await?;
    let model = android::get_device_model(serial).await?;
    println!(
        "\nAndroid device: {} ({} {})",
        serial.bold(),
        manufacturer,
        model
    );
    if show_software {
        println!(
            "Android version: {}",
            android::get_android_version(serial).await?
        );
    }
    if show_hardware {
        println!(
            "CPU frequency: {}GHz",
            android::get_cpu_frequency(serial).await?
        );
        println!("RAM size: {}GB", android::get_ram_size(serial).await?);
        println!(
            "Screen resolution: {}",
            android::get_resolution(serial)
                .await?
                .unwrap_or_else(|| "unknown".to_string())
        );
        println!("SDK version: {}", android::get_sdk_version(serial).await?);
    }
    Ok(())
}

async fn print_ios_info(udid: &str, show_software: bool) -> Result<()> {
    let model = ios::get_device_model(udid).await?;
    println!("\niOS device: {} ({})", udid.bold(), model);
    if show_software {
        println!("iOS version: {}", ios::get_ios_version(udid).await?);
    }
    Ok(())
}
