//! Screenshots, optionally across a set of locales.

use crate::action::Action;
use crate::device::{self, android, ios, Platform};
use crate::error::Result;
use crate::utils::{self, constants};
use async_trait::async_trait;
use clap::{value_parser, Arg, ArgMatches};
use std::path::{Path, PathBuf};

pub struct ScreenshotAction;

#[async_trait]
impl Action for ScreenshotAction {
    fn verb(&self) -> &'static str {
        "screenshot"
    }

    fn help(&self) -> &'static str {
        "Takes screenshots from device"
    }

    fn configure(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            Arg::new("device")
                .short('d')
                .long("device")
                .help("Device to take screenshot from, auto-selected when exactly one is attached"),
        )
        .arg(
            Arg::new("howmany")
                .long("howmany")
                .value_parser(value_parser!(u32))
                .default_value("1")
                .help("How many screenshots to take"),
        )
        .arg(
            Arg::new("locales")
                .long("locales")
                .num_args(1..)
                .value_parser(constants::LOCALES.to_vec())
                .help("One or more locales to take screenshots for (Android only)"),
        )
    }

    async fn run(&self, matches: &ArgMatches) -> Result<()> {
        let explicit = matches.get_one::<String>("device").map(String::as_str);
        let howmany = *matches.get_one::<u32>("howmany").expect("defaulted");
        let locales: Vec<String> = matches
            .get_many::<String>("locales")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let (device, platform) = device::select_any_device(explicit).await?;

        // multiple results land in a timestamped subdirectory
        let many = howmany > 1 || locales.len() > 1;
        let base_dir = utils::output_dir();
        let target_dir = if many {
            let dir = base_dir.join(utils::epoch_millis().to_string());
            std::fs::create_dir_all(&dir)?;
            dir
        } else {
            base_dir
        };

        let mut last_file = PathBuf::new();
        for _ in 0..howmany {
            last_file = match platform {
                Platform::Android => shoot_android(&device, &target_dir, &locales).await?,
                Platform::Ios => shoot_ios(&device, &target_dir).await?,
            };
        }

        let result = if many { target_dir } else { last_file };
        println!("Find result at {}", result.display());
        Ok(())
    }
}

async fn shoot_android(device: &str, target_dir: &Path, locales: &[String]) -> Result<PathBuf> {
    let model = android::get_device_model(device).await?;
    let manufacturer = android::get_manufacturer(device).await?;
    let name = format!(
        "{}_{}_{}.png",
        compact(&model),
        compact(&manufacturer),
        utils::epoch_millis()
    );

    if locales.is_empty() {
        android::take_screenshot(device, target_dir, &name).await?;
        return Ok(target_dir.join(name));
    }

    let locale_before = android::get_locale(device).await?;
    let mut last = PathBuf::new();
    for locale in locales {
        android::set_locale(device, locale).await?;
        let file = format!("{locale}_{name}");
        android::take_screenshot(device, target_dir, &file).await?;
        last = target_dir.join(file);
    }
    android::set_locale(device, &locale_before).await?;
    Ok(last)
}

async fn shoot_ios(device: &str, target_dir: &Path) -> Result<PathBuf> {
    let model = ios::get_device_model(device).await?;
    let name = format!("{}_{}.png", compact(&model), utils::epoch_millis());
    ios::take_screenshot(device, target_dir, &name).await?;
    Ok(target_dir.join(name))
}

fn compact(text: &str) -> String {
    text.to_lowercase().replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_components_are_lowercased_and_despaced() {
        assert_eq!(compact("Nexus 5"), "nexus5");
        assert_eq!(compact("iPad Air 2 (Wi-Fi)"), "ipadair2(wi-fi)");
    }
}
