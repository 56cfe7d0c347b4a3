//! adb wrappers for Android devices.

use crate::error::{Error, Result};
use crate::exec::{self, WriteMode};
use crate::utils::{self, binary_resolver};
use log::{info, warn};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Package of the companion app that applies locale changes on unrooted
/// devices.
const LOCALE_APP: &str = "net.sanapeli.adbchangelanguage";

/// Run adb with an optional `-s <serial>` prefix and capture its output.
async fn adb(device: Option<&str>, args: &[&str]) -> Result<String> {
    let adb = binary_resolver::find_adb()?;
    let mut full: Vec<&str> = Vec::with_capacity(args.len() + 2);
    if let Some(serial) = device {
        full.push("-s");
        full.push(serial);
    }
    full.extend_from_slice(args);
    exec::capture(&adb, &full, false).await
}

async fn shell(device: &str, args: &[&str]) -> Result<String> {
    let mut full = vec!["shell"];
    full.extend_from_slice(args);
    adb(Some(device), &full).await
}

async fn getprop(device: &str, key: &str) -> Result<String> {
    shell(device, &["getprop", key]).await
}

/// Serials of currently attached devices, in `adb devices` order.
pub async fn list_devices() -> Result<Vec<String>> {
    let stdout = adb(None, &["devices"]).await?;
    Ok(parse_device_list(&stdout))
}

fn parse_device_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            match (columns.next(), columns.next()) {
                (Some(serial), Some(_state)) => Some(serial.to_string()),
                _ => None,
            }
        })
        .collect()
}

pub async fn get_manufacturer(device: &str) -> Result<String> {
    getprop(device, "ro.product.manufacturer").await
}

pub async fn get_device_model(device: &str) -> Result<String> {
    getprop(device, "ro.product.model").await
}

pub async fn get_android_version(device: &str) -> Result<String> {
    getprop(device, "ro.build.version.release").await
}

pub async fn get_sdk_version(device: &str) -> Result<String> {
    getprop(device, "ro.build.version.sdk").await
}

pub async fn get_language(device: &str) -> Result<String> {
    getprop(device, "persist.sys.language").await
}

pub async fn get_country(device: &str) -> Result<String> {
    getprop(device, "persist.sys.country").await
}

/// Current locale, e.g. "en-US".
pub async fn get_locale(device: &str) -> Result<String> {
    let language = get_language(device).await?;
    let country = get_country(device).await?;
    Ok(format!("{}-{}", language.trim(), country.trim()))
}

/// Maximum CPU frequency in GHz, e.g. "2.27".
pub async fn get_cpu_frequency(device: &str) -> Result<String> {
    let stdout = shell(
        device,
        &["cat", "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq"],
    )
    .await?;
    let khz: f64 = stdout
        .trim()
        .parse()
        .map_err(|_| Error::UnexpectedOutput {
            what: "CPU frequency",
            output: stdout.clone(),
        })?;
    Ok(format!("{:.2}", khz / 1_000_000.0))
}

/// RAM size in GB, e.g. "1.90".
pub async fn get_ram_size(device: &str) -> Result<String> {
    let stdout = shell(device, &["cat", "/proc/meminfo"]).await?;
    parse_mem_total_gb(&stdout).ok_or_else(|| Error::UnexpectedOutput {
        what: "RAM size",
        output: stdout.clone(),
    })
}

fn parse_mem_total_gb(meminfo: &str) -> Option<String> {
    let re = Regex::new(r"MemTotal:\s+(\d+)\s*kB").unwrap();
    let kb: f64 = re.captures(meminfo)?[1].parse().ok()?;
    Some(format!("{:.2}", kb / 1_000_000.0))
}

/// Display resolution, e.g. "1080x1920". `wm size` first, `dumpsys window`
/// as a fallback for older builds.
pub async fn get_resolution(device: &str) -> Result<Option<String>> {
    let wm = shell(device, &["wm", "size"]).await?;
    if let Some(resolution) = find_resolution(&wm) {
        return Ok(Some(resolution));
    }
    let dumpsys = shell(device, &["dumpsys", "window"]).await?;
    Ok(find_resolution(&dumpsys))
}

fn find_resolution(text: &str) -> Option<String> {
    let re = Regex::new(r"\d{3,}x\d{3,}").unwrap();
    re.find(text).map(|m| m.as_str().to_string())
}

/// Network IP address, e.g. "10.218.25.173". `ifconfig` first, `netcfg` as
/// a fallback for older builds.
pub async fn get_ip_address(device: &str) -> Result<Option<String>> {
    let ifconfig = shell(device, &["ifconfig"]).await?;
    if let Some(address) = find_ifconfig_address(&ifconfig) {
        return Ok(Some(address));
    }
    let netcfg = shell(device, &["netcfg"]).await?;
    Ok(find_netcfg_address(&netcfg))
}

fn find_ifconfig_address(ifconfig: &str) -> Option<String> {
    let re = Regex::new(r"inet addr:\s*(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})").unwrap();
    let address = re
        .captures_iter(ifconfig)
        .map(|caps| caps[1].to_string())
        .find(|address| address != "127.0.0.1");
    address
}

fn find_netcfg_address(netcfg: &str) -> Option<String> {
    let re = Regex::new(r"wlan0\s+UP\s+(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})").unwrap();
    re.captures(netcfg).map(|caps| caps[1].to_string())
}

/// Takes a screenshot on the device, pulls it into `target_dir` and cleans
/// the device-side copy up.
pub async fn take_screenshot(device: &str, target_dir: &Path, name: &str) -> Result<()> {
    let device_path = format!("/sdcard/{name}");
    shell(device, &["screencap", "-p", &device_path]).await?;
    download_file(device, &device_path, &target_dir.join(name)).await?;
    remove_file(device, &device_path).await?;
    Ok(())
}

pub async fn download_file(device: &str, device_path: &str, target: &Path) -> Result<()> {
    let local = target.to_string_lossy().into_owned();
    adb(Some(device), &["pull", device_path, &local]).await?;
    Ok(())
}

pub async fn remove_file(device: &str, device_path: &str) -> Result<()> {
    shell(device, &["rm", "-f", device_path]).await?;
    Ok(())
}

/// Records the screen into a timestamped file on the device and returns its
/// device-side path. Ctrl+C stops the recording early; the file is still
/// finalized and can be pulled.
pub async fn record_video(device: &str, duration_secs: u32, bitrate: u32) -> Result<String> {
    let device_path = format!("/sdcard/{}.mp4", utils::epoch_millis());
    let duration = duration_secs.to_string();
    let bitrate = bitrate.to_string();
    info!("Recording in progress... To finish press Ctrl+C");
    match shell(
        device,
        &[
            "screenrecord",
            "--time-limit",
            &duration,
            "--bit-rate",
            &bitrate,
            &device_path,
        ],
    )
    .await
    {
        Ok(_) | Err(Error::Interrupted) => {}
        Err(err) => return Err(err),
    }
    // the device needs a beat to finalize the file before it can be pulled
    tokio::time::sleep(Duration::from_secs(1)).await;
    Ok(device_path)
}

pub async fn clear_log(device: &str) -> Result<()> {
    shell(device, &["logcat", "-c"]).await?;
    Ok(())
}

/// Follow the device log into `target` until Ctrl+C.
pub async fn stream_log(device: &str, target: &Path) -> Result<()> {
    let adb = binary_resolver::find_adb()?;
    exec::stream_to_file(
        &adb,
        &["-s", device, "logcat", "-v", "time"],
        target,
        WriteMode::Overwrite,
    )
    .await
}

/// Applies a locale through the adbchangelanguage companion app. When the
/// app is missing its Play Store page is opened on the device and the call
/// fails so the user can install it and re-run.
pub async fn set_locale(device: &str, locale: &str) -> Result<()> {
    let (language, country) = locale
        .split_once('-')
        .filter(|(language, country)| !language.is_empty() && !country.is_empty())
        .ok_or_else(|| Error::InvalidLocale(locale.to_string()))?;

    if !is_app_installed(device, LOCALE_APP).await? {
        open_play_store(device, LOCALE_APP).await?;
        return Err(Error::MissingCompanionApp(LOCALE_APP.to_string()));
    }

    grant_change_configuration(device, LOCALE_APP).await?;
    shell(
        device,
        &[
            "am",
            "start",
            "-n",
            "net.sanapeli.adbchangelanguage/.AdbChangeLanguage",
            "-e",
            "language",
            language,
            "-e",
            "country",
            country,
        ],
    )
    .await?;
    // give the device a moment to apply the configuration change
    tokio::time::sleep(Duration::from_secs(3)).await;
    Ok(())
}

pub async fn is_app_installed(device: &str, package: &str) -> Result<bool> {
    let stdout = shell(device, &["pm", "list", "packages"]).await?;
    let entry = format!("package:{package}");
    Ok(stdout.lines().any(|line| line.trim() == entry))
}

async fn grant_change_configuration(device: &str, package: &str) -> Result<()> {
    shell(
        device,
        &[
            "pm",
            "grant",
            package,
            "android.permission.CHANGE_CONFIGURATION",
        ],
    )
    .await?;
    Ok(())
}

async fn open_play_store(device: &str, package: &str) -> Result<()> {
    let uri = format!("market://details?id={package}");
    shell(
        device,
        &["am", "start", "-a", "android.intent.action.VIEW", "-d", &uri],
    )
    .await?;
    Ok(())
}

/// Installs an apk, or the newest one from `~/Downloads` when no path is
/// given. Devices on SDK 17+ get `-d` to allow version downgrades.
pub async fn install_app(device: &str, apk: Option<&Path>) -> Result<()> {
    let apk_path = match apk {
        Some(path) => path.to_path_buf(),
        None => newest_download_apk()?,
    };
    info!(
        "Installing '{}' onto device '{}'...",
        apk_path.display(),
        device
    );
    let sdk = get_sdk_version(device).await?;
    let allow_downgrade = sdk.trim().parse::<u32>().unwrap_or(0) >= 17;
    let local = apk_path.to_string_lossy().into_owned();

    let mut args = vec!["install", "-r"];
    if allow_downgrade {
        args.push("-d");
    }
    args.push(&local);
    adb(Some(device), &args).await?;
    Ok(())
}

fn newest_download_apk() -> Result<PathBuf> {
    let downloads = dirs::home_dir()
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?
        .join("Downloads");
    let pattern = downloads.join("*.apk");
    let newest = glob::glob(&pattern.to_string_lossy())
        .map_err(|_| Error::NoApkFound(downloads.clone()))?
        .flatten()
        .max_by_key(|path| {
            path.metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });
    newest.ok_or(Error::NoApkFound(downloads))
}

pub async fn uninstall_app(device: &str, package: &str) -> Result<()> {
    adb(Some(device), &["uninstall", package]).await?;
    Ok(())
}

/// Launches an app by component name and puts it in the foreground.
pub async fn start_app(device: &str, component: &str) -> Result<()> {
    shell(device, &["am", "start", "-n", component]).await?;
    Ok(())
}

pub async fn enter_text(device: &str, text: &str) -> Result<()> {
    shell(device, &["input", "text", text]).await?;
    Ok(())
}

pub async fn send_key_event(device: &str, keycode: &str) -> Result<()> {
    shell(device, &["input", "keyevent", keycode]).await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioState {
    On,
    Off,
}

impl RadioState {
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "ON" => Some(RadioState::On),
            "OFF" => Some(RadioState::Off),
            _ => None,
        }
    }
}

impl fmt::Display for RadioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioState::On => write!(f, "ON"),
            RadioState::Off => write!(f, "OFF"),
        }
    }
}

fn already_in_state(current: &str, wanted: RadioState) -> bool {
    let enabled = current.trim().parse::<i32>().unwrap_or(0) > 0;
    match wanted {
        RadioState::On => enabled,
        RadioState::Off => !enabled,
    }
}

/// Toggle Wi-Fi through the settings UI. The key-event sequence is fixed
/// and unverified, matching what the settings screen accepts on the lab
/// devices.
pub async fn switch_wifi(device: &str, state: RadioState) -> Result<()> {
    let current = get_wifi_state(device).await?;
    if already_in_state(&current, state) {
        warn!("WiFi is already '{state}' on the device '{device}'");
        return Ok(());
    }
    open_wifi_settings(device).await?;
    send_key_event(device, "KEYCODE_DPAD_UP").await?;
    send_key_event(device, "KEYCODE_DPAD_UP").await?;
    send_key_event(device, "KEYCODE_DPAD_CENTER").await?;
    send_key_event(device, "KEYCODE_BACK").await?;
    Ok(())
}

/// Toggle cellular data through the settings UI.
pub async fn switch_cellular_data(device: &str, state: RadioState) -> Result<()> {
    let current = get_cellular_data_state(device).await?;
    if already_in_state(&current, state) {
        warn!("Cellular Data is already '{state}' on the device '{device}'");
        return Ok(());
    }
    open_data_usage_settings(device).await?;
    send_key_event(device, "KEYCODE_DPAD_DOWN").await?;
    // certain Android 5.0 devices need an extra step down
    if state == RadioState::Off {
        send_key_event(device, "KEYCODE_DPAD_DOWN").await?;
    }
    send_key_event(device, "KEYCODE_DPAD_CENTER").await?;
    if state == RadioState::On {
        send_key_event(device, "KEYCODE_DPAD_DOWN").await?;
        send_key_event(device, "KEYCODE_DPAD_CENTER").await?;
    }
    // confirmation dialog when turning data off
    if state == RadioState::Off {
        send_key_event(device, "KEYCODE_TAB").await?;
    }
    send_key_event(device, "KEYCODE_ENTER").await?;
    send_key_event(device, "KEYCODE_BACK").await?;
    Ok(())
}

/// "0" disabled, "1" enabled.
pub async fn get_wifi_state(device: &str) -> Result<String> {
    shell(device, &["settings", "get", "global", "wifi_on"]).await
}

pub async fn get_cellular_data_state(device: &str) -> Result<String> {
    shell(device, &["settings", "get", "global", "mobile_data"]).await
}

async fn open_wifi_settings(device: &str) -> Result<()> {
    shell(
        device,
        &[
            "am",
            "start",
            "-a",
            "android.intent.action.MAIN",
            "-n",
            "com.android.settings/.wifi.WifiSettings",
        ],
    )
    .await?;
    Ok(())
}

async fn open_data_usage_settings(device: &str) -> Result<()> {
    // the "$" is quoted so the device-side shell does not expand it
    shell(
        device,
        &[
            "am",
            "start",
            "-n",
            "com.android.settings/.Settings\"$\"DataUsageSummaryActivity",
        ],
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_list_skips_header_and_empty_lines() {
        let stdout = "List of devices attached\nABC123\tdevice\n\nDEF456\tunauthorized\n";
        assert_eq!(parse_device_list(stdout), vec!["ABC123", "DEF456"]);
    }

    #[test]
    fn device_list_is_stable_across_identical_output() {
        let stdout = "List of devices attached\nABC123\tdevice\nDEF456\tdevice\n";
        assert_eq!(parse_device_list(stdout), parse_device_list(stdout));
    }

    #[test]
    fn mem_total_converts_kilobytes_to_gigabytes() {
        let meminfo = "MemTotal:        1899548 kB\nMemFree:          123456 kB\n";
        assert_eq!(parse_mem_total_gb(meminfo).as_deref(), Some("1.90"));
        assert_eq!(parse_mem_total_gb("garbage"), None);
    }

    #[test]
    fn resolution_is_extracted_from_wm_size_output() {
        assert_eq!(
            find_resolution("Physical size: 1080x1920").as_deref(),
            Some("1080x1920")
        );
        assert_eq!(find_resolution("Physical size: unknown"), None);
    }

    #[test]
    fn ifconfig_address_skips_loopback() {
        let ifconfig = "lo: inet addr:127.0.0.1 Mask:255.0.0.0\n\
                        wlan0: inet addr:10.218.25.173 Bcast:10.218.25.255\n";
        assert_eq!(
            find_ifconfig_address(ifconfig).as_deref(),
            Some("10.218.25.173")
        );
    }

    #[test]
    fn netcfg_address_reads_the_wlan_row() {
        let netcfg = "lo       UP  127.0.0.1/8   0x49 00:00:00:00:00:00\n\
                      wlan0    UP  10.0.0.7/24   0x1043 aa:bb:cc:dd:ee:ff\n";
        // netcfg rows carry the prefix length after the address
        assert_eq!(find_netcfg_address(netcfg).as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn radio_state_parses_only_on_and_off() {
        assert_eq!(RadioState::from_flag("ON"), Some(RadioState::On));
        assert_eq!(RadioState::from_flag("OFF"), Some(RadioState::Off));
        assert_eq!(RadioState::from_flag("on"), None);
    }

    #[test]
    fn already_in_state_compares_numeric_settings_output() {
        assert!(already_in_state("1", RadioState::On));
        assert!(already_in_state("2", RadioState::On));
        assert!(already_in_state("0", RadioState::Off));
        assert!(already_in_state("null", RadioState::Off));
        assert!(!already_in_state("0", RadioState::On));
    }
}
