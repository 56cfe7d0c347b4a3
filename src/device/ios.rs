//! libimobiledevice wrappers for iOS devices.

use crate::error::Result;
use crate::exec::{self, WriteMode};
use crate::utils::binary_resolver;
use log::info;
use std::path::Path;

async fn tool(name: &str, args: &[&str]) -> Result<String> {
    let path = binary_resolver::find_tool(name)?;
    exec::capture(&path, args, false).await
}

/// UDIDs of currently attached devices, one per line of `idevice_id -l`.
pub async fn list_devices() -> Result<Vec<String>> {
    let stdout = tool("idevice_id", &["-l"]).await?;
    Ok(parse_device_list(&stdout))
}

fn parse_device_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub async fn get_ios_version(device: &str) -> Result<String> {
    tool("ideviceinfo", &["-u", device, "-k", "ProductVersion"]).await
}

/// Marketing name of the device, e.g. "iPhone 5s". Unknown product types
/// are returned as-is.
pub async fn get_device_model(device: &str) -> Result<String> {
    let product_type = tool("ideviceinfo", &["-u", device, "-k", "ProductType"]).await?;
    let product_type = product_type.trim();
    Ok(product_name(product_type)
        .map(str::to_string)
        .unwrap_or_else(|| product_type.to_string()))
}

pub async fn get_device_udid(device: &str) -> Result<String> {
    tool("ideviceinfo", &["-u", device, "-k", "UniqueDeviceID"]).await
}

pub async fn get_time(device: &str) -> Result<String> {
    tool("idevicedate", &["-u", device]).await
}

pub async fn take_screenshot(device: &str, target_dir: &Path, name: &str) -> Result<()> {
    let target = target_dir.join(name).to_string_lossy().into_owned();
    tool("idevicescreenshot", &["-u", device, &target]).await?;
    Ok(())
}

/// Follow the device syslog into `target` until Ctrl+C.
pub async fn stream_log(device: &str, target: &Path) -> Result<()> {
    let syslog = binary_resolver::find_tool("idevicesyslog")?;
    exec::stream_to_file(&syslog, &["-u", device], target, WriteMode::Overwrite).await
}

pub async fn install_app(device: &str, ipa: &Path) -> Result<()> {
    info!("Installing '{}' onto device '{}'...", ipa.display(), device);
    let path = ipa.to_string_lossy().into_owned();
    tool("ideviceinstaller", &["-u", device, "-i", &path]).await?;
    Ok(())
}

pub async fn uninstall_app(device: &str, package: &str) -> Result<()> {
    tool("ideviceinstaller", &["-u", device, "-U", package]).await?;
    Ok(())
}

pub async fn is_app_installed(device: &str, package: &str) -> Result<bool> {
    let stdout = tool("ideviceinstaller", &["-u", device, "-l"]).await?;
    Ok(stdout.contains(package))
}

/// Marketing name for an ideviceinfo product type.
pub fn product_name(product_type: &str) -> Option<&'static str> {
    let name = match product_type {
        "iPhone1,1" => "iPhone",
        "iPhone1,2" => "iPhone 3G",
        "iPhone2,1" => "iPhone 3GS",
        "iPhone3,1" => "iPhone 4 (GSM)",
        "iPhone3,3" => "iPhone 4 (CDMA)",
        "iPhone4,1" => "iPhone 4S",
        "iPhone5,1" | "iPhone5,2" => "iPhone 5",
        "iPhone5,3" | "iPhone5,4" => "iPhone 5c",
        "iPhone6,1" | "iPhone6,2" => "iPhone 5s",
        "iPhone7,1" => "iPhone 6 Plus",
        "iPhone7,2" => "iPhone 6",
        "iPhone8,1" => "iPhone 6s",
        "iPad1,1" => "iPad",
        "iPad2,1" | "iPad2,4" => "iPad 2 (Wi-Fi)",
        "iPad2,2" => "iPad 2 (GSM)",
        "iPad2,3" => "iPad 2 (CDMA)",
        "iPad2,5" => "iPad Mini (Wi-Fi)",
        "iPad2,6" | "iPad2,7" => "iPad Mini",
        "iPad3,1" => "iPad 3 (Wi-Fi)",
        "iPad3,2" => "iPad 3 (Wi-Fi+LTE Verizon)",
        "iPad3,3" => "iPad 3 (Wi-Fi+LTE AT&T)",
        "iPad3,4" => "iPad 4 (Wi-Fi)",
        "iPad3,5" | "iPad3,6" => "iPad 4",
        "iPad4,1" => "iPad Air (Wi-Fi)",
        "iPad4,2" => "iPad Air (Wi-Fi+LTE)",
        "iPad4,3" => "iPad Air (Rev)",
        "iPad4,4" => "iPad Mini 2 (Wi-Fi)",
        "iPad4,5" => "iPad Mini 2 (Wi-Fi+LTE)",
        "iPad4,6" => "iPad Mini 2 (Rev)",
        "iPad4,7" => "iPad Mini 3 (Wi-Fi)",
        "iPad4,8" | "iPad4,9" => "iPad Mini 3",
        "iPad5,3" => "iPad Air 2 (Wi-Fi)",
        "iPad5,4" => "iPad Air 2 (Wi-Fi+LTE)",
        "iPod1,1" => "iPod Touch",
        "iPod2,1" => "iPod Touch 2",
        "iPod3,1" => "iPod Touch 3",
        "iPod4,1" => "iPod Touch 4",
        "iPod5,1" => "iPod Touch 5",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_list_is_one_udid_per_line() {
        let stdout = "860850006baba72f031cf22a333ba36d65239b61\n\na4f9c477beb3096b8fbb86b58c23026d3da7756e\n";
        assert_eq!(
            parse_device_list(stdout),
            vec![
                "860850006baba72f031cf22a333ba36d65239b61",
                "a4f9c477beb3096b8fbb86b58c23026d3da7756e",
            ]
        );
        assert!(parse_device_list("").is_empty());
    }

    #[test]
    fn known_product_types_map_to_marketing_names() {
        assert_eq!(product_name("iPhone4,1"), Some("iPhone 4S"));
        assert_eq!(product_name("iPhone6,2"), Some("iPhone 5s"));
        assert_eq!(product_name("iPad5,4"), Some("iPad Air 2 (Wi-Fi+LTE)"));
        assert_eq!(product_name("iPhone99,9"), None);
    }
}
