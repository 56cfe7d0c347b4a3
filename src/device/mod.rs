//! Device enumeration and selection.
//!
//! Device identifiers are opaque tokens (Android serials, iOS UDIDs); the
//! only thing that makes one valid is showing up in an enumeration command's
//! output right now.

pub mod android;
pub mod ios;

use crate::error::{Error, Result};
use log::debug;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "android" => Some(Platform::Android),
            "ios" => Some(Platform::Ios),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "Android"),
            Platform::Ios => write!(f, "iOS"),
        }
    }
}

/// Picks the device an action should operate on. Pure over the enumerated
/// candidate list so the rules are testable without hardware.
///
/// An explicit device must be present in the list; with no explicit device
/// a single candidate is auto-selected, anything else is a validation error
/// raised before any further external command runs.
pub fn select_device(
    explicit: Option<&str>,
    candidates: &[String],
    scope: &'static str,
) -> Result<String> {
    if candidates.is_empty() {
        return Err(Error::NoDevice { scope });
    }
    match explicit {
        Some(device) if candidates.iter().any(|c| c == device) => Ok(device.to_string()),
        Some(device) => Err(Error::UnknownDevice(device.to_string())),
        None if candidates.len() == 1 => Ok(candidates[0].clone()),
        None => Err(Error::AmbiguousDevice { scope }),
    }
}

/// Enumerate both platforms, treating a missing platform tool as an empty
/// list rather than a failure so Android-only hosts work without
/// libimobiledevice and vice versa.
pub async fn all_devices() -> Result<(Vec<String>, Vec<String>)> {
    let androids = list_or_empty(android::list_devices().await, "adb")?;
    let ioses = list_or_empty(ios::list_devices().await, "idevice_id")?;
    Ok((androids, ioses))
}

fn list_or_empty(result: Result<Vec<String>>, tool: &str) -> Result<Vec<String>> {
    match result {
        Ok(devices) => Ok(devices),
        Err(Error::ToolNotFound(_)) => {
            debug!("{tool} is not available, skipping its devices");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

pub async fn select_android_device(explicit: Option<&str>) -> Result<String> {
    select_device(explicit, &android::list_devices().await?, "Android")
}

/// Resolve a device across both platforms, returning which platform it
/// belongs to.
pub async fn select_any_device(explicit: Option<&str>) -> Result<(String, Platform)> {
    let (androids, ioses) = all_devices().await?;
    let mut all = androids.clone();
    all.extend(ioses.iter().cloned());
    let chosen = select_device(explicit, &all, "Android or iOS")?;
    let platform = if androids.contains(&chosen) {
        Platform::Android
    } else {
        Platform::Ios
    };
    Ok((chosen, platform))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(devices: &[&str]) -> Vec<String> {
        devices.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn single_device_is_auto_selected() {
        let chosen = select_device(None, &list(&["ABC123"]), "Android").unwrap();
        assert_eq!(chosen, "ABC123");
    }

    #[test]
    fn two_devices_without_a_flag_is_ambiguous() {
        let err = select_device(None, &list(&["ABC123", "DEF456"]), "Android").unwrap_err();
        assert!(matches!(err, Error::AmbiguousDevice { .. }));
    }

    #[test]
    fn explicit_device_wins_over_ambiguity() {
        let chosen = select_device(Some("DEF456"), &list(&["ABC123", "DEF456"]), "Android").unwrap();
        assert_eq!(chosen, "DEF456");
    }

    #[test]
    fn explicit_device_must_be_connected() {
        let err = select_device(Some("GONE"), &list(&["ABC123"]), "Android").unwrap_err();
        assert!(matches!(err, Error::UnknownDevice(device) if device == "GONE"));
    }

    #[test]
    fn empty_list_is_no_device_even_with_a_flag() {
        let err = select_device(Some("ABC123"), &[], "Android").unwrap_err();
        assert!(matches!(err, Error::NoDevice { scope: "Android" }));
    }

    #[test]
    fn platform_names_parse() {
        assert_eq!(Platform::from_name("android"), Some(Platform::Android));
        assert_eq!(Platform::from_name("ios"), Some(Platform::Ios));
        assert_eq!(Platform::from_name("web"), None);
    }
}
