//! Static tables shared across actions.

/// Locales the team ships screenshots for.
pub const LOCALES: &[&str] = &[
    "en-US", "es-ES", "fr-FR", "pt-BR", "de-DE", "it-IT", "ru-RU", "tr-TR", "th-TH", "vi-VN",
    "zh-TW", "zh-CN", "ja-JP", "ko-KR", "iw-IL", "ar-EG", "ms-MY", "in-ID", "pl-PL", "tl-PH",
    "ur-IN", "hi-IN", "my-US", "bn-BD",
];

pub const PLATFORMS: &[&str] = &["android", "ios"];

/// adb screenrecord refuses longer captures.
pub const MAX_RECORD_SECONDS: u32 = 180;
