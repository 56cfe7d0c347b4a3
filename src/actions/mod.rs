//! CLI actions. Each action is a descriptor the start-up routine feeds into
//! the registry; nothing registers itself implicitly.

pub mod devices;
pub mod locale;
pub mod logging;
pub mod screenshot;
pub mod switch;
pub mod video;

use crate::action::{Action, ActionRegistry};
use crate::error::Result;

/// Every action the CLI ships.
pub fn all() -> Vec<Box<dyn Action>> {
    vec![
        Box::new(devices::DevicesAction),
        Box::new(locale::LocaleAction),
        Box::new(logging::LoggingAction),
        Box::new(screenshot::ScreenshotAction),
        Box::new(switch::SwitchAction),
        Box::new(video::VideoAction),
    ]
}

pub fn registry() -> Result<ActionRegistry> {
    ActionRegistry::from_actions(all())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_actions_register_without_conflicts() {
        let registry = registry().unwrap();
        for verb in ["devices", "locale", "logging", "screenshot", "switch", "video"] {
            assert!(registry.get(verb).is_some(), "missing action '{verb}'");
        }
    }
}
