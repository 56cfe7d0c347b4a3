use std::path::PathBuf;
use thiserror::Error;

/// Library-wide error taxonomy. Only `main` maps these to exit codes.
#[derive(Debug, Error)]
pub enum Error {
    /// Dispatch could not find a handler for the requested verb.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// Two actions were registered under the same verb. This is a
    /// programming mistake, not a runtime condition, so start-up fails.
    #[error("action '{0}' is registered twice")]
    DuplicateAction(String),

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The external command exited non-zero or its output matched the
    /// tool's failure convention.
    #[error("execution failed for '{command}' with the output:\n{output}")]
    CommandFailed { command: String, output: String },

    /// The user interrupted an in-flight command with Ctrl+C.
    #[error("interrupted by user")]
    Interrupted,

    #[error("no connected {scope} devices")]
    NoDevice { scope: &'static str },

    #[error("more than one connected {scope} device, pass --device to choose one")]
    AmbiguousDevice { scope: &'static str },

    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    #[error("invalid locale '{0}', expected a language-COUNTRY pair like en-US")]
    InvalidLocale(String),

    #[error("'{0}' is not installed on the device; install it from the Play Store page just opened and re-run")]
    MissingCompanionApp(String),

    #[error("could not find '{0}', is it installed and on PATH?")]
    ToolNotFound(String),

    #[error("no .apk files in '{0}'")]
    NoApkFound(PathBuf),

    #[error("unexpected output while reading {what}:\n{output}")]
    UnexpectedOutput {
        what: &'static str,
        output: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
