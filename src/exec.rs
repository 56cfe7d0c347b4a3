//! Process execution chokepoint.
//!
//! Every device operation goes through here: either capture the child's
//! stdout and classify success, or stream its stdout into a file until the
//! child exits or the user hits Ctrl+C.

use crate::error::{Error, Result};
use log::debug;
use std::ffi::OsStr;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// How [`stream_to_file`] opens its target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

/// adb reports some failed commands (notably `install`) with exit code 0
/// and a `Failure [...]` line on stdout.
pub fn looks_like_tool_failure(stdout: &str) -> bool {
    stdout.contains("Failure")
}

/// Run a command and return its stdout with trailing whitespace stripped.
///
/// Fails with [`Error::CommandFailed`] when the child exits non-zero or its
/// stdout matches [`looks_like_tool_failure`]. Ctrl+C kills the child and
/// surfaces as [`Error::Interrupted`].
pub async fn capture(
    program: impl AsRef<OsStr>,
    args: &[&str],
    suppress_stderr: bool,
) -> Result<String> {
    capture_with(program, args, suppress_stderr, looks_like_tool_failure).await
}

/// [`capture`] with a caller-supplied failure predicate, for wrapped tools
/// with their own output conventions.
pub async fn capture_with(
    program: impl AsRef<OsStr>,
    args: &[&str],
    suppress_stderr: bool,
    failed: fn(&str) -> bool,
) -> Result<String> {
    capture_until(program, args, suppress_stderr, failed, user_interrupt()).await
}

/// [`capture_with`] with an explicit shutdown signal instead of Ctrl+C.
pub async fn capture_until(
    program: impl AsRef<OsStr>,
    args: &[&str],
    suppress_stderr: bool,
    failed: fn(&str) -> bool,
    shutdown: impl Future<Output = ()>,
) -> Result<String> {
    let program = program.as_ref();
    let command = render(program, args);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;

    // Drain both pipes concurrently so a chatty child can't fill one and stall.
    let mut stdout_pipe = child.stdout.take().expect("stdout is piped");
    let mut stderr_pipe = child.stderr.take().expect("stderr is piped");
    let drain_stdout = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let drain_stderr = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    tokio::pin!(shutdown);
    let status = tokio::select! {
        status = child.wait() => status.map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?,
        _ = &mut shutdown => {
            // kill() also reaps the child
            let _ = child.kill().await;
            return Err(Error::Interrupted);
        }
    };

    let stdout = String::from_utf8_lossy(&drain_stdout.await.unwrap_or_default()).into_owned();
    let stderr = String::from_utf8_lossy(&drain_stderr.await.unwrap_or_default()).into_owned();

    if !stderr.is_empty() && (suppress_stderr || stderr.starts_with("WARNING")) {
        debug!("{}", stderr.trim_end());
    }

    if !status.success() || failed(&stdout) {
        return Err(Error::CommandFailed {
            command,
            output: format!("{stderr}{stdout}"),
        });
    }

    Ok(stdout.trim_end().to_string())
}

/// Run a command with its stdout redirected into `path`, blocking until the
/// child exits or the user hits Ctrl+C.
///
/// The parent directory of `path` is created when missing. On interrupt the
/// child is killed and reaped before returning; the file handle is released
/// on every exit path. The child's exit status is not classified: log
/// followers have no natural end and are routinely killed by the interrupt.
pub async fn stream_to_file(
    program: impl AsRef<OsStr>,
    args: &[&str],
    path: &Path,
    mode: WriteMode,
) -> Result<()> {
    stream_to_file_until(program, args, path, mode, user_interrupt()).await
}

/// [`stream_to_file`] with an explicit shutdown signal instead of Ctrl+C.
pub async fn stream_to_file_until(
    program: impl AsRef<OsStr>,
    args: &[&str],
    path: &Path,
    mode: WriteMode,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let program = program.as_ref();
    let command = render(program, args);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut options = std::fs::OpenOptions::new();
    options.create(true).write(true);
    match mode {
        WriteMode::Overwrite => options.truncate(true),
        WriteMode::Append => options.append(true),
    };
    let file = options.open(path)?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(file))
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| Error::Spawn { command, source })?;

    tokio::pin!(shutdown);
    tokio::select! {
        status = child.wait() => {
            status?;
        }
        _ = &mut shutdown => {
            let _ = child.kill().await;
        }
    }

    Ok(())
}

fn render(program: &OsStr, args: &[&str]) -> String {
    let mut parts = vec![program.to_string_lossy().into_owned()];
    parts.extend(args.iter().map(|arg| arg.to_string()));
    parts.join(" ")
}

/// Resolves when the user hits Ctrl+C. If the signal handler cannot be
/// installed the default signal disposition still applies, so pend forever
/// rather than firing spuriously.
async fn user_interrupt() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn capture_returns_stdout_with_trailing_whitespace_stripped() {
        let out = capture("sh", &["-c", "printf ' hello \n\n'"], false)
            .await
            .unwrap();
        assert_eq!(out, " hello");
    }

    #[tokio::test]
    async fn capture_fails_on_nonzero_exit() {
        let err = capture("sh", &["-c", "echo boom >&2; exit 3"], false)
            .await
            .unwrap_err();
        match err {
            Error::CommandFailed { output, .. } => assert!(output.contains("boom")),
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_marker_beats_zero_exit_code() {
        let err = capture("sh", &["-c", "echo 'Failure [INSTALL_FAILED_OLDER_SDK]'"], false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn custom_predicate_overrides_the_default_marker() {
        let out = capture_with(
            "sh",
            &["-c", "echo 'Failure is just part of the payload'"],
            false,
            |_| false,
        )
        .await
        .unwrap();
        assert_eq!(out, "Failure is just part of the payload");
    }

    #[tokio::test]
    async fn capture_fails_on_missing_program() {
        let err = capture("definitely-not-a-real-binary", &[], false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[tokio::test]
    async fn stream_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("logs").join("run").join("out.txt");
        stream_to_file("sh", &["-c", "echo line"], &target, WriteMode::Overwrite)
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "line\n");
    }

    #[tokio::test]
    async fn append_mode_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        for _ in 0..2 {
            stream_to_file("sh", &["-c", "echo line"], &target, WriteMode::Append)
                .await
                .unwrap();
        }
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "line\nline\n");
    }

    #[tokio::test]
    async fn overwrite_mode_truncates_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        std::fs::write(&target, "old contents that are longer\n").unwrap();
        stream_to_file("sh", &["-c", "echo new"], &target, WriteMode::Overwrite)
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new\n");
    }

    #[tokio::test]
    async fn interrupted_stream_kills_the_child_and_keeps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("tail.txt");
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
        };
        // `sleep 30` would outlive the test if the interrupt path leaked it
        stream_to_file_until(
            "sh",
            &["-c", "echo started; sleep 30"],
            &target,
            WriteMode::Overwrite,
            shutdown,
        )
        .await
        .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "started\n");
    }

    #[tokio::test]
    async fn interrupted_capture_surfaces_as_interrupted() {
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
        };
        let err = capture_until(
            "sh",
            &["-c", "sleep 30"],
            false,
            looks_like_tool_failure,
            shutdown,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Interrupted));
    }
}
