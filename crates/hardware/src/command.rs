//! Bounded runs of OS query commands.

use std::time::Duration;

use tokio::process::Command;

use crate::HardwareError;

/// Runs `command` to completion and returns its trimmed stdout.
///
/// The child is killed if it has not finished within `limit`.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) async fn output_within(
    mut command: Command,
    limit: Duration,
) -> Result<String, HardwareError> {
    let program = command.as_std().get_program().to_string_lossy().into_owned();
    command.kill_on_drop(true);

    let output = match tokio::time::timeout(limit, command.output()).await {
        Ok(output) => output?,
        Err(_) => {
            return Err(HardwareError::Timeout {
                program,
                secs: limit.as_secs(),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            return Err(HardwareError::Exit {
                program,
                status: output.status.to_string(),
            });
        }
        return Err(HardwareError::Query(stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    #[tokio::test]
    async fn returns_trimmed_stdout() {
        let out = output_within(sh("echo ' 3200 '"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out, "3200");
    }

    #[tokio::test]
    async fn stalled_command_times_out() {
        let started = std::time::Instant::now();
        let err = output_within(sh("sleep 5"), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, HardwareError::Timeout { ref program, .. } if program == "sh"));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn failure_carries_stderr() {
        let err = output_within(sh("echo 'WMI repository broken' >&2; exit 1"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, HardwareError::Query(ref msg) if msg == "WMI repository broken"));
    }

    #[tokio::test]
    async fn silent_failure_reports_status() {
        let err = output_within(sh("exit 3"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, HardwareError::Exit { .. }));
    }
}
