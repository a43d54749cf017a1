//! External scanner process invocation
//!
//! Runs the scanner under a hard wall-clock timeout with combined
//! stdout/stderr capture. An exit status of 1 is the scanner's detection
//! convention and is forwarded as a successful invocation; any other
//! failure is retried exactly once after a fixed backoff. Timeouts are
//! final and never retried.

use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use super::error::EngineError;

/// Delay before the single retry after a failed invocation.
const RETRY_BACKOFF: Duration = Duration::from_secs(7);

/// Run `program` with `args`, returning the combined output text alongside
/// the invocation error, if any. Callers pass both to the parser, which
/// knows how to treat the detection exit status.
pub async fn invoke(
    program: &Path,
    args: &[&str],
    timeout: Duration,
) -> (String, Option<EngineError>) {
    invoke_with_backoff(program, args, timeout, RETRY_BACKOFF).await
}

async fn invoke_with_backoff(
    program: &Path,
    args: &[&str],
    timeout: Duration,
    backoff: Duration,
) -> (String, Option<EngineError>) {
    let (output, err) = run_once(program, args, timeout).await;
    let err = match err {
        None => return (output, None),
        Some(err) => err,
    };

    // Detections are not failures; timeouts already killed the process and
    // a second run would just burn another full timeout.
    if err.is_detection() || matches!(err, EngineError::Timeout { .. }) {
        return (output, Some(err));
    }

    log::debug!(
        "invocation of {} failed ({}), retrying in {:?}",
        program.display(),
        err,
        backoff
    );
    tokio::time::sleep(backoff).await;
    run_once(program, args, timeout).await
}

async fn run_once(
    program: &Path,
    args: &[&str],
    timeout: Duration,
) -> (String, Option<EngineError>) {
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);

    let seconds = timeout.as_secs();
    match tokio::time::timeout(timeout, command.output()).await {
        Err(_) => (String::new(), Some(EngineError::Timeout { seconds })),
        Ok(Err(e)) => (
            String::new(),
            Some(EngineError::Launch {
                program: program.display().to_string(),
                cause: e.to_string(),
            }),
        ),
        Ok(Ok(output)) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            if !output.stderr.is_empty() {
                text.push_str(&String::from_utf8_lossy(&output.stderr));
            }
            match output.status.code() {
                Some(0) => (text, None),
                Some(code) => (text, Some(EngineError::ExitStatus { code })),
                None => (
                    text,
                    Some(EngineError::Launch {
                        program: program.display().to_string(),
                        cause: "terminated by signal".to_string(),
                    }),
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    const FAST_BACKOFF: Duration = Duration::from_millis(10);
    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Write an executable shell script that also appends one line to a
    /// counter file per run, so tests can assert how often it was invoked.
    fn script(dir: &tempfile::TempDir, body: &str) -> (PathBuf, PathBuf) {
        let counter = dir.path().join("runs");
        let path = dir.path().join("scanner.sh");
        std::fs::write(
            &path,
            format!("#!/bin/sh\necho run >> {}\n{}\n", counter.display(), body),
        )
        .unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        (path, counter)
    }

    fn runs(counter: &Path) -> usize {
        std::fs::read_to_string(counter)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn successful_run_returns_combined_output() {
        let dir = tempfile::tempdir().unwrap();
        let (path, counter) = script(&dir, "echo out\necho err 1>&2");

        let (output, err) = invoke_with_backoff(&path, &[], TEST_TIMEOUT, FAST_BACKOFF).await;

        assert!(err.is_none());
        assert!(output.contains("out"));
        assert!(output.contains("err"));
        assert_eq!(runs(&counter), 1);
    }

    #[tokio::test]
    async fn detection_exit_is_forwarded_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let (path, counter) = script(&dir, "echo \"Signature 1 'Eicar.Test' found\"\nexit 1");

        let (output, err) = invoke_with_backoff(&path, &[], TEST_TIMEOUT, FAST_BACKOFF).await;

        let err = err.expect("detection exit status should be reported");
        assert!(err.is_detection());
        assert_eq!(err.to_string(), "exit status 1");
        assert!(output.contains("Eicar.Test"));
        assert_eq!(runs(&counter), 1);
    }

    #[tokio::test]
    async fn other_failures_are_retried_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let (path, counter) = script(&dir, "exit 2");

        let (_, err) = invoke_with_backoff(&path, &[], TEST_TIMEOUT, FAST_BACKOFF).await;

        let err = err.expect("exit status 2 should be reported");
        assert_eq!(err.to_string(), "exit status 2");
        assert_eq!(runs(&counter), 2);
    }

    #[tokio::test]
    async fn timeout_kills_the_process_and_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let (path, counter) = script(&dir, "sleep 30");

        let (_, err) =
            invoke_with_backoff(&path, &[], Duration::from_millis(200), FAST_BACKOFF).await;

        assert!(matches!(err, Some(EngineError::Timeout { .. })));
        assert_eq!(runs(&counter), 1);
    }

    #[tokio::test]
    async fn missing_program_fails_with_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-binary");

        let (_, err) = invoke_with_backoff(&path, &[], TEST_TIMEOUT, FAST_BACKOFF).await;

        assert!(matches!(err, Some(EngineError::Launch { .. })));
    }
}
