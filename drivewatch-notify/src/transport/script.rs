// SPDX-License-Identifier: GPL-3.0-only

//! Script transport: run a local executable with the message on stdin.
//!
//! Endpoint form: `script:///usr/local/bin/alert-hook`. The spawned process
//! is a scoped resource: stdin is closed after the write, and `kill_on_drop`
//! reaps the child if the dispatcher cancels the attempt.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use drivewatch_contracts::NotificationTransport;
use drivewatch_types::{NotificationRequest, NotificationResult};

pub struct ScriptTransport;

// The registry lowercases schemes for routing; accept the same here.
fn script_path(endpoint: &str) -> Option<&str> {
    let (scheme, path) = endpoint.split_once("://")?;
    scheme.eq_ignore_ascii_case("script").then_some(path)
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[async_trait]
impl NotificationTransport for ScriptTransport {
    fn schemes(&self) -> &'static [&'static str] {
        &["script"]
    }

    async fn send(&self, request: &NotificationRequest) -> NotificationResult {
        let Some(path) = script_path(&request.endpoint) else {
            return NotificationResult::failure(&request.endpoint, "malformed script endpoint");
        };
        if !is_executable(Path::new(path)) {
            return NotificationResult::failure(
                &request.endpoint,
                format!("script missing or not executable: {path}"),
            );
        }

        let mut child = match Command::new(path)
            .env("DRIVEWATCH_SUBJECT", &request.subject)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return NotificationResult::failure(
                    &request.endpoint,
                    format!("spawn script: {e}"),
                );
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(request.body.as_bytes()).await {
                Ok(()) => {}
                // A script may legitimately exit without reading stdin.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => {
                    return NotificationResult::failure(
                        &request.endpoint,
                        format!("write script stdin: {e}"),
                    );
                }
            }
            // Dropping the handle closes the pipe so the script sees EOF.
        }

        match child.wait_with_output().await {
            Ok(output) if output.status.success() => {
                NotificationResult::success(&request.endpoint)
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr = stderr.trim();
                let detail = match output.status.code() {
                    Some(code) if stderr.is_empty() => format!("script exited with code {code}"),
                    Some(code) => format!("script exited with code {code}: {stderr}"),
                    None => "script terminated by signal".to_string(),
                };
                NotificationResult::failure(&request.endpoint, detail)
            }
            Err(e) => {
                NotificationResult::failure(&request.endpoint, format!("wait for script: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn request(endpoint: String) -> NotificationRequest {
        NotificationRequest {
            endpoint,
            subject: "test".to_string(),
            body: "body".to_string(),
        }
    }

    fn write_script(dir: &Path, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let mut perms = file.metadata().unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        format!("script://{}", path.display())
    }

    #[tokio::test]
    async fn missing_path_fails_without_spawning() {
        let result = ScriptTransport
            .send(&request("script:///missing/path/on/disk".to_string()))
            .await;
        assert!(!result.succeeded);
        assert!(result.detail.unwrap().contains("not executable"));
    }

    #[tokio::test]
    async fn scheme_matches_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = write_script(dir.path(), "ok.sh", "#!/bin/sh\ncat > /dev/null\nexit 0\n");
        let endpoint = endpoint.replace("script://", "SCRIPT://");
        let result = ScriptTransport.send(&request(endpoint)).await;
        assert!(result.succeeded, "{:?}", result.detail);
    }

    #[tokio::test]
    async fn zero_exit_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = write_script(dir.path(), "ok.sh", "#!/bin/sh\ncat > /dev/null\nexit 0\n");
        let result = ScriptTransport.send(&request(endpoint)).await;
        assert!(result.succeeded, "{:?}", result.detail);
    }

    #[tokio::test]
    async fn nonzero_exit_fails_with_code() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = write_script(
            dir.path(),
            "fail.sh",
            "#!/bin/sh\necho boom >&2\nexit 3\n",
        );
        let result = ScriptTransport.send(&request(endpoint)).await;
        assert!(!result.succeeded);
        let detail = result.detail.unwrap();
        assert!(detail.contains("code 3"), "{detail}");
        assert!(detail.contains("boom"), "{detail}");
    }
}
