//! External office-rendering engine invocation.
//!
//! Word→PDF is the one conversion this library does not perform itself: it
//! shells out to a LibreOffice-compatible binary in headless mode. The
//! engine being absent (typical on minimal server images) maps to
//! [`FlexifileError::EngineUnavailable`] — a deployment-time condition the
//! caller can report, never retried here.
//!
//! The invocation is file-based on both ends: the staged input path goes in,
//! the engine writes `<stem>.pdf` next to it in the scratch directory, and
//! the bytes are read back before the temp scope closes.

use crate::config::ConvertConfig;
use crate::error::FlexifileError;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Render `input_path` to PDF via the configured office binary, returning
/// the PDF bytes.
pub(crate) fn render_pdf(
    input_path: &Path,
    work_dir: &Path,
    config: &ConvertConfig,
) -> Result<Vec<u8>, FlexifileError> {
    let engine = config.office_bin.display().to_string();

    let mut child = Command::new(&config.office_bin)
        .arg("--headless")
        .arg("--norestore")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(work_dir)
        .arg(input_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| FlexifileError::EngineUnavailable {
            engine: engine.clone(),
            detail: e.to_string(),
        })?;

    // Drain stderr concurrently: a wedged engine can fill the pipe and would
    // otherwise block forever, turning its real diagnostic into a timeout.
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            pipe.read_to_string(&mut buf).ok();
            buf
        })
    });

    let waited = wait_with_timeout(&mut child, Duration::from_secs(config.office_timeout_secs));

    // The child is dead (or killed) by now, so the pipe is closed and the
    // reader joins promptly.
    let stderr = stderr_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    let status = match waited {
        Ok(status) => status,
        Err(FlexifileError::ConversionFailed { detail }) if !stderr.trim().is_empty() => {
            return Err(FlexifileError::ConversionFailed {
                detail: format!("{detail}: {}", stderr.trim()),
            });
        }
        Err(e) => return Err(e),
    };

    if !status.success() {
        warn!("Office engine exited with {status}: {}", stderr.trim());
        return Err(FlexifileError::ConversionFailed {
            detail: format!("office engine exited with {status}: {}", stderr.trim()),
        });
    }

    // The engine names its output after the input stem.
    let out_path = work_dir
        .join(input_path.file_stem().unwrap_or_default())
        .with_extension("pdf");
    debug!("Office engine finished, reading {}", out_path.display());

    std::fs::read(&out_path).map_err(|_| FlexifileError::ConversionFailed {
        detail: format!(
            "office engine produced no output at {}: {}",
            out_path.display(),
            stderr.trim()
        ),
    })
}

/// Wait for the child, killing it if the deadline passes. There is no retry
/// policy; a timed-out engine is reported as a failed conversion.
fn wait_with_timeout(
    child: &mut std::process::Child,
    timeout: Duration,
) -> Result<std::process::ExitStatus, FlexifileError> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    child.kill().ok();
                    child.wait().ok();
                    return Err(FlexifileError::ConversionFailed {
                        detail: format!(
                            "office engine timed out after {}s",
                            timeout.as_secs()
                        ),
                    });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                return Err(FlexifileError::Internal(format!(
                    "waiting on office engine: {e}"
                )))
            }
        }
    }
}
