//! Neutral-point capture watcher.
//!
//! The Trefftz instance's command script asks AVL to dump its stability
//! derivatives to a report file. AVL writes that file whenever it gets around
//! to it, so this watcher polls the path, scrapes the neutral point out of
//! the text, and distills it into a small summary file for downstream tools.
//! Like placement, capture is best-effort: a missing or unparsable report is
//! logged and the run continues.

use std::{fs, path::PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{config, poll::poll_until};

/// Matches the neutral-point line of an AVL stability dump. AVL versions
/// differ in labeling it `Xnp` or `x/c` and in whether a colon precedes the
/// value.
static NEUTRAL_POINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Neutral point\s*(?::\s*)?(?:Xnp|x/c)\s*=\s*([-+0-9.eE]+)")
        .unwrap_or_else(|err| panic!("invalid neutral point regex: {err}"))
});

/// What the capture watcher is looking at and where it writes its result.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    /// Stability report the Trefftz instance writes.
    pub report: PathBuf,
    /// Summary file to write once the neutral point is found.
    pub summary: PathBuf,
    /// Timing knobs, defaulted from [`config::CAPTURE`].
    pub timing: config::CaptureTiming,
}

impl CaptureConfig {
    /// A config with default timing.
    #[must_use]
    pub fn new(report: PathBuf, summary: PathBuf) -> Self {
        Self {
            report,
            summary,
            timing: config::CAPTURE,
        }
    }
}

/// Result of a capture attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureOutcome {
    /// The neutral point, when the report appeared and parsed in time.
    pub value: Option<f64>,
    /// Whether the summary file was written.
    pub summary_written: bool,
}

/// Handle to the spawned capture task.
pub struct CaptureWatcher {
    handle: JoinHandle<CaptureOutcome>,
}

impl CaptureWatcher {
    /// Spawn the watcher. Cancellation of `parent` stops it early.
    pub fn spawn(capture_config: CaptureConfig, parent: &CancellationToken) -> Self {
        let cancel = parent.child_token();
        let handle = tokio::spawn(capture(capture_config, cancel));
        Self { handle }
    }

    /// Wait up to `grace` for the watcher to finish.
    pub async fn join_within(self, grace: std::time::Duration) -> Option<CaptureOutcome> {
        match tokio::time::timeout(grace, self.handle).await {
            Ok(Ok(outcome)) => Some(outcome),
            Ok(Err(_)) | Err(_) => None,
        }
    }
}

/// Extract the neutral point from stability report text.
fn parse_neutral_point(text: &str) -> Option<f64> {
    NEUTRAL_POINT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Poll the report file until the neutral point shows up, then write the
/// summary. A partially written report simply fails to match and is retried
/// on the next pass.
async fn capture(capture_config: CaptureConfig, cancel: CancellationToken) -> CaptureOutcome {
    let timing = capture_config.timing;
    let value = poll_until(timing.poll_interval, timing.timeout, &cancel, || {
        let bytes = fs::read(&capture_config.report).ok()?;
        parse_neutral_point(&String::from_utf8_lossy(&bytes))
    })
    .await;

    let Some(value) = value else {
        warn!(
            report = %capture_config.report.display(),
            "stability report never yielded a neutral point; no summary written"
        );
        return CaptureOutcome {
            value: None,
            summary_written: false,
        };
    };

    info!(xnp = value, "captured neutral point");
    let summary_written = match fs::write(&capture_config.summary, format!("Xnp\n{value:.6}\n")) {
        Ok(()) => {
            info!(path = %capture_config.summary.display(), "wrote neutral point summary");
            true
        }
        Err(err) => {
            warn!(
                path = %capture_config.summary.display(),
                %err,
                "failed to write neutral point summary"
            );
            false
        }
    };
    CaptureOutcome {
        value: Some(value),
        summary_written,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const REPORT: &str = "\
 Derivatives...\n\
 Neutral point  Xnp =   0.2345\n\
 Clb Cnr / Clr Cnb  =   1.0\n";

    #[test]
    fn parses_both_report_dialects() {
        assert_eq!(parse_neutral_point(REPORT), Some(0.2345));
        assert_eq!(
            parse_neutral_point(" Neutral point : x/c = -1.25e-1\n"),
            Some(-0.125)
        );
        assert_eq!(parse_neutral_point("no such line"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn writes_the_summary_once_the_report_appears() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = dir.path().join("wing_stability.txt");
        let summary = dir.path().join("wing_neutral_point.txt");
        fs::write(&report, REPORT).expect("write report");

        let outcome = capture(
            CaptureConfig::new(report, summary.clone()),
            CancellationToken::new(),
        )
        .await;

        assert_eq!(outcome.value, Some(0.2345));
        assert!(outcome.summary_written);
        let text = fs::read_to_string(&summary).expect("read summary");
        assert_eq!(text, "Xnp\n0.234500\n");
    }

    #[tokio::test(start_paused = true)]
    async fn missing_report_times_out_without_a_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let summary = dir.path().join("wing_neutral_point.txt");

        let outcome = capture(
            CaptureConfig::new(dir.path().join("never_written.txt"), summary.clone()),
            CancellationToken::new(),
        )
        .await;

        assert_eq!(outcome.value, None);
        assert!(!outcome.summary_written);
        assert!(!summary.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn report_arriving_mid_poll_is_picked_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = dir.path().join("wing_stability.txt");
        let summary = dir.path().join("wing_neutral_point.txt");

        let watcher = CaptureWatcher::spawn(
            CaptureConfig::new(report.clone(), summary),
            &CancellationToken::new(),
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
        fs::write(&report, REPORT).expect("write report");

        let outcome = watcher
            .join_within(Duration::from_secs(30))
            .await
            .expect("watcher finished");
        assert_eq!(outcome.value, Some(0.2345));
    }
}
