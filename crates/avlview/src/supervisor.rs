//! Lifecycle management for the two AVL instances.
//!
//! The supervisor launches both processes, spawns the placement and capture
//! watchers, delivers the startup and refresh scripts over stdin, and then
//! waits for the user to close both AVL windows. Ctrl-C at any point kills
//! both children and maps to exit code 130.
//!
//! Stdin of each child stays open for the whole run: AVL quits on EOF, so
//! the write half is held in [`ManagedChild`] rather than dropped after the
//! last script.

use std::{process::Stdio, sync::Arc};

use avl_files::CommandScript;
use tokio::{
    io::AsyncWriteExt,
    process::{Child, Command},
    time::sleep,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use winops::{SplitPolicy, WinOps, plan_targets};

use crate::{
    assets::AssetPlan,
    capture::{CaptureConfig, CaptureWatcher},
    config,
    error::{Error, Result},
    placement::{InstanceRole, PlacementWatcher, TrackedInstance, WatchConfig},
};

/// One launched AVL process with its stdin held open.
#[derive(Debug)]
pub struct ManagedChild {
    /// Which instance this is.
    role: InstanceRole,
    /// The process.
    child: Child,
    /// Its pid, captured at spawn time.
    pid: u32,
}

impl ManagedChild {
    /// Kill the process and reap it. Errors are logged, not propagated:
    /// teardown must run to completion for both children.
    async fn terminate(&mut self) {
        if let Err(err) = self.child.start_kill() {
            debug!(role = %self.role, %err, "kill failed (process already gone)");
        }
        match self.child.wait().await {
            Ok(status) => debug!(role = %self.role, %status, "terminated AVL instance"),
            Err(err) => warn!(role = %self.role, %err, "failed to reap AVL instance"),
        }
    }
}

/// Write a script to a child's stdin. Delivery failures are recorded rather
/// than propagated; a closed pipe here usually means the instance died, and
/// the liveness check that follows reports that with a better diagnosis.
async fn deliver(
    child: &mut ManagedChild,
    script: &CommandScript,
    failures: &mut Vec<InstanceRole>,
) {
    let Some(stdin) = child.child.stdin.as_mut() else {
        warn!(role = %child.role, "stdin already closed; cannot deliver script");
        failures.push(child.role);
        return;
    };
    let payload = script.render();
    let result = async {
        stdin.write_all(payload.as_bytes()).await?;
        stdin.flush().await
    }
    .await;
    match result {
        Ok(()) => {
            debug!(role = %child.role, lines = script.lines().len(), "delivered command script");
        }
        Err(err) => {
            warn!(role = %child.role, %err, "failed to deliver command script");
            failures.push(child.role);
        }
    }
}

/// Kill and reap both children, geometry first. Used on interrupt, where
/// both must be down before the error propagates.
async fn terminate_both(geometry: &mut ManagedChild, trefftz: &mut ManagedChild) {
    geometry.terminate().await;
    trefftz.terminate().await;
}

/// Launch the geometry instance, then the Trefftz instance; if the second
/// spawn fails the first is killed before the error is returned, so a
/// launch failure never leaks a stray AVL process.
async fn launch_pair<F>(mut spawn: F) -> Result<(ManagedChild, ManagedChild)>
where
    F: FnMut(InstanceRole) -> Result<ManagedChild>,
{
    let mut geometry = spawn(InstanceRole::Geometry)?;
    match spawn(InstanceRole::Trefftz) {
        Ok(trefftz) => Ok((geometry, trefftz)),
        Err(err) => {
            warn!("Trefftz launch failed; rolling back the geometry instance");
            geometry.terminate().await;
            Err(err)
        }
    }
}

/// Exit codes and delivery record of a completed run.
#[derive(Clone, Debug)]
pub struct OrchestrationResult {
    /// Geometry instance exit code; `None` means killed by a signal.
    pub geometry_exit: Option<i32>,
    /// Trefftz instance exit code; `None` means killed by a signal.
    pub trefftz_exit: Option<i32>,
    /// Instances that missed at least one script delivery.
    pub delivery_failures: Vec<InstanceRole>,
}

impl OrchestrationResult {
    /// Fail on the first instance that exited with a non-zero code. An exit
    /// via signal carries no code and is treated as a user-driven close,
    /// not a failure.
    pub fn ensure_success(&self) -> Result<()> {
        for (role, exit) in [
            (InstanceRole::Geometry, self.geometry_exit),
            (InstanceRole::Trefftz, self.trefftz_exit),
        ] {
            if let Some(code) = exit
                && code != 0
            {
                return Err(Error::InstanceFailed { role, code });
            }
        }
        Ok(())
    }
}

/// Drives one full orchestration run.
pub struct Supervisor {
    plan: AssetPlan,
    ops: Arc<dyn WinOps>,
    layout: SplitPolicy,
}

impl Supervisor {
    /// Build a supervisor over prepared assets.
    #[must_use]
    pub fn new(plan: AssetPlan, ops: Arc<dyn WinOps>, layout: SplitPolicy) -> Self {
        Self { plan, ops, layout }
    }

    /// Spawn one AVL instance in the output directory with its geometry file
    /// on the command line and stdin piped.
    fn spawn_instance(&self, role: InstanceRole) -> Result<ManagedChild> {
        let child = Command::new(&self.plan.executable)
            .arg(&self.plan.geometry_file)
            .current_dir(&self.plan.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn { role, source })?;
        let pid = child.id().unwrap_or(0);
        info!(%role, pid, exe = %self.plan.executable.display(), "launched AVL instance");
        Ok(ManagedChild { role, child, pid })
    }

    /// Run an envelope batch: one non-interactive instance that executes
    /// every case, saves the solved run file, and quits on its own (the
    /// script ends by quitting AVL). No watchers are involved; nothing
    /// opens a window and no stability report is captured.
    pub async fn run_batch(&self, script: &CommandScript) -> Result<()> {
        let mut child = self.spawn_instance(InstanceRole::Batch)?;
        let mut delivery_failures = Vec::new();
        deliver(&mut child, script, &mut delivery_failures).await;

        let status = tokio::select! {
            status = child.child.wait() => status?,
            _ = tokio::signal::ctrl_c() => {
                child.terminate().await;
                return Err(Error::Interrupted);
            }
        };
        info!(%status, "batch instance exited");
        if let Some(code) = status.code()
            && code != 0
        {
            return Err(Error::InstanceFailed {
                role: InstanceRole::Batch,
                code,
            });
        }
        Ok(())
    }

    /// Run the orchestration to completion.
    ///
    /// Cancelling the returned future (or any early return) cancels the run
    /// token via its drop guard, which stops both watcher tasks.
    pub async fn run(&self) -> Result<OrchestrationResult> {
        let run_token = CancellationToken::new();
        let _stop_watchers = run_token.clone().drop_guard();

        let (mut geometry, mut trefftz) = launch_pair(|role| self.spawn_instance(role)).await?;

        let (width, height) = self.ops.screen_size();
        let (geometry_rect, trefftz_rect) = plan_targets(width, height, self.layout);
        let placement = PlacementWatcher::spawn(
            Arc::clone(&self.ops),
            WatchConfig::new(vec![
                TrackedInstance {
                    role: InstanceRole::Geometry,
                    pid: geometry.pid,
                    target: geometry_rect,
                },
                TrackedInstance {
                    role: InstanceRole::Trefftz,
                    pid: trefftz.pid,
                    target: trefftz_rect,
                },
            ]),
            &run_token,
        );
        let capture = CaptureWatcher::spawn(
            CaptureConfig::new(self.plan.stability_file.clone(), self.plan.summary_file.clone()),
            &run_token,
        );

        let mut delivery_failures = Vec::new();
        deliver(&mut geometry, &self.plan.geometry_script, &mut delivery_failures).await;
        deliver(&mut trefftz, &self.plan.trefftz_script, &mut delivery_failures).await;

        // Refresh after the windows have (probably) been moved; a redraw
        // mid-move leaves a half-painted plot.
        if placement.join_within(config::PLACEMENT.grace).await.is_none() {
            warn!("window placement still in progress; sending refresh scripts anyway");
        }
        sleep(config::SETTLE.pre_refresh).await;
        deliver(&mut geometry, &avl_files::script::geometry_refresh(), &mut delivery_failures)
            .await;
        sleep(config::SETTLE.between_refresh).await;
        deliver(&mut trefftz, &avl_files::script::trefftz_refresh(), &mut delivery_failures).await;

        // Liveness check: a bad geometry or run file makes AVL exit almost
        // immediately instead of opening a window.
        sleep(config::SETTLE.liveness).await;
        if let Some(status) = geometry.child.try_wait()? {
            trefftz.terminate().await;
            return Err(Error::EarlyExit {
                role: InstanceRole::Geometry,
                status,
            });
        }
        if let Some(status) = trefftz.child.try_wait()? {
            geometry.terminate().await;
            return Err(Error::EarlyExit {
                role: InstanceRole::Trefftz,
                status,
            });
        }

        info!("both AVL instances running; close their windows to finish (Ctrl-C aborts)");
        let geometry_status = tokio::select! {
            status = geometry.child.wait() => status?,
            _ = tokio::signal::ctrl_c() => {
                terminate_both(&mut geometry, &mut trefftz).await;
                return Err(Error::Interrupted);
            }
        };
        debug!(status = %geometry_status, "geometry instance exited");
        let trefftz_status = tokio::select! {
            status = trefftz.child.wait() => status?,
            _ = tokio::signal::ctrl_c() => {
                trefftz.terminate().await;
                return Err(Error::Interrupted);
            }
        };
        debug!(status = %trefftz_status, "Trefftz instance exited");

        if capture.join_within(config::CAPTURE.join_grace).await.is_none() {
            debug!("capture watcher still pending at teardown");
        }

        let result = OrchestrationResult {
            geometry_exit: geometry_status.code(),
            trefftz_exit: trefftz_status.code(),
            delivery_failures,
        };
        result.ensure_success()?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(geometry_exit: Option<i32>, trefftz_exit: Option<i32>) -> OrchestrationResult {
        OrchestrationResult {
            geometry_exit,
            trefftz_exit,
            delivery_failures: Vec::new(),
        }
    }

    #[test]
    fn clean_exits_are_success() {
        assert!(result(Some(0), Some(0)).ensure_success().is_ok());
    }

    #[test]
    fn signal_exit_is_not_a_failure() {
        assert!(result(None, Some(0)).ensure_success().is_ok());
        assert!(result(None, None).ensure_success().is_ok());
    }

    #[test]
    fn nonzero_exit_is_attributed_to_the_right_instance() {
        let err = result(Some(0), Some(2)).ensure_success().expect_err("fails");
        assert!(matches!(
            err,
            Error::InstanceFailed {
                role: InstanceRole::Trefftz,
                code: 2
            }
        ));

        let err = result(Some(3), Some(2)).ensure_success().expect_err("fails");
        assert!(matches!(
            err,
            Error::InstanceFailed {
                role: InstanceRole::Geometry,
                code: 3
            }
        ));
    }

    #[cfg(unix)]
    mod process {
        use avl_files::CommandScript;
        use tokio::process::Command;

        use super::*;

        fn spawn_sh(role: InstanceRole, script: &str) -> Result<ManagedChild> {
            let child = Command::new("/bin/sh")
                .arg("-c")
                .arg(script)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| Error::Spawn { role, source })?;
            let pid = child.id().unwrap_or(0);
            Ok(ManagedChild { role, child, pid })
        }

        fn batch_supervisor(dir: &std::path::Path, driver: &str) -> Supervisor {
            let geometry = dir.join("wing.avl");
            std::fs::write(&geometry, driver).expect("write driver");
            let plan = AssetPlan {
                executable: "/bin/sh".into(),
                working_dir: dir.to_path_buf(),
                geometry_file: geometry,
                stability_file: dir.join("wing_stability.txt"),
                summary_file: dir.join("wing_neutral_point.txt"),
                geometry_script: CommandScript::new(),
                trefftz_script: CommandScript::new(),
                batch_script: None,
            };
            Supervisor::new(plan, Arc::new(winops::NoopWinOps), SplitPolicy::default())
        }

        #[tokio::test]
        async fn batch_run_delivers_the_script_and_succeeds() {
            let dir = tempfile::tempdir().expect("tempdir");
            let supervisor = batch_supervisor(dir.path(), "head -c 10 > captured.txt; exit 0");
            let script = avl_files::script::envelope_batch("wing.run", 1);

            supervisor.run_batch(&script).await.expect("batch succeeds");
            let text =
                std::fs::read_to_string(dir.path().join("captured.txt")).expect("read captured");
            assert_eq!(text, &script.render()[..10]);
        }

        #[tokio::test]
        async fn batch_failure_reports_the_exit_code() {
            let dir = tempfile::tempdir().expect("tempdir");
            let supervisor = batch_supervisor(dir.path(), "exit 3");
            let script = avl_files::script::envelope_batch("wing.run", 1);

            let err = supervisor.run_batch(&script).await.expect_err("batch fails");
            assert!(matches!(
                err,
                Error::InstanceFailed {
                    role: InstanceRole::Batch,
                    code: 3
                }
            ));
        }

        #[tokio::test]
        async fn interrupt_teardown_kills_both_children() {
            let mut geometry = spawn_sh(InstanceRole::Geometry, "sleep 30").expect("spawn");
            let mut trefftz = spawn_sh(InstanceRole::Trefftz, "sleep 30").expect("spawn");
            terminate_both(&mut geometry, &mut trefftz).await;
            assert!(geometry.child.try_wait().expect("try_wait").is_some());
            assert!(trefftz.child.try_wait().expect("try_wait").is_some());
        }

        #[tokio::test]
        async fn terminate_kills_and_reaps() {
            let mut child =
                spawn_sh(InstanceRole::Geometry, "sleep 30").expect("spawn");
            child.terminate().await;
            let status = child.child.try_wait().expect("try_wait");
            assert!(status.is_some());
        }

        #[tokio::test]
        async fn failed_second_launch_rolls_back_the_first() {
            let mut first_pid = 0;
            let err = launch_pair(|role| match role {
                InstanceRole::Geometry => {
                    let child = spawn_sh(role, "sleep 30")?;
                    first_pid = child.pid;
                    Ok(child)
                }
                InstanceRole::Trefftz => Err(Error::Spawn {
                    role,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no exe"),
                }),
                InstanceRole::Batch => unreachable!("launch_pair never spawns Batch"),
            })
            .await
            .expect_err("launch fails");

            assert!(matches!(
                err,
                Error::Spawn {
                    role: InstanceRole::Trefftz,
                    ..
                }
            ));
            assert_ne!(first_pid, 0);
            #[cfg(target_os = "linux")]
            assert!(
                !std::path::Path::new(&format!("/proc/{first_pid}")).exists(),
                "geometry instance should have been killed and reaped"
            );
        }

        #[tokio::test]
        async fn deliver_writes_the_rendered_script() {
            let dir = tempfile::tempdir().expect("tempdir");
            let out = dir.path().join("captured.txt");
            let mut child = spawn_sh(
                InstanceRole::Trefftz,
                &format!("cat > {}", out.display()),
            )
            .expect("spawn");

            let script = CommandScript::from_lines(["OPER", "X", ""]);
            let mut failures = Vec::new();
            deliver(&mut child, &script, &mut failures).await;
            assert!(failures.is_empty());

            // EOF lets cat finish.
            drop(child.child.stdin.take());
            let status = child.child.wait().await.expect("wait");
            assert!(status.success());
            let text = std::fs::read_to_string(&out).expect("read captured");
            assert_eq!(text, "OPER\nX\n\n");
        }

        #[tokio::test]
        async fn delivery_to_a_dead_child_is_recorded_not_fatal() {
            let mut child = spawn_sh(InstanceRole::Geometry, "exit 0").expect("spawn");
            let _ = child.child.wait().await;
            // The pipe is closed now; repeated large writes must error.
            let big = CommandScript::from_lines(vec!["X"; 100_000]);
            let mut failures = Vec::new();
            deliver(&mut child, &big, &mut failures).await;
            deliver(&mut child, &big, &mut failures).await;
            assert!(!failures.is_empty());
        }
    }
}
