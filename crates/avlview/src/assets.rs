//! On-disk preparation for an orchestration run.
//!
//! Everything the two AVL instances consume is written up front into the
//! output directory, which also becomes their working directory: the
//! geometry file, the run-case file, and one command script per instance.
//! Command scripts reference the run and report files by bare name so the
//! directory can be relocated.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use avl_files::{
    CommandScript, EnvelopeSweep, RunCase, WingGeometry, points::read_point_file, runcase, script,
};
use tracing::{debug, info};

use crate::{
    cli::Cli,
    error::{Error, Result},
};

/// Geometry file name used when the wing is regenerated from edge points.
const GENERATED_GEOMETRY: &str = "wing_from_points.avl";

/// Relative locations probed for the AVL executable, in order.
const EXECUTABLE_CANDIDATES: &[&str] = &["binw32/avl3.51-32.exe", "bin/avl.exe", "avl.exe"];

/// Everything the supervisor needs to launch and drive the two instances.
#[derive(Clone, Debug)]
pub struct AssetPlan {
    /// The AVL executable.
    pub executable: PathBuf,
    /// Working directory for both instances.
    pub working_dir: PathBuf,
    /// Geometry file passed to AVL on the command line.
    pub geometry_file: PathBuf,
    /// Stability report the Trefftz instance will write.
    pub stability_file: PathBuf,
    /// Neutral-point summary the capture watcher will write.
    pub summary_file: PathBuf,
    /// Startup script for the geometry instance.
    pub geometry_script: CommandScript,
    /// Startup script for the Trefftz instance.
    pub trefftz_script: CommandScript,
    /// Script for a `--batch` run, which replaces the two viewers with one
    /// non-interactive instance.
    pub batch_script: Option<CommandScript>,
}

/// Build the run cases requested on the command line.
fn build_cases(cli: &Cli) -> Vec<RunCase> {
    if cli.envelope {
        EnvelopeSweep {
            alpha_min: cli.alpha_min,
            alpha_max: cli.alpha_max,
            alpha_step: cli.alpha_step,
            cl_target: cli.cl_target,
            mach: cli.mach,
        }
        .cases()
    } else {
        vec![RunCase {
            alpha: cli.alpha,
            mach: cli.mach,
            cl_target: cli.cl_target,
        }]
    }
}

/// Resolve the geometry file: copy a user-supplied one into the output
/// directory, or derive a wing from the edge point files.
fn ensure_geometry(cli: &Cli, output_dir: &Path) -> Result<PathBuf> {
    if let Some(avl) = &cli.avl {
        if !avl.exists() {
            return Err(Error::MissingInput(avl.clone()));
        }
        let name = avl
            .file_name()
            .ok_or_else(|| Error::MissingInput(avl.clone()))?;
        let dest = output_dir.join(name);
        if dest != *avl {
            fs::copy(avl, &dest)?;
            debug!(from = %avl.display(), to = %dest.display(), "copied geometry file");
        }
        return Ok(dest);
    }

    let (Some(le), Some(te)) = (&cli.le, &cli.te) else {
        return Err(Error::MissingPoints);
    };
    let leading = read_point_file(le)?;
    let trailing = read_point_file(te)?;
    let wing = WingGeometry::from_edges(&leading, &trailing)?;
    info!(
        sections = wing.sections.len(),
        area = wing.reference.area,
        span = wing.reference.span,
        "derived wing from edge points"
    );
    let path = output_dir.join(GENERATED_GEOMETRY);
    wing.write(&path, "Wing from edge points")?;
    Ok(path)
}

/// Locate the AVL executable: an explicit `--avl-exe` wins, otherwise the
/// usual install locations are probed relative to the current directory.
fn detect_executable(cli: &Cli) -> Result<PathBuf> {
    if let Some(exe) = &cli.avl_exe {
        if exe.exists() {
            return Ok(exe.clone());
        }
        return Err(Error::MissingInput(exe.clone()));
    }
    for candidate in EXECUTABLE_CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            info!(path = %path.display(), "found AVL executable");
            return Ok(path);
        }
    }
    Err(Error::AvlExecutableNotFound)
}

/// File name of `path` as UTF-8, falling back to `default`.
fn bare_name(path: &Path, default: &str) -> String {
    path.file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(default)
        .to_string()
}

/// Prepare the output directory and all run artifacts.
pub fn prepare(cli: &Cli) -> Result<AssetPlan> {
    fs::create_dir_all(&cli.output_dir)?;
    let output_dir = &cli.output_dir;

    let geometry_file = ensure_geometry(cli, output_dir)?;
    let base = geometry_file
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("wing")
        .to_string();

    let run_file = output_dir.join(format!("{base}.run"));
    let stability_file = output_dir.join(format!("{base}_stability.txt"));
    let summary_file = output_dir.join(format!("{base}_neutral_point.txt"));

    let cases = build_cases(cli);
    runcase::write_run_file(&run_file, &cases)?;

    // A leftover report from an earlier run must not satisfy the capture
    // watcher before the Trefftz instance writes a fresh one.
    if stability_file.exists() {
        fs::remove_file(&stability_file)?;
        debug!(path = %stability_file.display(), "removed stale stability report");
    }

    let run_name = bare_name(&run_file, "wing.run");
    let stability_name = bare_name(&stability_file, "wing_stability.txt");
    let geometry_script = script::geometry_view(&run_name);
    let trefftz_script = script::trefftz_view(&run_name, cases.len(), &stability_name);
    geometry_script.write(&output_dir.join(format!("{base}_geometry.commands")))?;
    trefftz_script.write(&output_dir.join(format!("{base}_trefftz.commands")))?;

    let batch_script = if cli.batch {
        let batch = script::envelope_batch(&run_name, cases.len());
        batch.write(&output_dir.join(format!("{base}_batch.commands")))?;
        Some(batch)
    } else {
        None
    };

    let executable = detect_executable(cli)?;

    Ok(AssetPlan {
        executable,
        working_dir: output_dir.clone(),
        geometry_file,
        stability_file,
        summary_file,
        geometry_script,
        trefftz_script,
        batch_script,
    })
}
