//! Command scripts piped to AVL's modal menu system.
//!
//! AVL is driven by single-letter verbs and menu names on stdin; a blank
//! line means "accept default / return". Scripts are built once per run and
//! immutable afterwards; rendering always ends with a newline so the final
//! command is actually submitted.

use std::{fs, path::Path};

use tracing::info;

use crate::error::Result;

/// An ordered, immutable-after-build sequence of command lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandScript {
    lines: Vec<String>,
}

impl CommandScript {
    /// An empty script.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a script from lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one command line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append a blank line ("accept default / return").
    pub fn push_return(&mut self) {
        self.lines.push(String::new());
    }

    /// The command lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when the script has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render as newline-terminated text ready to write to a pipe.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Render and write the script to disk for diagnostics.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        info!(path = %path.display(), lines = self.lines.len(), "wrote command script");
        Ok(())
    }
}

/// Script for the geometry instance: load cases, execute the first one, and
/// open the 3D geometry view at a standard orientation.
#[must_use]
pub fn geometry_view(run_file_name: &str) -> CommandScript {
    CommandScript::from_lines([
        "CASE",
        run_file_name,
        "OPER",
        "#",
        "1",
        "X",
        "G",
        "V",
        "90",
        "90",
        "",
    ])
}

/// Script for the Trefftz instance: load cases, execute each one, dump the
/// stability derivatives (which produces the report file the capture watcher
/// polls), and open the Trefftz plot.
#[must_use]
pub fn trefftz_view(
    run_file_name: &str,
    case_count: usize,
    stability_file_name: &str,
) -> CommandScript {
    let mut script = CommandScript::from_lines(["CASE", run_file_name, "OPER"]);
    for case in 1..=case_count.max(1) {
        script.push("#");
        script.push(case.to_string());
        script.push("X");
        script.push_return();
    }
    script.push("ST");
    script.push(stability_file_name);
    script.push("T");
    script
}

/// Follow-up sequence for the geometry instance after its window has been
/// repositioned: leave the plot, re-enter OPER, redraw the geometry at the
/// viewing angle, re-execute, and clear.
#[must_use]
pub fn geometry_refresh() -> CommandScript {
    CommandScript::from_lines(["", "", "", "OPER", "G", "V", "-90 -90", "X", "C", ""])
}

/// Follow-up sequence for the Trefftz instance after repositioning:
/// re-execute and rescale the Trefftz plot.
#[must_use]
pub fn trefftz_refresh() -> CommandScript {
    CommandScript::from_lines(["", "OPER", "T", "X", "S", "6.5", ""])
}

/// Batch script that executes every case, saves the run file back with the
/// solved values, and quits. Drives the single non-interactive instance of
/// a `--batch` envelope run.
#[must_use]
pub fn envelope_batch(run_file_name: &str, case_count: usize) -> CommandScript {
    let mut script = CommandScript::from_lines(["CASE", run_file_name, "OPER"]);
    for case in 1..=case_count.max(1) {
        script.push("#");
        script.push(case.to_string());
        script.push("X");
        script.push_return();
    }
    script.push("T");
    script.push_return();
    script.push("S");
    script.push(run_file_name);
    script.push("Q");
    script.push("Q");
    script
}
