//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use winops::SplitPolicy;

/// How the right half of the screen is divided between the two plot windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// Geometry above, Trefftz below.
    #[default]
    Stacked,
    /// Geometry and Trefftz side by side, full height.
    SideBySide,
}

impl From<LayoutArg> for SplitPolicy {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Stacked => Self::Stacked,
            LayoutArg::SideBySide => Self::SideBySide,
        }
    }
}

/// Launch two AVL instances showing the geometry and Trefftz views of a wing,
/// positioned on the right half of the screen.
#[derive(Parser, Debug)]
#[command(name = "avlview", version)]
pub struct Cli {
    /// Logging options.
    #[command(flatten)]
    pub log: logging::LogArgs,

    /// CSV file of leading-edge points (x,y,z in inches).
    #[arg(long, value_name = "FILE", requires = "te")]
    pub le: Option<PathBuf>,

    /// CSV file of trailing-edge points, paired row-for-row with --le.
    #[arg(long, value_name = "FILE", requires = "le")]
    pub te: Option<PathBuf>,

    /// Existing AVL geometry file to use instead of regenerating one from
    /// edge points.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["le", "te"])]
    pub avl: Option<PathBuf>,

    /// Directory for generated geometry, run, command, and summary files.
    /// Also the working directory of both AVL instances.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Angle of attack in degrees for the operating point.
    #[arg(long, default_value_t = 3.0, allow_negative_numbers = true)]
    pub alpha: f64,

    /// Freestream Mach number.
    #[arg(long, default_value_t = 0.75)]
    pub mach: f64,

    /// Path to the AVL executable; auto-detected when omitted.
    #[arg(long, value_name = "PATH")]
    pub avl_exe: Option<PathBuf>,

    /// Window layout for the two plot windows.
    #[arg(long, value_enum, default_value_t = LayoutArg::Stacked)]
    pub layout: LayoutArg,

    /// Sweep angle of attack over a range of run cases instead of the single
    /// --alpha point.
    #[arg(long)]
    pub envelope: bool,

    /// Run the --envelope cases in one non-interactive AVL instance, save
    /// the solved run file, and exit without opening any windows.
    #[arg(long, requires = "envelope")]
    pub batch: bool,

    /// First angle of attack of the --envelope sweep, degrees.
    #[arg(long, default_value_t = -5.0, allow_negative_numbers = true)]
    pub alpha_min: f64,

    /// Last angle of attack of the --envelope sweep (inclusive), degrees.
    #[arg(long, default_value_t = 15.0, allow_negative_numbers = true)]
    pub alpha_max: f64,

    /// Step between --envelope cases, degrees.
    #[arg(long, default_value_t = 1.0)]
    pub alpha_step: f64,

    /// Constrain every run case to this CL instead of its alpha.
    #[arg(long, value_name = "CL")]
    pub cl_target: Option<f64>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_standard_operating_point() {
        let cli = Cli::parse_from(["avlview", "--avl", "wing.avl"]);
        assert_eq!(cli.alpha, 3.0);
        assert_eq!(cli.mach, 0.75);
        assert_eq!(cli.layout, LayoutArg::Stacked);
        assert!(!cli.envelope);
    }

    #[test]
    fn avl_conflicts_with_edge_points() {
        let err = Cli::try_parse_from([
            "avlview", "--avl", "wing.avl", "--le", "le.csv", "--te", "te.csv",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn batch_requires_envelope() {
        assert!(Cli::try_parse_from(["avlview", "--avl", "wing.avl", "--batch"]).is_err());
        let cli = Cli::parse_from(["avlview", "--avl", "wing.avl", "--envelope", "--batch"]);
        assert!(cli.batch);
    }

    #[test]
    fn le_requires_te() {
        assert!(Cli::try_parse_from(["avlview", "--le", "le.csv"]).is_err());
    }

    #[test]
    fn negative_alpha_parses() {
        let cli = Cli::parse_from(["avlview", "--avl", "wing.avl", "--alpha", "-2.5"]);
        assert_eq!(cli.alpha, -2.5);
    }
}
