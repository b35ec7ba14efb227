//! AVL run-case file rendering.
//!
//! A run file is a concatenation of case blocks AVL replays from the OPER
//! menu. The constraint line either pins alpha directly or asks AVL to find
//! the alpha matching a target CL.

use std::{fs, path::Path};

use tracing::info;

use crate::error::Result;

/// One operating point.
#[derive(Clone, Copy, Debug)]
pub struct RunCase {
    /// Angle of attack in degrees. With a CL target this is only the seed
    /// value echoed into the parameter block.
    pub alpha: f64,
    /// Freestream Mach number.
    pub mach: f64,
    /// When set, constrain CL instead of alpha.
    pub cl_target: Option<f64>,
}

impl RunCase {
    fn render_into(&self, index: usize, out: &mut String) {
        let constraint = match self.cl_target {
            Some(cl) => format!(" alpha        ->  CL          = {cl:12.5}"),
            None => format!(" alpha        ->  alpha       = {:12.5}", self.alpha),
        };
        let cl_echo = match self.cl_target {
            Some(cl) => format!(" CL        = {cl:12.5}"),
            None => " CL        =   0.00000".to_string(),
        };
        out.push_str("---------------------------------------------\n");
        out.push_str(&format!(
            " Run case  {index}:  alpha = {:6.2} deg\n\n",
            self.alpha
        ));
        out.push_str(&constraint);
        out.push('\n');
        out.push_str(" beta         ->  beta        =   0.00000\n");
        out.push_str(" pb/2V        ->  pb/2V       =   0.00000\n");
        out.push_str(" qc/2V        ->  qc/2V       =   0.00000\n");
        out.push_str(" rb/2V        ->  rb/2V       =   0.00000\n\n");
        out.push_str(&format!(" alpha     = {:12.5}     deg\n", self.alpha));
        out.push_str(" beta      =   0.00000     deg\n");
        out.push_str(" pb/2V     =   0.00000\n");
        out.push_str(" qc/2V     =   0.00000\n");
        out.push_str(" rb/2V     =   0.00000\n");
        out.push_str(&cl_echo);
        out.push('\n');
        out.push_str(" CDo       =   0.00000\n");
        out.push_str(" bank      =   0.00000     deg\n");
        out.push_str(" elevation =   0.00000     deg\n");
        out.push_str(" heading   =   0.00000     deg\n");
        out.push_str(&format!(" Mach      = {:12.5}\n", self.mach));
        out.push_str(" velocity  =   0.00000     ft/s\n");
        out.push_str(" density   =  0.0023769     slug/ft^3\n");
        out.push_str(" grav.acc. =  32.17400     ft/s^2\n");
        out.push_str(" turn_rad. =   0.00000     ft\n");
        out.push_str(" load_fac. =   1.00000\n");
        out.push_str(" X_cg      =   0.00000     ft\n");
        out.push_str(" Y_cg      =   0.00000     ft\n");
        out.push_str(" Z_cg      =   0.00000     ft\n");
        out.push_str(" mass      =   1.00000     slug\n");
        out.push_str(" Ixx       =   1.00000     slug-ft^2\n");
        out.push_str(" Iyy       =   1.00000     slug-ft^2\n");
        out.push_str(" Izz       =   1.00000     slug-ft^2\n");
        out.push_str(" Ixy       =   0.00000     slug-ft^2\n");
        out.push_str(" Iyz       =   0.00000     slug-ft^2\n");
        out.push_str(" Izx       =   0.00000     slug-ft^2\n");
        out.push_str(" visc CL_a =   0.00000\n");
        out.push_str(" visc CL_u =   0.00000\n");
        out.push_str(" visc CM_a =   0.00000\n");
        out.push_str(" visc CM_u =   0.00000\n\n");
    }
}

/// Render a run file from one or more cases, numbered from 1.
#[must_use]
pub fn render_run_file(cases: &[RunCase]) -> String {
    let mut out = String::new();
    for (i, case) in cases.iter().enumerate() {
        case.render_into(i + 1, &mut out);
    }
    out
}

/// Render and write a run file.
pub fn write_run_file(path: &Path, cases: &[RunCase]) -> Result<()> {
    fs::write(path, render_run_file(cases))?;
    info!(path = %path.display(), cases = cases.len(), "wrote AVL run file");
    Ok(())
}

/// A flight-envelope sweep over angle of attack.
#[derive(Clone, Copy, Debug)]
pub struct EnvelopeSweep {
    /// First angle of attack, degrees.
    pub alpha_min: f64,
    /// Last angle of attack (inclusive), degrees.
    pub alpha_max: f64,
    /// Step between cases, degrees.
    pub alpha_step: f64,
    /// Constrain every case to this CL instead of its alpha when set.
    pub cl_target: Option<f64>,
    /// Mach number shared by all cases.
    pub mach: f64,
}

impl EnvelopeSweep {
    /// Expand the sweep into run cases. A non-positive step yields the
    /// single `alpha_min` case.
    #[must_use]
    pub fn cases(&self) -> Vec<RunCase> {
        let mut cases = Vec::new();
        let mut alpha = self.alpha_min;
        loop {
            cases.push(RunCase {
                alpha,
                mach: self.mach,
                cl_target: self.cl_target,
            });
            if self.alpha_step <= 0.0 {
                break;
            }
            alpha += self.alpha_step;
            if alpha > self.alpha_max + 1e-9 {
                break;
            }
        }
        cases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_case(alpha: f64, mach: f64) -> RunCase {
        RunCase {
            alpha,
            mach,
            cl_target: None,
        }
    }

    #[test]
    fn single_case_header_and_constraint() {
        let text = render_run_file(&[alpha_case(3.0, 0.75)]);
        assert!(text.contains(" Run case  1:  alpha =   3.00 deg"));
        assert!(text.contains(" alpha        ->  alpha       =      3.00000"));
        assert!(text.contains(" Mach      =      0.75000"));
        assert!(text.contains(" CL        =   0.00000"));
    }

    #[test]
    fn cl_target_switches_the_constraint() {
        let case = RunCase {
            alpha: 0.0,
            mach: 0.0,
            cl_target: Some(0.5),
        };
        let text = render_run_file(&[case]);
        assert!(text.contains(" alpha        ->  CL          =      0.50000"));
        assert!(text.contains(" CL        =      0.50000"));
        assert!(!text.contains("->  alpha"));
    }

    #[test]
    fn envelope_expands_inclusively() {
        let sweep = EnvelopeSweep {
            alpha_min: -5.0,
            alpha_max: 15.0,
            alpha_step: 1.0,
            cl_target: None,
            mach: 0.0,
        };
        let cases = sweep.cases();
        assert_eq!(cases.len(), 21);
        assert_eq!(cases[0].alpha, -5.0);
        assert!((cases[20].alpha - 15.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_step_yields_one_case() {
        let sweep = EnvelopeSweep {
            alpha_min: 2.0,
            alpha_max: 10.0,
            alpha_step: 0.0,
            cl_target: None,
            mach: 0.0,
        };
        assert_eq!(sweep.cases().len(), 1);
    }

    #[test]
    fn multiple_cases_are_numbered() {
        let cases = [alpha_case(0.0, 0.0), alpha_case(1.0, 0.0)];
        let text = render_run_file(&cases);
        assert!(text.contains(" Run case  1:"));
        assert!(text.contains(" Run case  2:"));
    }
}
