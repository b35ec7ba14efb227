//! Wing geometry derivation and `.avl` file rendering.

use std::{fs, path::Path};

use tracing::info;

use crate::{
    error::{Error, Result},
    points::{Point3, inches_to_feet},
};

/// Chordwise panel count written for the single lifting surface.
const NCHORDWISE: u32 = 8;
/// Minimum spanwise panels between adjacent sections.
const MIN_SPAN_PANELS: i64 = 3;
/// Spanwise panels added per foot of separation between sections.
const PANELS_PER_FOOT: f64 = 2.0;
/// Airfoil applied to every section.
const AIRFOIL: &str = "2412";

/// One spanwise section of the wing.
#[derive(Clone, Copy, Debug)]
pub struct Section {
    /// Leading-edge position in feet.
    pub leading_edge: Point3,
    /// Local chord length in feet.
    pub chord: f64,
    /// Spanwise panels toward the next section; zero on the last section.
    pub nspan: i64,
}

/// Reference quantities written to the geometry header and reused by
/// downstream reporting.
#[derive(Clone, Copy, Debug)]
pub struct Reference {
    /// Planform area (trapezoidal integration over sections), ft^2.
    pub area: f64,
    /// Area-weighted mean aerodynamic chord, ft.
    pub mean_chord: f64,
    /// Spanwise extent, ft.
    pub span: f64,
    /// Moment reference point: centroid of the leading-edge points, ft.
    pub point: Point3,
}

/// A complete wing definition ready to render as an AVL geometry file.
#[derive(Clone, Debug)]
pub struct WingGeometry {
    /// Sections root to tip, in input order.
    pub sections: Vec<Section>,
    /// Derived reference quantities.
    pub reference: Reference,
}

impl WingGeometry {
    /// Derive a wing from paired leading/trailing-edge points in inches.
    ///
    /// The edges must pair up one-to-one; chord at each station is the
    /// straight-line distance between the paired points. With a single
    /// station the area degenerates to zero and the mean chord falls back to
    /// the plain average.
    pub fn from_edges(leading: &[Point3], trailing: &[Point3]) -> Result<Self> {
        if leading.len() != trailing.len() {
            return Err(Error::EdgeMismatch {
                le: leading.len(),
                te: trailing.len(),
            });
        }
        if leading.is_empty() {
            return Err(Error::EmptyEdges);
        }
        let le = inches_to_feet(leading);
        let te = inches_to_feet(trailing);

        let chords: Vec<f64> = le
            .iter()
            .zip(&te)
            .map(|(a, b)| a.distance(b))
            .collect();

        let y_min = le.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let y_max = le.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let span = y_max - y_min;

        let mut area = 0.0;
        let mut mac_sum = 0.0;
        for i in 0..le.len().saturating_sub(1) {
            let dy = (le[i + 1].y - le[i].y).abs();
            area += (chords[i] + chords[i + 1]) / 2.0 * dy;
            mac_sum += (chords[i].powi(2) + chords[i + 1].powi(2)) / 2.0 * dy;
        }
        let mean_chord = if area > 0.0 {
            mac_sum / area
        } else {
            chords.iter().sum::<f64>() / chords.len() as f64
        };

        let count = le.len() as f64;
        let point = Point3 {
            x: le.iter().map(|p| p.x).sum::<f64>() / count,
            y: le.iter().map(|p| p.y).sum::<f64>() / count,
            z: le.iter().map(|p| p.z).sum::<f64>() / count,
        };

        let sections = le
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let nspan = if i + 1 < le.len() {
                    let dy = (le[i + 1].y - le[i].y).abs();
                    MIN_SPAN_PANELS.max((dy * PANELS_PER_FOOT) as i64)
                } else {
                    0
                };
                Section {
                    leading_edge: *point,
                    chord: chords[i],
                    nspan,
                }
            })
            .collect();

        Ok(Self {
            sections,
            reference: Reference {
                area,
                mean_chord,
                span,
                point,
            },
        })
    }

    /// Render the AVL geometry file text.
    #[must_use]
    pub fn render(&self, title: &str) -> String {
        let refs = &self.reference;
        let mut lines = vec![
            "!***************************************".to_string(),
            "!AVL input file generated from wing edge points".to_string(),
            "!***************************************".to_string(),
            title.to_string(),
            "!Mach".to_string(),
            " 0.000".to_string(),
            "!IYsym   IZsym   Zsym".to_string(),
            " 0       0       0.000".to_string(),
            "!Sref    Cref    Bref".to_string(),
            format!(
                "{:.6}     {:.6}     {:.6}",
                refs.area, refs.mean_chord, refs.span
            ),
            "!Xref    Yref    Zref".to_string(),
            format!(
                "{:.6}     {:.6}     {:.6}",
                refs.point.x, refs.point.y, refs.point.z
            ),
            String::new(),
            "SURFACE".to_string(),
            "WING".to_string(),
            "!Nchordwise  Cspace".to_string(),
            format!("{NCHORDWISE}            1.0"),
            String::new(),
        ];

        for section in &self.sections {
            lines.push("SECTION".to_string());
            lines.push("!Xle    Yle    Zle     Chord   Ainc  Nspanwise  Sspace".to_string());
            lines.push(format!(
                "{:.6}    {:.6}    {:.6}    {:.6}   0.000   {}          1.000",
                section.leading_edge.x,
                section.leading_edge.y,
                section.leading_edge.z,
                section.chord,
                section.nspan
            ));
            lines.push("NACA".to_string());
            lines.push(AIRFOIL.to_string());
            lines.push(String::new());
        }

        lines.push("END".to_string());
        lines.push(String::new());
        lines.join("\n")
    }

    /// Render and write the geometry file.
    pub fn write(&self, path: &Path, title: &str) -> Result<()> {
        fs::write(path, self.render(title))?;
        info!(path = %path.display(), sections = self.sections.len(), "wrote AVL geometry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangular_wing() -> WingGeometry {
        // 2 ft chord, 10 ft span, specified in inches.
        let le = [
            Point3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            Point3 {
                x: 0.0,
                y: 120.0,
                z: 0.0,
            },
        ];
        let te = [
            Point3 {
                x: 24.0,
                y: 0.0,
                z: 0.0,
            },
            Point3 {
                x: 24.0,
                y: 120.0,
                z: 0.0,
            },
        ];
        WingGeometry::from_edges(&le, &te).expect("valid edges")
    }

    #[test]
    fn rectangular_wing_reference_values() {
        let wing = rectangular_wing();
        let refs = wing.reference;
        assert!((refs.area - 20.0).abs() < 1e-9);
        assert!((refs.mean_chord - 2.0).abs() < 1e-9);
        assert!((refs.span - 10.0).abs() < 1e-9);
        assert!((refs.point.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn spanwise_panels_scale_with_separation_and_end_at_zero() {
        let wing = rectangular_wing();
        // 10 ft separation at 2 panels/ft.
        assert_eq!(wing.sections[0].nspan, 20);
        assert_eq!(wing.sections[1].nspan, 0);
    }

    #[test]
    fn close_sections_keep_the_panel_floor() {
        let le = [
            Point3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            Point3 {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
        ];
        let te = [
            Point3 {
                x: 12.0,
                y: 0.0,
                z: 0.0,
            },
            Point3 {
                x: 12.0,
                y: 1.0,
                z: 0.0,
            },
        ];
        let wing = WingGeometry::from_edges(&le, &te).expect("valid edges");
        assert_eq!(wing.sections[0].nspan, 3);
    }

    #[test]
    fn mismatched_edges_are_rejected() {
        let one = [Point3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }];
        assert!(matches!(
            WingGeometry::from_edges(&one, &[]),
            Err(Error::EdgeMismatch { le: 1, te: 0 })
        ));
    }

    #[test]
    fn render_contains_header_and_sections() {
        let wing = rectangular_wing();
        let text = wing.render("Test Wing");
        assert!(text.contains("Test Wing"));
        assert!(text.contains("20.000000     2.000000     10.000000"));
        assert!(text.contains("SURFACE\nWING"));
        assert_eq!(text.matches("SECTION").count(), 2);
        assert!(text.ends_with("END\n"));
    }
}
