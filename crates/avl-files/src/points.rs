//! Reading wing edge point data exported as CSV.

use std::{fs, path::Path};

use crate::error::{Error, Result};

/// A 3D point in the exporter's coordinate system (inches).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3 {
    /// Chordwise coordinate.
    pub x: f64,
    /// Spanwise coordinate.
    pub y: f64,
    /// Vertical coordinate.
    pub z: f64,
}

impl Point3 {
    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// The same point scaled by `1 / divisor` on each axis.
    #[must_use]
    pub fn scaled(&self, divisor: f64) -> Self {
        Self {
            x: self.x / divisor,
            y: self.y / divisor,
            z: self.z / divisor,
        }
    }
}

/// Load an XYZ point file.
///
/// The first row is a header and is skipped; rows with fewer than three
/// fields or non-numeric coordinates are ignored, matching how the exporting
/// tool pads its output. An empty result is an error.
pub fn read_point_file(path: &Path) -> Result<Vec<Point3>> {
    let text = fs::read_to_string(path)?;
    let points = parse_points(&text);
    if points.is_empty() {
        return Err(Error::NoPoints(path.to_path_buf()));
    }
    Ok(points)
}

/// Parse CSV text into points. Tolerates a UTF-8 BOM on the first line.
fn parse_points(text: &str) -> Vec<Point3> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut points = Vec::new();
    for line in text.lines().skip(1) {
        let mut fields = line.split(',');
        let (Some(x), Some(y), Some(z)) = (fields.next(), fields.next(), fields.next()) else {
            continue;
        };
        let (Ok(x), Ok(y), Ok(z)) = (
            x.trim().parse::<f64>(),
            y.trim().parse::<f64>(),
            z.trim().parse::<f64>(),
        ) else {
            continue;
        };
        points.push(Point3 { x, y, z });
    }
    points
}

/// Convert points from inches to feet, the unit system AVL files use here.
#[must_use]
pub fn inches_to_feet(points: &[Point3]) -> Vec<Point3> {
    points.iter().map(|p| p.scaled(12.0)).collect()
}
