use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

/// Interleaved points (`dimensions` position floats + RGB) and triangle
/// indices read from a geometry text file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub dimensions: usize,
    pub points: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Geometry {
    /// Floats per point row.
    pub fn stride(&self) -> usize {
        self.dimensions + 3
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len() / self.stride()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryParseErrorKind {
    BadNumber(String),
    ColumnCount { expected: usize, found: usize },
    OutsideSection,
    UnknownSection(String),
    IndexOutOfRange { index: u16, vertex_count: usize },
}

/// Parse failure with the 1-based line it occurred on.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryParseError {
    pub line: usize,
    pub kind: GeometryParseErrorKind,
}

impl fmt::Display for GeometryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            GeometryParseErrorKind::BadNumber(tok) => write!(f, "invalid number {tok:?}"),
            GeometryParseErrorKind::ColumnCount { expected, found } => {
                write!(f, "expected {expected} values, found {found}")
            }
            GeometryParseErrorKind::OutsideSection => {
                write!(f, "data before any [points] or [indices] header")
            }
            GeometryParseErrorKind::UnknownSection(name) => write!(f, "unknown section [{name}]"),
            GeometryParseErrorKind::IndexOutOfRange { index, vertex_count } => {
                write!(f, "index {index} out of range for {vertex_count} points")
            }
        }
    }
}

impl std::error::Error for GeometryParseError {}

#[derive(Clone, Copy)]
enum Section {
    None,
    Points,
    Indices,
}

/// Parses the `[points]` / `[indices]` text format.
///
/// Each point row holds `dimensions` position floats followed by RGB; each
/// index row holds three `u16`. `#` starts a comment; blank lines are
/// ignored.
pub fn parse_geometry(src: &str, dimensions: usize) -> Result<Geometry, GeometryParseError> {
    let mut geometry = Geometry {
        dimensions,
        ..Geometry::default()
    };
    let mut section = Section::None;
    let mut index_lines = Vec::new();

    for (i, raw) in src.lines().enumerate() {
        let line_no = i + 1;
        let err = |kind| GeometryParseError { line: line_no, kind };

        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = match name.trim() {
                "points" => Section::Points,
                "indices" => Section::Indices,
                other => return Err(err(GeometryParseErrorKind::UnknownSection(other.to_string()))),
            };
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match section {
            Section::None => return Err(err(GeometryParseErrorKind::OutsideSection)),

            Section::Points => {
                let expected = geometry.stride();
                if tokens.len() != expected {
                    return Err(err(GeometryParseErrorKind::ColumnCount { expected, found: tokens.len() }));
                }
                for tok in tokens {
                    let v: f32 = tok
                        .parse()
                        .map_err(|_| err(GeometryParseErrorKind::BadNumber(tok.to_string())))?;
                    geometry.points.push(v);
                }
            }

            Section::Indices => {
                if tokens.len() != 3 {
                    return Err(err(GeometryParseErrorKind::ColumnCount { expected: 3, found: tokens.len() }));
                }
                for tok in tokens {
                    let v: u16 = tok
                        .parse()
                        .map_err(|_| err(GeometryParseErrorKind::BadNumber(tok.to_string())))?;
                    geometry.indices.push(v);
                    index_lines.push(line_no);
                }
            }
        }
    }

    // Sections may come in any order; validate once all points are known.
    let vertex_count = geometry.vertex_count();
    for (&index, &line) in geometry.indices.iter().zip(&index_lines) {
        if index as usize >= vertex_count {
            return Err(GeometryParseError {
                line,
                kind: GeometryParseErrorKind::IndexOutOfRange { index, vertex_count },
            });
        }
    }

    Ok(geometry)
}

pub fn load_geometry(path: &Path, dimensions: usize) -> Result<Geometry> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read geometry {}", path.display()))?;
    let geometry = parse_geometry(&src, dimensions)
        .with_context(|| format!("failed to parse geometry {}", path.display()))?;
    log::debug!(
        "loaded {}: {} points, {} indices",
        path.display(),
        geometry.vertex_count(),
        geometry.indices.len()
    );
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
[points]
# x y r g b
-0.5 -0.5 1.0 0.0 0.0
+0.5 -0.5 0.0 1.0 0.0
+0.5 +0.5 0.0 0.0 1.0
-0.5 +0.5 1.0 1.0 0.0

[indices]
0 1 2 # bottom-right
0 2 3
";

    #[test]
    fn parses_2d_quad() {
        let g = parse_geometry(QUAD, 2).unwrap();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(&g.points[5..10], &[0.5, -0.5, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn wrong_dimensions_report_column_count() {
        let err = parse_geometry(QUAD, 3).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, GeometryParseErrorKind::ColumnCount { expected: 6, found: 5 });
    }

    #[test]
    fn bad_number_names_token() {
        let err = parse_geometry("[points]\n0 0 1 x 1\n", 2).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, GeometryParseErrorKind::BadNumber("x".into()));
        assert_eq!(err.to_string(), "line 2: invalid number \"x\"");
    }

    #[test]
    fn data_before_header_is_rejected() {
        let err = parse_geometry("\n# hi\n0 1 2\n", 2).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, GeometryParseErrorKind::OutsideSection);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = parse_geometry("[normals]\n", 2).unwrap_err();
        assert_eq!(err.kind, GeometryParseErrorKind::UnknownSection("normals".into()));
    }

    #[test]
    fn out_of_range_index_points_at_its_line() {
        let src = "[indices]\n0 1 2\n[points]\n0 0 1 1 1\n0 1 1 1 1\n1 0 1 1 1\n[indices]\n0 1 3\n";
        let err = parse_geometry(src, 2).unwrap_err();
        assert_eq!(err.line, 8);
        assert_eq!(err.kind, GeometryParseErrorKind::IndexOutOfRange { index: 3, vertex_count: 3 });
    }

    #[test]
    fn index_larger_than_u16_is_a_bad_number() {
        let err = parse_geometry("[indices]\n0 1 70000\n", 2).unwrap_err();
        assert_eq!(err.kind, GeometryParseErrorKind::BadNumber("70000".into()));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_geometry(Path::new("/nonexistent/pyramid.txt"), 3).unwrap_err();
        assert!(format!("{err:#}").contains("pyramid.txt"));
    }
}
