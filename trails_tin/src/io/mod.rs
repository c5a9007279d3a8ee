//! File input and output helpers for terrain data.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

use crate::geometry::Point3;

pub mod geojson;
pub mod landxml;

/// Reads a file to string.
pub fn read_to_string(path: &str) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Reads a file line by line.
pub fn read_lines(path: &str) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

/// Writes a string to a file, replacing any previous content.
pub fn write_string(path: &str, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())
}

fn parse_field(field: Option<&str>, line: usize) -> io::Result<f64> {
    let field = field.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line {}: expected three comma-separated values", line),
        )
    })?;
    field.trim().parse::<f64>().map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {}", line, e))
    })
}

/// Reads a CSV file of `x,y,z` lines. Blank lines are skipped and extra
/// columns are ignored.
pub fn read_points_csv(path: &str) -> io::Result<Vec<Point3>> {
    let lines = read_lines(path)?;
    let mut pts = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split(',');
        let x = parse_field(parts.next(), idx + 1)?;
        let y = parse_field(parts.next(), idx + 1)?;
        let z = parse_field(parts.next(), idx + 1)?;
        pts.push(Point3::new(x, y, z));
    }
    log::debug!("read {} points from {}", pts.len(), path);
    Ok(pts)
}

/// Writes points as `x,y,z` lines.
pub fn write_points_csv(path: &str, points: &[Point3]) -> io::Result<()> {
    let mut file = File::create(path)?;
    for p in points {
        writeln!(file, "{},{},{}", p.x, p.y, p.z)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pts.csv");
        let path = path.to_str().unwrap();
        let pts = vec![Point3::new(1.0, 2.0, 3.0), Point3::new(-4.5, 0.25, 10.0)];
        write_points_csv(path, &pts).unwrap();
        assert_eq!(read_points_csv(path).unwrap(), pts);
    }

    #[test]
    fn csv_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let path = path.to_str().unwrap();
        write_string(path, "0,0,0\n\n1,2\n").unwrap();
        let err = read_points_csv(path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().starts_with("line 3"));

        write_string(path, "0,0,abc\n").unwrap();
        let err = read_points_csv(path).unwrap_err();
        assert!(err.to_string().starts_with("line 1"));
    }
}
