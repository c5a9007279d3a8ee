use std::collections::HashMap;
use std::fmt::Write as _;
use std::io;

use roxmltree::Document;

use crate::geometry::Point3;
use crate::mesh::TinMesh;

use super::{read_to_string, write_string};

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// Reads the first TIN surface of a LandXML file.
///
/// Faces refer to points by their `id` attribute, falling back to the
/// 1-based position of the point when ids are missing.
pub fn read_landxml_surface(path: &str) -> io::Result<TinMesh> {
    let xml = read_to_string(path)?;
    let doc = Document::parse(&xml).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut vertices = Vec::new();
    let mut ids: HashMap<String, usize> = HashMap::new();
    if let Some(pnts) = doc.descendants().find(|n| n.has_tag_name("Pnts")) {
        for p in pnts.children().filter(|c| c.has_tag_name("P")) {
            let Some(text) = p.text() else {
                continue;
            };
            let nums: Vec<f64> = text
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            if nums.len() < 3 {
                return Err(invalid(format!("point '{}' needs three coordinates", text.trim())));
            }
            let index = vertices.len();
            let id = p
                .attribute("id")
                .map(str::to_string)
                .unwrap_or_else(|| (index + 1).to_string());
            ids.insert(id, index);
            vertices.push(Point3::new(nums[0], nums[1], nums[2]));
        }
    }
    let mut faces = Vec::new();
    if let Some(list) = doc.descendants().find(|n| n.has_tag_name("Faces")) {
        for f in list.children().filter(|c| c.has_tag_name("F")) {
            // invisible faces mark gaps in the surface
            if f.attribute("i") == Some("1") {
                continue;
            }
            let Some(text) = f.text() else {
                continue;
            };
            let refs: Vec<&str> = text.split_whitespace().collect();
            if refs.len() < 3 {
                return Err(invalid(format!("face '{}' needs three points", text.trim())));
            }
            let mut face = [0usize; 3];
            for (k, r) in refs.iter().take(3).enumerate() {
                face[k] = *ids
                    .get(*r)
                    .ok_or_else(|| invalid(format!("face references unknown point {}", r)))?;
            }
            faces.push(face);
        }
    }
    log::debug!(
        "read LandXML surface with {} points and {} faces",
        vertices.len(),
        faces.len()
    );
    TinMesh::from_triangles(vertices, &faces).map_err(|e| invalid(e.to_string()))
}

fn surface_xml(mesh: &TinMesh) -> Result<String, std::fmt::Error> {
    let mut xml = String::new();
    writeln!(&mut xml, "<?xml version=\"1.0\"?>")?;
    writeln!(&mut xml, "<LandXML>")?;
    writeln!(&mut xml, "  <Surfaces>")?;
    writeln!(&mut xml, "    <Surface name=\"TIN\">")?;
    writeln!(&mut xml, "      <Definition surfType=\"TIN\">")?;
    writeln!(&mut xml, "        <Pnts>")?;
    for (i, v) in mesh.points().iter().enumerate() {
        writeln!(
            &mut xml,
            "          <P id=\"{}\">{} {} {}</P>",
            i + 1,
            v.x,
            v.y,
            v.z
        )?;
    }
    writeln!(&mut xml, "        </Pnts>")?;
    writeln!(&mut xml, "        <Faces>")?;
    for t in mesh.triangles() {
        let [a, b, c] = t.vertices();
        writeln!(&mut xml, "          <F>{} {} {}</F>", a + 1, b + 1, c + 1)?;
    }
    writeln!(&mut xml, "        </Faces>")?;
    writeln!(&mut xml, "      </Definition>")?;
    writeln!(&mut xml, "    </Surface>")?;
    writeln!(&mut xml, "  </Surfaces>")?;
    writeln!(&mut xml, "</LandXML>")?;
    Ok(xml)
}

/// Writes a [`TinMesh`] to a LandXML surface file with 1-based face indices.
pub fn write_landxml_surface(path: &str, mesh: &TinMesh) -> io::Result<()> {
    let xml = surface_xml(mesh).map_err(io::Error::other)?;
    write_string(path, &xml)
}
