//! Wavefront OBJ loading
//!
//! Only geometry is read: `v` records and `f` records (any of the
//! `v`, `v/vt`, `v//vn`, `v/vt/vn` forms, negative relative indices,
//! polygons fan-triangulated). Everything else is skipped.

use std::path::Path;

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};

use super::mesh::TriangleMesh;

/// Parse OBJ source text into a mesh
pub fn parse_obj(source: &str) -> Result<TriangleMesh> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut indices: Vec<[u32; 3]> = Vec::new();

    for (line_no, raw) in source.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for c in coords.iter_mut() {
                    let token = tokens
                        .next()
                        .ok_or_else(|| Error::Mesh(format!("line {}: vertex needs 3 coordinates", line_no)))?;
                    *c = token
                        .parse()
                        .map_err(|_| Error::Mesh(format!("line {}: bad coordinate '{}'", line_no, token)))?;
                }
                positions.push(Vec3::from_array(coords));
            }
            Some("f") => {
                let face = tokens
                    .map(|t| resolve_index(t, positions.len(), line_no))
                    .collect::<Result<Vec<u32>>>()?;
                if face.len() < 3 {
                    return Err(Error::Mesh(format!("line {}: face needs at least 3 vertices", line_no)));
                }
                for i in 1..face.len() - 1 {
                    indices.push([face[0], face[i], face[i + 1]]);
                }
            }
            _ => {}
        }
    }

    TriangleMesh::new(positions, indices)
}

/// Load an OBJ file from disk
pub fn load_obj(path: &Path) -> Result<TriangleMesh> {
    let source = std::fs::read_to_string(path)?;
    let mesh = parse_obj(&source)?;
    log::debug!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.positions().len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Resolve a face token (`7`, `7/1`, `7//3`, `-1/...`) to a zero-based index
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> Result<u32> {
    let raw = token.split('/').next().unwrap_or("");
    let index: i64 = raw
        .parse()
        .map_err(|_| Error::Mesh(format!("line {}: bad face index '{}'", line_no, token)))?;

    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(vertex_count as i64 + i).filter(|&r| r >= 0),
    };

    resolved
        .and_then(|r| u32::try_from(r).ok())
        .ok_or_else(|| Error::Mesh(format!("line {}: face index {} out of range", line_no, index)))
}
