//! Flattens resolved vertices into parallel primitive arrays.

use std::convert::TryFrom;
use tracing::warn;

use crate::error::{ObjError, Result};
use crate::model::Model;
use crate::obj::AttributeTables;
use crate::options::LoadOptions;
use crate::resolve::OutputVertex;

/// Writes positions, texture coordinates and normals for every output
/// vertex, copies the index list and computes the bounding radius.
///
/// A vertex that no face references has no binding; it takes the first
/// entry of each table, or zeros when a table is empty. The returned model
/// has an empty name.
pub fn assemble(
    tables: &AttributeTables,
    vertices: &[OutputVertex],
    indices: &[usize],
    options: &LoadOptions,
) -> Result<Model> {
    if u32::try_from(vertices.len()).is_err() {
        return Err(ObjError::TooManyVertices {
            vertices: vertices.len(),
        });
    }

    let count = vertices.len();
    let mut positions = Vec::with_capacity(count * 3);
    let mut texture_coordinates = Vec::with_capacity(count * 2);
    let mut normals = Vec::with_capacity(count * 3);
    let mut furthest_point = 0.0f32;
    let mut unreferenced = 0usize;

    for vertex in vertices {
        if vertex.binding.is_none() {
            unreferenced += 1;
        }

        positions.extend_from_slice(&vertex.position);

        let (u, v) = tables
            .texture_coordinates
            .get(vertex.tex_index().unwrap_or(0))
            .map_or((0.0, 0.0), |t| (t.x, t.y));
        let v = if options.flip_texture_v { 1.0 - v } else { v };
        texture_coordinates.push(u);
        texture_coordinates.push(v);

        match tables.normals.get(vertex.norm_index().unwrap_or(0)) {
            Some(n) => normals.extend_from_slice(&[n.x, n.y, n.z]),
            None => normals.extend_from_slice(&[0.0, 0.0, 0.0]),
        }

        furthest_point = furthest_point.max(vertex.length);
    }

    if unreferenced > 0 {
        warn!(
            count = unreferenced,
            "positions not referenced by any face, using default attributes"
        );
    }

    Ok(Model {
        name: String::new(),
        positions,
        texture_coordinates,
        normals,
        // Every id is below `count`, which fits in u32.
        indices: indices.iter().map(|&id| id as u32).collect(),
        furthest_point,
        position_count: tables.positions.len(),
    })
}
