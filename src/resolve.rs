//! Face resolution: maps every face-vertex `(position, texcoord, normal)`
//! triple onto an output vertex, splitting positions along texture and
//! normal seams.
//!
//! Output vertices live in an arena addressed by id. Every raw position owns
//! a chain head whose id equals the position index; further vertices for the
//! same position are appended to the arena and linked through `next`, one per
//! distinct attribute binding.

use tracing::trace;

use crate::error::{Attribute, ObjError, Result};
use crate::obj::{AttributeTables, FaceVertex};

/// The texture coordinate and normal a vertex was first referenced with.
/// Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub texture_coordinate: Option<usize>,
    pub normal: Option<usize>,
}

/// One vertex of the output buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputVertex {
    pub id: usize,
    pub position: [f32; 3],
    /// Distance of `position` from the origin.
    pub length: f32,
    /// `None` until a face references this vertex; never changes afterwards.
    pub binding: Option<Binding>,
    /// Next vertex split off the same position.
    pub next: Option<usize>,
}

impl OutputVertex {
    fn new(id: usize, position: [f32; 3]) -> OutputVertex {
        let [x, y, z] = position;
        OutputVertex {
            id,
            position,
            length: (x * x + y * y + z * z).sqrt(),
            binding: None,
            next: None,
        }
    }

    pub fn tex_index(&self) -> Option<usize> {
        self.binding.and_then(|b| b.texture_coordinate)
    }

    pub fn norm_index(&self) -> Option<usize> {
        self.binding.and_then(|b| b.normal)
    }
}

/// A face-vertex after bounds checking, with 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Corner {
    position: usize,
    binding: Binding,
}

/// Incremental vertex deduplication over a stream of triangles.
pub struct FaceResolver<'a> {
    tables: &'a AttributeTables,
    vertices: Vec<OutputVertex>,
    indices: Vec<usize>,
}

impl<'a> FaceResolver<'a> {
    /// Creates one unbound chain head per position in `tables`.
    pub fn new(tables: &'a AttributeTables) -> FaceResolver<'a> {
        let vertices = tables
            .positions
            .iter()
            .enumerate()
            .map(|(id, p)| OutputVertex::new(id, [p.x, p.y, p.z]))
            .collect();

        FaceResolver {
            tables,
            vertices,
            indices: Vec::new(),
        }
    }

    /// Resolves one triangle. `line` is only used for error reporting.
    ///
    /// The whole face is bounds-checked before any vertex is touched.
    pub fn resolve_face(&mut self, line: usize, face: &[FaceVertex]) -> Result<()> {
        if face.len() != 3 {
            return Err(ObjError::UnsupportedTopology {
                line,
                vertices: face.len(),
            });
        }

        let corners = [
            self.corner(line, &face[0])?,
            self.corner(line, &face[1])?,
            self.corner(line, &face[2])?,
        ];

        for corner in &corners {
            let id = self.resolve(*corner);
            self.indices.push(id);
        }

        Ok(())
    }

    pub fn vertices(&self) -> &[OutputVertex] {
        &self.vertices
    }

    /// Output vertex ids, three per triangle, in face order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn finish(self) -> (Vec<OutputVertex>, Vec<usize>) {
        (self.vertices, self.indices)
    }

    fn corner(&self, line: usize, face_vertex: &FaceVertex) -> Result<Corner> {
        let position = to_table_index(
            line,
            Attribute::Position,
            face_vertex.position,
            self.tables.positions.len(),
        )?;
        let texture_coordinate = match face_vertex.texture_coordinate {
            Some(t) => Some(to_table_index(
                line,
                Attribute::TextureCoordinate,
                t,
                self.tables.texture_coordinates.len(),
            )?),
            None => None,
        };
        let normal = match face_vertex.normal {
            Some(n) => Some(to_table_index(
                line,
                Attribute::Normal,
                n,
                self.tables.normals.len(),
            )?),
            None => None,
        };

        Ok(Corner {
            position,
            binding: Binding {
                texture_coordinate,
                normal,
            },
        })
    }

    /// Walks the chain of `corner.position` and returns the id of the vertex
    /// carrying `corner.binding`, binding the head or appending a new vertex
    /// to the tail as needed.
    fn resolve(&mut self, corner: Corner) -> usize {
        let mut current = corner.position;

        loop {
            let vertex = &mut self.vertices[current];
            match vertex.binding {
                None => {
                    vertex.binding = Some(corner.binding);
                    return vertex.id;
                }
                Some(binding) if binding == corner.binding => return vertex.id,
                Some(_) => match vertex.next {
                    Some(next) => current = next,
                    None => break,
                },
            }
        }

        let id = self.vertices.len();
        let mut split = OutputVertex::new(id, self.vertices[current].position);
        split.binding = Some(corner.binding);
        self.vertices[current].next = Some(id);
        self.vertices.push(split);

        trace!(position = corner.position, id, "split vertex along seam");
        id
    }
}

/// Converts a 1-based file reference into a 0-based table index.
fn to_table_index(line: usize, attribute: Attribute, index: usize, len: usize) -> Result<usize> {
    if index == 0 || index > len {
        return Err(ObjError::IndexOutOfRange {
            line,
            attribute,
            index,
            len,
        });
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdmath::Vector3;

    fn tables(positions: usize, texture_coordinates: usize, normals: usize) -> AttributeTables {
        let mut tables = AttributeTables::default();
        for i in 0..positions {
            tables.positions.push(Vector3::new(i as f32, 0.0, 0.0));
        }
        for i in 0..texture_coordinates {
            tables
                .texture_coordinates
                .push(Vector3::new(i as f32 / 10.0, 0.0, 0.0));
        }
        for _ in 0..normals {
            tables.normals.push(Vector3::new(0.0, 0.0, 1.0));
        }
        tables
    }

    fn fv(position: usize, texture_coordinate: usize, normal: usize) -> FaceVertex {
        FaceVertex {
            position,
            texture_coordinate: Some(texture_coordinate),
            normal: Some(normal),
        }
    }

    #[test]
    fn test_consistent_references_do_not_split() {
        let tables = tables(4, 1, 1);
        let mut resolver = FaceResolver::new(&tables);
        resolver
            .resolve_face(1, &[fv(1, 1, 1), fv(2, 1, 1), fv(3, 1, 1)])
            .unwrap();
        resolver
            .resolve_face(2, &[fv(1, 1, 1), fv(3, 1, 1), fv(4, 1, 1)])
            .unwrap();

        assert_eq!(resolver.vertices().len(), 4);
        assert_eq!(resolver.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_seam_splits_position() {
        let tables = tables(3, 2, 1);
        let mut resolver = FaceResolver::new(&tables);
        resolver
            .resolve_face(1, &[fv(1, 1, 1), fv(2, 1, 1), fv(3, 1, 1)])
            .unwrap();
        resolver
            .resolve_face(2, &[fv(1, 2, 1), fv(3, 1, 1), fv(2, 1, 1)])
            .unwrap();

        let (vertices, indices) = resolver.finish();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices, vec![0, 1, 2, 3, 2, 1]);

        let head = &vertices[0];
        let split = &vertices[3];
        assert_eq!(head.next, Some(3));
        assert_eq!(split.next, None);
        assert_eq!(head.position, split.position);
        assert_eq!(head.length, split.length);
        assert_eq!(head.tex_index(), Some(0));
        assert_eq!(split.tex_index(), Some(1));
        assert_eq!(split.norm_index(), Some(0));
    }

    #[test]
    fn test_repeated_seam_reference_reuses_split() {
        let tables = tables(3, 3, 2);
        let mut resolver = FaceResolver::new(&tables);
        let faces = [
            [fv(1, 1, 1), fv(2, 1, 1), fv(3, 1, 1)],
            [fv(1, 2, 1), fv(2, 1, 1), fv(3, 1, 1)],
            [fv(1, 3, 2), fv(2, 1, 1), fv(3, 1, 1)],
            [fv(1, 2, 1), fv(2, 1, 1), fv(3, 1, 1)],
            [fv(1, 3, 2), fv(2, 1, 1), fv(3, 1, 1)],
        ];
        for (line, face) in faces.iter().enumerate() {
            resolver.resolve_face(line + 1, face).unwrap();
        }

        let (vertices, indices) = resolver.finish();
        assert_eq!(vertices.len(), 5);
        let first_corners: Vec<usize> = indices.chunks(3).map(|t| t[0]).collect();
        assert_eq!(first_corners, vec![0, 3, 4, 3, 4]);

        // Chain for position 0 is 0 -> 3 -> 4.
        assert_eq!(vertices[0].next, Some(3));
        assert_eq!(vertices[3].next, Some(4));
        assert_eq!(vertices[4].next, None);
    }

    #[test]
    fn test_normal_alone_creates_seam() {
        let tables = tables(3, 1, 2);
        let mut resolver = FaceResolver::new(&tables);
        resolver
            .resolve_face(1, &[fv(1, 1, 1), fv(2, 1, 1), fv(3, 1, 1)])
            .unwrap();
        resolver
            .resolve_face(2, &[fv(1, 1, 2), fv(2, 1, 1), fv(3, 1, 1)])
            .unwrap();
        assert_eq!(resolver.vertices().len(), 4);
        assert_eq!(resolver.vertices()[3].norm_index(), Some(1));
    }

    #[test]
    fn test_missing_attributes_are_part_of_binding() {
        let tables = tables(3, 1, 1);
        let mut resolver = FaceResolver::new(&tables);
        let bare = |p| FaceVertex {
            position: p,
            texture_coordinate: None,
            normal: Some(1),
        };
        resolver
            .resolve_face(1, &[bare(1), bare(2), bare(3)])
            .unwrap();
        resolver
            .resolve_face(2, &[bare(1), bare(2), bare(3)])
            .unwrap();
        resolver
            .resolve_face(3, &[fv(1, 1, 1), bare(2), bare(3)])
            .unwrap();

        assert_eq!(resolver.vertices().len(), 4);
        assert_eq!(resolver.indices(), &[0, 1, 2, 0, 1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_unreferenced_position_keeps_unbound_head() {
        let tables = tables(4, 1, 1);
        let mut resolver = FaceResolver::new(&tables);
        resolver
            .resolve_face(1, &[fv(1, 1, 1), fv(2, 1, 1), fv(4, 1, 1)])
            .unwrap();
        assert_eq!(resolver.vertices().len(), 4);
        assert_eq!(resolver.vertices()[2].binding, None);
    }

    #[test]
    fn test_out_of_range_references() {
        let tables = tables(3, 1, 1);
        let mut resolver = FaceResolver::new(&tables);

        match resolver.resolve_face(7, &[fv(1, 1, 1), fv(4, 1, 1), fv(3, 1, 1)]) {
            Err(ObjError::IndexOutOfRange {
                line,
                attribute,
                index,
                len,
            }) => {
                assert_eq!(line, 7);
                assert_eq!(attribute, Attribute::Position);
                assert_eq!(index, 4);
                assert_eq!(len, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }

        let result = resolver.resolve_face(8, &[fv(1, 2, 1), fv(2, 1, 1), fv(3, 1, 1)]);
        assert!(matches!(
            result,
            Err(ObjError::IndexOutOfRange {
                attribute: Attribute::TextureCoordinate,
                ..
            })
        ));

        let result = resolver.resolve_face(9, &[fv(0, 1, 1), fv(2, 1, 1), fv(3, 1, 1)]);
        assert!(matches!(
            result,
            Err(ObjError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: 0,
                ..
            })
        ));

        // A rejected face leaves no trace.
        assert!(resolver.indices().is_empty());
        assert!(resolver.vertices().iter().all(|v| v.binding.is_none()));
    }

    #[test]
    fn test_quad_is_rejected() {
        let tables = tables(4, 1, 1);
        let mut resolver = FaceResolver::new(&tables);
        let result = resolver.resolve_face(
            5,
            &[fv(1, 1, 1), fv(2, 1, 1), fv(3, 1, 1), fv(4, 1, 1)],
        );
        assert!(matches!(
            result,
            Err(ObjError::UnsupportedTopology {
                line: 5,
                vertices: 4
            })
        ));
    }

    #[test]
    fn test_length_is_distance_from_origin() {
        let mut tables = AttributeTables::default();
        tables.positions.push(Vector3::new(3.0, 4.0, 0.0));
        let resolver = FaceResolver::new(&tables);
        assert!((resolver.vertices()[0].length - 5.0).abs() < 1e-6);
    }
}
