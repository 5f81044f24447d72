use nom::types::CompleteStr;
use nom::*;
use rayon::prelude::*;
use std::path::Path;
use tdmath::Vector3;
use tracing::{debug, info, trace, warn};

use crate::assemble::assemble;
use crate::error::{ObjError, Result};
use crate::model::Model;
use crate::options::LoadOptions;
use crate::resolve::FaceResolver;

/*
    Basic Parsers
*/

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn any_char(_: char) -> bool {
    true
}

fn is_name_char(c: char) -> bool {
    c != '#'
}

named!(spaces<CompleteStr, CompleteStr>,
    take_while1!(is_space)
);

named!(comment<CompleteStr, CompleteStr>,
    preceded!(
        tag!("#"),
        take_while!(any_char)
    )
);

// Optional trailing whitespace and comment, then nothing.
named!(line_end<CompleteStr, ()>,
    do_parse!(
        opt!(spaces) >>
        opt!(comment) >>
        eof!() >>

        (())
    )
);

fn parse_index(digits: CompleteStr) -> std::result::Result<usize, std::num::ParseIntError> {
    digits.0.parse()
}

named!(index<CompleteStr, usize>,
    map_res!(digit, parse_index)
);

/*
    Object Name
*/

named!(object_name<CompleteStr, String>,
    do_parse!(
        opt!(spaces) >>
        tag!("o") >>
        spaces >>
        n: take_while1!(is_name_char) >>
        opt!(comment) >>
        eof!() >>

        (n.0.trim().to_string())
    )
);

/*
    Attributes
*/

named!(position<CompleteStr, Vector3>,
    do_parse!(
        opt!(spaces) >>
        tag!("v") >>
        spaces >>
        x: float >>
        spaces >>
        y: float >>
        spaces >>
        z: float >>
        line_end >>

        (Vector3::new(x, y, z))
    )
);

named!(texture_coordinate<CompleteStr, Vector3>,
    do_parse!(
        opt!(spaces) >>
        tag!("vt") >>
        spaces >>
        u: float >>
        spaces >>
        v: float >>
        line_end >>

        (Vector3::new(u, v, 0.0))
    )
);

named!(normal<CompleteStr, Vector3>,
    do_parse!(
        opt!(spaces) >>
        tag!("vn") >>
        spaces >>
        x: float >>
        spaces >>
        y: float >>
        spaces >>
        z: float >>
        line_end >>

        (Vector3::new(x, y, z))
    )
);

/*
    Faces
*/

/// One corner of a face as written in the file: 1-based references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceVertex {
    pub position: usize,
    pub texture_coordinate: Option<usize>,
    pub normal: Option<usize>,
}

// Accepts `p`, `p/t`, `p//n` and `p/t/n`.
named!(face_vertex<CompleteStr, FaceVertex>,
    do_parse!(
        p: index >>
        t: opt!(preceded!(tag!("/"), opt!(index))) >>
        n: opt!(preceded!(tag!("/"), index)) >>

        (FaceVertex {
            position: p,
            texture_coordinate: t.and_then(|t| t),
            normal: n,
        })
    )
);

named!(face<CompleteStr, Vec<FaceVertex>>,
    do_parse!(
        opt!(spaces) >>
        tag!("f") >>
        f: many1!(preceded!(spaces, face_vertex)) >>
        line_end >>

        (f)
    )
);

/*
    Records
*/

#[derive(Debug)]
enum Record {
    Position(Vector3),
    TextureCoordinate(Vector3),
    Normal(Vector3),
    Face(Vec<FaceVertex>),
    ObjectName(String),
    Ignored,
}

/// Parses a single line. Blank lines, comments and unknown keywords are
/// `Record::Ignored`; a known keyword whose fields do not parse is an error.
fn parse_record(line: usize, text: &str) -> Result<Record> {
    let keyword = match text.split_whitespace().next() {
        Some(k) if !k.starts_with('#') => k,
        _ => return Ok(Record::Ignored),
    };

    let input = CompleteStr(text);
    let parsed = match keyword {
        "v" => position(input).map(|(_, p)| Record::Position(p)),
        "vt" => texture_coordinate(input).map(|(_, t)| Record::TextureCoordinate(t)),
        "vn" => normal(input).map(|(_, n)| Record::Normal(n)),
        "f" => face(input).map(|(_, f)| Record::Face(f)),
        "o" => object_name(input).map(|(_, n)| Record::ObjectName(n)),
        _ => {
            trace!(line, keyword, "ignoring record");
            return Ok(Record::Ignored);
        }
    };

    parsed.map_err(|_| ObjError::Parse {
        line,
        keyword: keyword.to_string(),
        record: text.trim().to_string(),
    })
}

/*
    Attribute Tables
*/

/// Raw attributes in file order. Indices are 0-based.
#[derive(Debug, Default)]
pub struct AttributeTables {
    pub positions: Vec<Vector3>,
    /// `z` is always zero.
    pub texture_coordinates: Vec<Vector3>,
    pub normals: Vec<Vector3>,
}

/*
    Loading
*/

/// Parses OBJ text into GPU-ready buffers.
///
/// Attribute records are collected until the first face; from then on only
/// faces are resolved, and any later attribute record is ignored.
pub fn parse_obj_file(data: &str, options: &LoadOptions) -> Result<Model> {
    let mut lines = data.lines().enumerate().map(|(i, text)| (i + 1, text));
    let mut name: Option<String> = None;

    let mut tables = AttributeTables::default();
    let mut first_face = None;
    for (line, text) in &mut lines {
        match parse_record(line, text)? {
            Record::Position(p) => tables.positions.push(p),
            Record::TextureCoordinate(t) => tables.texture_coordinates.push(t),
            Record::Normal(n) => tables.normals.push(n),
            Record::ObjectName(n) => {
                name.get_or_insert(n);
            }
            Record::Face(f) => {
                first_face = Some((line, f));
                break;
            }
            Record::Ignored => {}
        }
    }

    debug!(
        positions = tables.positions.len(),
        texture_coordinates = tables.texture_coordinates.len(),
        normals = tables.normals.len(),
        "attribute tables built"
    );

    let mut resolver = FaceResolver::new(&tables);
    let mut late_attributes = 0usize;
    if let Some((line, f)) = first_face {
        resolver.resolve_face(line, &f)?;

        for (line, text) in lines {
            match parse_record(line, text)? {
                Record::Face(f) => resolver.resolve_face(line, &f)?,
                Record::Position(_) | Record::TextureCoordinate(_) | Record::Normal(_) => {
                    late_attributes += 1;
                }
                Record::ObjectName(n) => {
                    name.get_or_insert(n);
                }
                Record::Ignored => {}
            }
        }
    }

    if late_attributes > 0 {
        warn!(
            count = late_attributes,
            "ignored attribute records that follow the first face"
        );
    }

    let (vertices, indices) = resolver.finish();
    let mut model = assemble(&tables, &vertices, &indices, options)?;
    model.name = name.unwrap_or_default();

    info!(
        name = %model.name,
        vertices = model.vertex_count(),
        split = model.split_vertex_count(),
        triangles = model.triangle_count(),
        furthest_point = model.furthest_point,
        "loaded OBJ mesh"
    );

    Ok(model)
}

/// Reads and parses an OBJ file. A model without an `o` record is named
/// after the file stem.
pub fn load_obj_file(path: &Path, options: &LoadOptions) -> Result<Model> {
    let data = std::fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut model = parse_obj_file(&data, options)?;
    if model.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            model.name = stem.to_string();
        }
    }

    Ok(model)
}

/// Loads independent files in parallel. Results are in the order of `paths`.
pub fn load_obj_files<P>(paths: &[P], options: &LoadOptions) -> Vec<Result<Model>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| load_obj_file(path.as_ref(), options))
        .collect()
}
