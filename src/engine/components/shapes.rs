use std::collections::HashMap;

use serde::{ Deserialize, Serialize };

use crate::engine::components::mesh_data::MeshData;
use crate::engine::error::RenderError;
use crate::engine::utils::math::{ vec3_add, vec3_normalize, vec3_scale, Vec3 };

/// Procedural primitives. Generated geometry is not centered and carries no
/// normals; `Mesh::from_shape` takes care of both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Unit cube spanning [0, 1] on every axis, 12 triangles.
    Cube,
    /// Icosahedron subdivided `subdivisions` times and projected on the unit sphere.
    Sphere {
        subdivisions: u32,
    },
}

impl Shape {
    pub fn get_shape_name(&self) -> String {
        match self {
            Shape::Cube => "Cube".to_string(),
            Shape::Sphere { subdivisions } => format!("Sphere (subdivisions: {})", subdivisions),
        }
    }

    pub fn mesh_data(&self) -> Result<MeshData, RenderError> {
        match *self {
            Shape::Cube => Ok(cube()),
            Shape::Sphere { subdivisions } => subdivided_sphere(subdivisions),
        }
    }
}

const CUBE_CORNERS: [Vec3; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

// Counter-clockwise seen from outside: +Z, -Z, +X, -X, +Y, -Y
const CUBE_FACES: [[usize; 4]; 6] = [
    [4, 5, 7, 6],
    [1, 0, 2, 3],
    [5, 1, 3, 7],
    [0, 4, 6, 2],
    [6, 7, 3, 2],
    [0, 1, 5, 4],
];

// Faces do not share vertices so generated normals stay flat.
fn cube() -> MeshData {
    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for face in CUBE_FACES {
        let base = positions.len() as u16;
        positions.extend(face.iter().map(|&corner| CUBE_CORNERS[corner]));
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::new(positions, Vec::new(), None, indices)
}

/// Saturates at `u64::MAX` for levels that overflow.
pub fn sphere_vertex_count(subdivisions: u32) -> u64 {
    4u64.checked_pow(subdivisions)
        .and_then(|faces| faces.checked_mul(10))
        .and_then(|edges| edges.checked_add(2))
        .unwrap_or(u64::MAX)
}

fn subdivided_sphere(subdivisions: u32) -> Result<MeshData, RenderError> {
    let vertex_count = sphere_vertex_count(subdivisions);
    if vertex_count > u64::from(u16::MAX) + 1 {
        return Err(RenderError::TooManyVertices {
            shape: Shape::Sphere { subdivisions }.get_shape_name(),
            vertex_count,
        });
    }

    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let mut positions: Vec<Vec3> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .into_iter()
    .map(vec3_normalize)
    .collect();

    let mut triangles: Vec<[u16; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u16, u16), u16> = HashMap::new();
        let mut midpoint = |a: u16, b: u16, positions: &mut Vec<Vec3>| -> u16 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = vec3_scale(vec3_add(positions[a as usize], positions[b as usize]), 0.5);
                positions.push(vec3_normalize(mid));
                (positions.len() - 1) as u16
            })
        };

        let mut refined = Vec::with_capacity(triangles.len() * 4);
        for [a, b, c] in triangles {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            refined.push([a, ab, ca]);
            refined.push([b, bc, ab]);
            refined.push([c, ca, bc]);
            refined.push([ab, bc, ca]);
        }
        triangles = refined;
    }

    let indices = triangles.into_iter().flatten().collect();
    Ok(MeshData::new(positions, Vec::new(), None, indices))
}
