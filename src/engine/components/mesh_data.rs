//! CPU-side geometry as handed over by loaders and shape generators.

use crate::engine::utils::math::{ vec3_add, vec3_cross, vec3_normalize, vec3_scale, vec3_sub, Vec3 };

/// Raw attribute streams of one indexed triangle list.
///
/// `normals` may be empty until [`MeshData::compute_normals`] runs; every
/// other stream is indexed in lockstep with `positions`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, tex_coords: Option<Vec<[f32; 2]>>, indices: Vec<u16>) -> Self {
        Self {
            positions,
            normals,
            tex_coords,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.positions.len()
    }

    /// Arithmetic mean of all vertex positions.
    pub fn centroid(&self) -> Vec3 {
        if self.positions.is_empty() {
            return [0.0; 3];
        }
        let sum = self.positions.iter().fold([0.0; 3], |acc, p| vec3_add(acc, *p));
        vec3_scale(sum, 1.0 / self.positions.len() as f32)
    }

    /// Moves every vertex so the centroid lands on the origin.
    pub fn recenter(&mut self) {
        let centroid = self.centroid();
        for position in &mut self.positions {
            *position = vec3_sub(*position, centroid);
        }
    }

    /// Smooth per-vertex normals: area-weighted sum of the adjacent face
    /// normals, normalized.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![[0.0f32; 3]; self.positions.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
            let (Some(pa), Some(pb), Some(pc)) = (self.positions.get(a), self.positions.get(b), self.positions.get(c)) else {
                continue;
            };
            // cross product length is twice the triangle area
            let face = vec3_cross(vec3_sub(*pb, *pa), vec3_sub(*pc, *pa));
            for index in [a, b, c] {
                normals[index] = vec3_add(normals[index], face);
            }
        }

        self.normals = normals.into_iter().map(vec3_normalize).collect();
    }
}
