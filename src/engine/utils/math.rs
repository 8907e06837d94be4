pub type Mat4x4 = [f32; 16];
pub type Vec3 = [f32; 3];

pub const VEC3_ZERO: Vec3 = [0.0, 0.0, 0.0];
pub const VEC3_UP: Vec3 = [0.0, 1.0, 0.0];
pub const VEC3_RIGHT: Vec3 = [1.0, 0.0, 0.0];
pub const VEC3_FRONT: Vec3 = [0.0, 0.0, -1.0];

pub fn mat4x4_identity() -> Mat4x4 {
    [
      1.0, 0.0, 0.0, 0.0,
      0.0, 1.0, 0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_translate(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
      1.0, 0.0, 0.0,  x,
      0.0, 1.0, 0.0,  y,
      0.0, 0.0, 1.0,  z,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_scale(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
       x,  0.0, 0.0, 0.0,
      0.0,  y,  0.0, 0.0,
      0.0, 0.0,  z,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

/// Counter-clockwise rotation of `angle` radians about `axis`.
///
/// The axis does not need to be normalized, but it must not be the zero vector.
pub fn mat4x4_rotate(angle: f32, axis: Vec3) -> Mat4x4 {
    let [x, y, z] = vec3_normalize(axis);
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    [
      t * x * x + c,      t * x * y - s * z,  t * x * z + s * y,  0.0,
      t * x * y + s * z,  t * y * y + c,      t * y * z - s * x,  0.0,
      t * x * z - s * y,  t * y * z + s * x,  t * z * z + c,      0.0,
      0.0,                0.0,                0.0,                1.0,
    ]
}

pub fn mat4x4_transpose(matrix: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for i in 0..16 {
        let row = i / 4;
        let col = i % 4;
        ret[col * 4 + row] = matrix[row * 4 + col];
    }
    ret
}

pub fn vec4_dot(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

pub fn mat4x4_row(mat: &Mat4x4, row: usize) -> [f32; 4] {
    let start_idx = row * 4;
    [mat[start_idx], mat[start_idx + 1], mat[start_idx + 2], mat[start_idx + 3]]
}

pub fn mat4x4_col(mat: &Mat4x4, col: usize) -> [f32; 4] {
    [mat[col], mat[4 + col], mat[8 + col], mat[12 + col]]
}

pub fn mat4x4_mul(a: Mat4x4, b: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for (i, value) in ret.iter_mut().enumerate() {
        let row = i / 4;
        let col = i % 4;
        *value = vec4_dot(mat4x4_row(&a, row), mat4x4_col(&b, col));
    }
    ret
}

/// Gauss-Jordan elimination with partial pivoting. `None` for singular matrices.
pub fn mat4x4_inverse(matrix: Mat4x4) -> Option<Mat4x4> {
    let mut m = matrix;
    let mut inv = mat4x4_identity();

    for col in 0..4 {
        let pivot = (col..4)
            .max_by(|&a, &b| m[a * 4 + col].abs().total_cmp(&m[b * 4 + col].abs()))?;
        if m[pivot * 4 + col].abs() < f32::EPSILON {
            return None;
        }

        if pivot != col {
            for k in 0..4 {
                m.swap(pivot * 4 + k, col * 4 + k);
                inv.swap(pivot * 4 + k, col * 4 + k);
            }
        }

        let p = m[col * 4 + col];
        for k in 0..4 {
            m[col * 4 + k] /= p;
            inv[col * 4 + k] /= p;
        }

        for row in 0..4 {
            if row == col {
                continue;
            }
            let factor = m[row * 4 + col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..4 {
                m[row * 4 + k] -= factor * m[col * 4 + k];
                inv[row * 4 + k] -= factor * inv[col * 4 + k];
            }
        }
    }

    Some(inv)
}

pub fn mat4x4_perspective(fov_y_radians: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4x4 {
    let f = 1.0 / (fov_y_radians * 0.5).tan();
    let range_inv = 1.0 / (near - far);

    [
        f / aspect_ratio, 0.0, 0.0,                          0.0,
        0.0,              f,   0.0,                          0.0,
        0.0,              0.0, (near + far) * range_inv,     (2.0 * near * far) * range_inv,
        0.0,              0.0, -1.0,                         0.0,
    ]
}

pub fn mat4x4_transform_point(mat: &Mat4x4, point: Vec3) -> Vec3 {
    let p = [point[0], point[1], point[2], 1.0];
    let w = vec4_dot(mat4x4_row(mat, 3), p);
    [
        vec4_dot(mat4x4_row(mat, 0), p) / w,
        vec4_dot(mat4x4_row(mat, 1), p) / w,
        vec4_dot(mat4x4_row(mat, 2), p) / w,
    ]
}

// Model matrix: translate * rotate * scale. A zero axis leaves out the rotation.
pub fn model_matrix(position: Vec3, scale: f32, angle_degrees: f32, axis: Vec3) -> Mat4x4 {
    let mut model = mat4x4_translate(position[0], position[1], position[2]);
    if axis != VEC3_ZERO {
        model = mat4x4_mul(model, mat4x4_rotate(angle_degrees.to_radians(), axis));
    }
    mat4x4_mul(model, mat4x4_scale(scale, scale, scale))
}

/// Transpose of the inverse of `model`. Singular models get the identity.
pub fn normal_matrix(model: &Mat4x4) -> Mat4x4 {
    mat4x4_inverse(*model)
        .map(mat4x4_transpose)
        .unwrap_or_else(mat4x4_identity)
}

pub fn view_projection(projection: &Mat4x4, view: &Mat4x4) -> Mat4x4 {
    mat4x4_mul(*projection, *view)
}

pub fn vec3_add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn vec3_sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn vec3_scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn vec3_cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn vec3_length(v: Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn vec3_normalize(v: Vec3) -> Vec3 {
    let len = vec3_length(v);
    if len == 0.0 {
        return v;
    }
    vec3_scale(v, 1.0 / len)
}
