use std::mem;
use std::ops::{Index, IndexMut};

#[inline(always)]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

#[inline(always)]
pub fn to_degrees(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
        Vec4 { x, y, z, w }
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[f32; 4] {
        // SAFETY: Vec4 is repr(C) with four f32 fields and no padding
        let ary: &[f32; 4] = unsafe { mem::transmute(self) };
        ary
    }
    #[inline(always)]
    pub fn as_array_mut(&mut self) -> &mut [f32; 4] {
        let ary: &mut [f32; 4] = unsafe { mem::transmute(self) };
        ary
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;
    #[inline(always)]
    fn index(&self, i: usize) -> &f32 {
        self.as_array().index(i)
    }
}

impl IndexMut<usize> for Vec4 {
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        self.as_array_mut().index_mut(i)
    }
}

/// Column-major 4x4 matrix, laid out the way GL expects it when uploaded
/// without transposition.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4x4 {
    pub c0: Vec4,
    pub c1: Vec4,
    pub c2: Vec4,
    pub c3: Vec4,
}

impl Mat4x4 {
    pub const fn identity() -> Mat4x4 {
        Mat4x4 {
            c0: Vec4::new(1.0, 0.0, 0.0, 0.0),
            c1: Vec4::new(0.0, 1.0, 0.0, 0.0),
            c2: Vec4::new(0.0, 0.0, 1.0, 0.0),
            c3: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Counter-clockwise rotation about the Z axis, `angle` in radians.
    pub fn rotation_z(angle: f32) -> Mat4x4 {
        let (s, c) = angle.sin_cos();
        Mat4x4 {
            c0: Vec4::new(c, s, 0.0, 0.0),
            c1: Vec4::new(-s, c, 0.0, 0.0),
            ..Mat4x4::identity()
        }
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        let (c0, c1, c2, c3) = (self.c0, self.c1, self.c2, self.c3);
        [
            c0[0], c0[1], c0[2], c0[3], c1[0], c1[1], c1[2], c1[3], c2[0], c2[1], c2[2], c2[3],
            c3[0], c3[1], c3[2], c3[3],
        ]
    }

    pub fn transform(&self, v: Vec4) -> Vec4 {
        let cols = [self.c0, self.c1, self.c2, self.c3];
        let mut out = Vec4::new(0.0, 0.0, 0.0, 0.0);
        for (i, col) in cols.iter().enumerate() {
            for row in 0..4 {
                out[row] += col[row] * v[i];
            }
        }
        out
    }
}
