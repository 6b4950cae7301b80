use crate::math::*;

pub const CUBE_FACE_POS_X: i32 = 0;
pub const CUBE_FACE_NEG_X: i32 = 1;
pub const CUBE_FACE_POS_Y: i32 = 2;
pub const CUBE_FACE_NEG_Y: i32 = 3;
pub const CUBE_FACE_POS_Z: i32 = 4;
pub const CUBE_FACE_NEG_Z: i32 = 5;

/// 2D face coordinates in [0, 1] plus the face index, per lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeCoords {
    pub s: F32x4,
    pub t: F32x4,
    pub face: I32x4,
}

/// Projects direction vectors onto the cube faces.
///
/// The major axis is the component with the largest magnitude, ties going to x over y over z.
/// A zero direction picks +X or -X and lands in the middle of that face.
pub fn cube_lookup(rx: F32x4, ry: F32x4, rz: F32x4) -> CubeCoords {
    let mut s = [0.0f32; LANES];
    let mut t = [0.0f32; LANES];
    let mut face = [0i32; LANES];
    for lane in 0..LANES {
        let (x, y, z) = (rx.lane(lane), ry.lane(lane), rz.lane(lane));
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());
        let (f, sc, tc, ma) = if ax >= ay && ax >= az {
            if x >= 0.0 { (CUBE_FACE_POS_X, -z, -y, ax) } else { (CUBE_FACE_NEG_X, z, -y, ax) }
        } else if ay >= az {
            if y >= 0.0 { (CUBE_FACE_POS_Y, x, z, ay) } else { (CUBE_FACE_NEG_Y, x, -z, ay) }
        } else if z >= 0.0 {
            (CUBE_FACE_POS_Z, x, -y, az)
        } else {
            (CUBE_FACE_NEG_Z, -x, -y, az)
        };
        let ma = if ma == 0.0 { 1.0 } else { ma };
        s[lane] = (sc / ma + 1.0) * 0.5;
        t[lane] = (tc / ma + 1.0) * 0.5;
        face[lane] = f;
    }
    CubeCoords { s: F32x4::load(s), t: F32x4::load(t), face: I32x4::load(face) }
}
