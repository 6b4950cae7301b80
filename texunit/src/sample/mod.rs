pub mod aos;
pub mod compare;
pub mod cube;
pub mod dynamic;
pub mod fetch;
pub mod filter;
pub mod format;
pub mod lod;
pub mod specialize;
pub mod state;
pub mod wrap;

#[cfg(test)]
pub(crate) mod testing;

pub use aos::*;
pub use compare::*;
pub use cube::*;
pub use dynamic::*;
pub use fetch::*;
pub use filter::*;
pub use format::*;
pub use lod::*;
pub use specialize::*;
pub use state::*;
pub use wrap::*;

use crate::math::*;
use crate::render::RGBA;

/// How the level of detail of a request is obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LodInput {
    /// Screen-space derivatives of s, t, r along x and y.
    Gradients { ddx: [F32x4; 3], ddy: [F32x4; 3] },
    /// Derivatives are taken from the 2x2 quad layout of the coordinates.
    Quad,
    /// Per-lane LOD, bypassing derivatives. Still biased and clamped.
    Explicit(F32x4),
}

/// One sampling call: a single quad of coordinates for a texture unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRequest {
    pub unit: usize,
    /// s, t, r, q. The q coordinate is ignored.
    pub coords: [F32x4; 4],
    /// Number of meaningful entries in `coords`, the rest read as zero.
    pub num_coords: usize,
    pub lod: LodInput,
    pub lod_bias: Option<F32x4>,
}

impl SampleRequest {
    pub fn new(unit: usize, coords: &[F32x4]) -> Self {
        let num_coords = coords.len().min(4);
        let mut all = [F32x4::splat(0.0); 4];
        all[..num_coords].copy_from_slice(&coords[..num_coords]);
        Self { unit, coords: all, num_coords, lod: LodInput::Quad, lod_bias: None }
    }

    pub fn with_lod(mut self, lod: LodInput) -> Self {
        self.lod = lod;
        self
    }

    pub fn with_lod_bias(mut self, bias: F32x4) -> Self {
        self.lod_bias = Some(bias);
        self
    }

    /// Coordinate `index`, or zero if the request carries fewer coordinates.
    pub fn coord(&self, index: usize) -> F32x4 {
        if index < self.num_coords { self.coords[index] } else { F32x4::splat(0.0) }
    }
}

/// Filtered, swizzled and compared R, G, B, A of four lanes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleResult {
    pub rgba: [F32x4; 4],
}

impl SampleResult {
    pub fn splat(color: [f32; 4]) -> Self {
        Self { rgba: color.map(F32x4::splat) }
    }

    pub fn lane(&self, lane: usize) -> [f32; 4] {
        self.rgba.map(|c| c.lane(lane))
    }

    /// Lane color quantized to 8-bit unorm.
    pub fn lane_rgba8(&self, lane: usize) -> RGBA {
        let [r, g, b, a] = self.lane(lane).map(|c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8);
        RGBA::new(r, g, b, a)
    }
}
