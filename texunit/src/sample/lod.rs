use super::*;
use crate::math::*;

/// Computes the continuous level of detail for each lane.
///
/// With `explicit_lod` the derivatives are ignored, otherwise the footprint of a lane in texture
/// space is the larger of its x/y derivative magnitudes scaled by the axis extent. Either way both
/// biases are added and the result is clamped to the sampler's [min_lod, max_lod].
/// Zero derivatives produce -inf which the clamp turns into `min_lod`.
pub fn lod_selector(
    state: &StaticSamplerState,
    dynamic: &dyn DynamicState,
    unit: usize,
    ddx: &[F32x4; 3],
    ddy: &[F32x4; 3],
    lod_bias: Option<F32x4>,
    explicit_lod: Option<F32x4>,
) -> F32x4 {
    let min_lod = F32x4::splat(dynamic.min_lod(unit));
    if state.min_max_lod_equal {
        return min_lod;
    }
    let max_lod = F32x4::splat(dynamic.max_lod(unit));

    let mut lod = match explicit_lod {
        Some(lod) => lod,
        None => {
            let dims = state.dims();
            let extent = |length: u32| {
                if state.normalized_coords { F32x4::splat(length as f32) } else { F32x4::splat(1.0) }
            };
            let footprint = |axis: usize, length: u32| ddx[axis].abs().max(ddy[axis].abs()) * extent(length);
            let mut rho = footprint(0, dynamic.width(unit));
            if dims >= 2 {
                rho = rho.max(footprint(1, dynamic.height(unit)));
            }
            if dims >= 3 {
                rho = rho.max(footprint(2, dynamic.depth(unit)));
            }
            rho.log2()
        }
    };

    if let Some(bias) = lod_bias {
        lod = lod + bias;
    }
    lod = lod + F32x4::splat(dynamic.lod_bias(unit));
    lod.clamp(min_lod, max_lod)
}

/// Rounds the LOD to the closest level in [0, last_level].
pub fn nearest_mip_level(lod: F32x4, last_level: u32) -> I32x4 {
    lod.round().map(|l| l as i32).clamp(I32x4::splat(0), I32x4::splat(last_level as i32))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMipLevels {
    pub level0: I32x4,
    pub level1: I32x4,
    /// Blend weight of `level1`, in [0, 1].
    pub weight: F32x4,
}

/// Picks the two levels bracketing the LOD and the blend weight between them.
pub fn linear_mip_levels(lod: F32x4, last_level: u32) -> LinearMipLevels {
    let last = last_level as i32;
    let level0 = lod.ifloor().clamp(I32x4::splat(0), I32x4::splat((last - 1).max(0)));
    let level1 = (level0 + I32x4::splat(1)).min(I32x4::splat(last));
    let weight = (lod - level0.to_f32()).clamp(F32x4::splat(0.0), F32x4::splat(1.0));
    LinearMipLevels { level0, level1, weight }
}
