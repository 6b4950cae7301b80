use super::*;
use crate::math::*;

/// Texture coordinates of four lanes. `face` is only meaningful for cube targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoords {
    pub s: F32x4,
    pub t: F32x4,
    pub r: F32x4,
    pub face: I32x4,
}

/// The mip level(s) each lane reads from.
pub struct MipViews<'a> {
    pub level0: MipLevelView<'a>,
    /// Second level and the blend weight towards it, present for linear mip filtering.
    pub level1: Option<(MipLevelView<'a>, F32x4)>,
}

#[inline(always)]
pub fn lerp(weight: F32x4, a: F32x4, b: F32x4) -> F32x4 {
    a + weight * (b - a)
}

#[inline(always)]
pub fn lerp_texels(weight: F32x4, a: [F32x4; 4], b: [F32x4; 4]) -> [F32x4; 4] {
    std::array::from_fn(|c| lerp(weight, a[c], b[c]))
}

/// Bilinear blend of the four texels (x0,y0), (x1,y0), (x0,y1), (x1,y1).
#[inline(always)]
pub fn lerp_2d(
    wx: F32x4,
    wy: F32x4,
    t00: [F32x4; 4],
    t10: [F32x4; 4],
    t01: [F32x4; 4],
    t11: [F32x4; 4],
) -> [F32x4; 4] {
    lerp_texels(wy, lerp_texels(wx, t00, t10), lerp_texels(wx, t01, t11))
}

fn sample_image_nearest(
    state: &StaticSamplerState,
    wraps: &WrapFunctions,
    view: &MipLevelView,
    border_color: [f32; 4],
    coords: &TexCoords,
) -> [F32x4; 4] {
    let dims = state.dims();
    let normalized = state.normalized_coords;
    let zero = I32x4::splat(0);
    let x = (wraps.nearest[0])(coords.s, view.width, state.pot_width, normalized);
    let y = if dims >= 2 { (wraps.nearest[1])(coords.t, view.height, state.pot_height, normalized) } else { zero };
    let z = if dims >= 3 {
        (wraps.nearest[2])(coords.r, view.depth, state.pot_depth, normalized)
    } else if state.target == TextureTarget::Cube {
        coords.face
    } else {
        zero
    };
    fetch_texels(state, view, border_color, x, y, z)
}

fn sample_image_linear(
    state: &StaticSamplerState,
    wraps: &WrapFunctions,
    view: &MipLevelView,
    border_color: [f32; 4],
    coords: &TexCoords,
) -> [F32x4; 4] {
    let dims = state.dims();
    let normalized = state.normalized_coords;
    let zero = I32x4::splat(0);
    let fetch = |x, y, z| fetch_texels(state, view, border_color, x, y, z);

    let ws = (wraps.linear[0])(coords.s, view.width, state.pot_width, normalized);
    if dims == 1 {
        return lerp_texels(ws.weight, fetch(ws.coord0, zero, zero), fetch(ws.coord1, zero, zero));
    }

    let wt = (wraps.linear[1])(coords.t, view.height, state.pot_height, normalized);
    let layer = |z| {
        lerp_2d(
            ws.weight,
            wt.weight,
            fetch(ws.coord0, wt.coord0, z),
            fetch(ws.coord1, wt.coord0, z),
            fetch(ws.coord0, wt.coord1, z),
            fetch(ws.coord1, wt.coord1, z),
        )
    };
    if dims == 2 {
        let z = if state.target == TextureTarget::Cube { coords.face } else { zero };
        return layer(z);
    }

    let wr = (wraps.linear[2])(coords.r, view.depth, state.pot_depth, normalized);
    lerp_texels(wr.weight, layer(wr.coord0), layer(wr.coord1))
}

fn sample_image(
    state: &StaticSamplerState,
    wraps: &WrapFunctions,
    view: &MipLevelView,
    border_color: [f32; 4],
    filter: ImgFilter,
    coords: &TexCoords,
) -> [F32x4; 4] {
    match filter {
        ImgFilter::Nearest => sample_image_nearest(state, wraps, view, border_color, coords),
        ImgFilter::Linear => sample_image_linear(state, wraps, view, border_color, coords),
    }
}

/// Samples with one image filter from the selected level(s), blending between levels if needed.
pub fn sample_mipmap(
    state: &StaticSamplerState,
    wraps: &WrapFunctions,
    views: &MipViews,
    border_color: [f32; 4],
    filter: ImgFilter,
    coords: &TexCoords,
) -> [F32x4; 4] {
    let colors0 = sample_image(state, wraps, &views.level0, border_color, filter, coords);
    match &views.level1 {
        Some((view1, weight)) if weight.cmp_gt(F32x4::splat(0.0)).any() => {
            let colors1 = sample_image(state, wraps, view1, border_color, filter, coords);
            lerp_texels(*weight, colors0, colors1)
        }
        _ => colors0,
    }
}

/// Float path: filters texels decoded to float RGBA.
///
/// When the minification and magnification filters differ both are evaluated for all lanes and
/// each lane keeps the minified result if its LOD is >= 0, the magnified one otherwise.
pub fn filter_soa(
    state: &StaticSamplerState,
    wraps: &WrapFunctions,
    views: &MipViews,
    border_color: [f32; 4],
    coords: &TexCoords,
    lod: Option<F32x4>,
) -> [F32x4; 4] {
    if state.min_img_filter == state.mag_img_filter {
        return sample_mipmap(state, wraps, views, border_color, state.min_img_filter, coords);
    }
    let minified = sample_mipmap(state, wraps, views, border_color, state.min_img_filter, coords);
    let magnified = sample_mipmap(state, wraps, views, border_color, state.mag_img_filter, coords);
    let zero = F32x4::splat(0.0);
    let minify = lod.unwrap_or(zero).cmp_ge(zero);
    std::array::from_fn(|c| minify.select(minified[c], magnified[c]))
}
