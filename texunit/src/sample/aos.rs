use super::*;
use crate::math::*;
use crate::render::RGBA;

const FRAC_BITS: u32 = 8;
const FRAC_ONE: i32 = 1 << FRAC_BITS;
const FRAC_MASK: i32 = FRAC_ONE - 1;

/// The wrap modes the fixed-point path can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleWrap {
    Repeat,
    ClampToEdge,
}

impl SimpleWrap {
    pub fn from_mode(mode: WrapMode) -> Option<Self> {
        match mode {
            WrapMode::Repeat => Some(SimpleWrap::Repeat),
            WrapMode::ClampToEdge => Some(SimpleWrap::ClampToEdge),
            _ => None,
        }
    }
}

/// Fixed-point sampling with 8 fractional bits, texels kept as 8-bit unorm RGBA per lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AosPipeline {
    wraps: [SimpleWrap; 3],
}

impl AosPipeline {
    /// Returns None unless the format fits 8-bit unorm and every addressed axis wraps simply.
    pub fn new(state: &StaticSamplerState) -> Option<Self> {
        if !state.format.desc().fits_8unorm() {
            return None;
        }
        let mut wraps = [SimpleWrap::ClampToEdge; 3];
        for (wrap, mode) in wraps.iter_mut().zip(state.active_wrap_modes()) {
            *wrap = SimpleWrap::from_mode(mode)?;
        }
        Some(Self { wraps })
    }

    pub fn sample(&self, state: &StaticSamplerState, views: &MipViews, coords: &TexCoords, lod: Option<F32x4>) -> [F32x4; 4] {
        let colors = if state.min_img_filter == state.mag_img_filter {
            self.sample_mipmap(state, views, state.min_img_filter, coords)
        } else {
            let minified = self.sample_mipmap(state, views, state.min_img_filter, coords);
            let magnified = self.sample_mipmap(state, views, state.mag_img_filter, coords);
            let minify = lod.unwrap_or_default().cmp_ge(F32x4::splat(0.0));
            std::array::from_fn(|lane| if minify.lane(lane) { minified[lane] } else { magnified[lane] })
        };
        unpack_unorm8(colors)
    }

    fn sample_mipmap(&self, state: &StaticSamplerState, views: &MipViews, filter: ImgFilter, coords: &TexCoords) -> [RGBA; LANES] {
        let colors0 = self.sample_image(state, &views.level0, filter, coords);
        match &views.level1 {
            Some((view1, weight)) if weight.cmp_gt(F32x4::splat(0.0)).any() => {
                let colors1 = self.sample_image(state, view1, filter, coords);
                let weight = (*weight * F32x4::splat(FRAC_ONE as f32)).ifloor();
                lerp_unorm8(weight, colors0, colors1)
            }
            _ => colors0,
        }
    }

    fn sample_image(&self, state: &StaticSamplerState, view: &MipLevelView, filter: ImgFilter, coords: &TexCoords) -> [RGBA; LANES] {
        match filter {
            ImgFilter::Nearest => self.sample_image_nearest(state, view, coords),
            ImgFilter::Linear => self.sample_image_linear(state, view, coords),
        }
    }

    fn sample_image_nearest(&self, state: &StaticSamplerState, view: &MipLevelView, coords: &TexCoords) -> [RGBA; LANES] {
        let dims = state.dims();
        let normalized = state.normalized_coords;
        let x_stride = I32x4::splat(state.format.desc().bytes_per_block() as i32);

        let s = to_fixed(coords.s, view.width, normalized, false) >> FRAC_BITS;
        let mut offset = nearest_offset(self.wraps[0], s, view.width, x_stride, state.pot_width);
        if dims >= 2 {
            let t = to_fixed(coords.t, view.height, normalized, false) >> FRAC_BITS;
            offset = offset + nearest_offset(self.wraps[1], t, view.height, view.row_strides(), state.pot_height);
        }
        if dims >= 3 {
            let r = to_fixed(coords.r, view.depth, normalized, false) >> FRAC_BITS;
            offset = offset + nearest_offset(self.wraps[2], r, view.depth, view.img_strides(), state.pot_depth);
        } else if state.target == TextureTarget::Cube {
            offset = offset + coords.face * view.img_strides();
        }
        fetch_texels_8unorm(state, view, offset)
    }

    fn sample_image_linear(&self, state: &StaticSamplerState, view: &MipLevelView, coords: &TexCoords) -> [RGBA; LANES] {
        let dims = state.dims();
        let normalized = state.normalized_coords;
        let x_stride = I32x4::splat(state.format.desc().bytes_per_block() as i32);
        let fetch = |offset| fetch_texels_8unorm(state, view, offset);

        let s = to_fixed(coords.s, view.width, normalized, true);
        let (x0, x1) = linear_offsets(self.wraps[0], s >> FRAC_BITS, view.width, x_stride, state.pot_width);
        let ws = s & I32x4::splat(FRAC_MASK);
        if dims == 1 {
            return lerp_unorm8(ws, fetch(x0), fetch(x1));
        }

        let t = to_fixed(coords.t, view.height, normalized, true);
        let (y0, y1) = linear_offsets(self.wraps[1], t >> FRAC_BITS, view.height, view.row_strides(), state.pot_height);
        let wt = t & I32x4::splat(FRAC_MASK);
        let layer = |z: I32x4| {
            let row0 = lerp_unorm8(ws, fetch(x0 + y0 + z), fetch(x1 + y0 + z));
            let row1 = lerp_unorm8(ws, fetch(x0 + y1 + z), fetch(x1 + y1 + z));
            lerp_unorm8(wt, row0, row1)
        };
        if dims == 2 {
            let z = if state.target == TextureTarget::Cube { coords.face * view.img_strides() } else { I32x4::splat(0) };
            return layer(z);
        }

        let r = to_fixed(coords.r, view.depth, normalized, true);
        let (z0, z1) = linear_offsets(self.wraps[2], r >> FRAC_BITS, view.depth, view.img_strides(), state.pot_depth);
        let wr = r & I32x4::splat(FRAC_MASK);
        lerp_unorm8(wr, layer(z0), layer(z1))
    }
}

/// Converts to texel space with 8 fractional bits. Linear filtering shifts by half a texel so that
/// the integer part addresses the first of the two texels to blend.
#[inline(always)]
fn to_fixed(coord: F32x4, length: I32x4, normalized: bool, half_texel: bool) -> I32x4 {
    let texel = if normalized { coord * length.to_f32() } else { coord };
    let mut fixed = texel * F32x4::splat(FRAC_ONE as f32);
    if half_texel {
        fixed = fixed - F32x4::splat((FRAC_ONE / 2) as f32);
    }
    fixed.ifloor()
}

#[inline(always)]
fn nearest_offset(wrap: SimpleWrap, coord: I32x4, length: I32x4, stride: I32x4, is_pot: bool) -> I32x4 {
    let coord = match wrap {
        SimpleWrap::Repeat => repeat_int(coord, length, is_pot),
        SimpleWrap::ClampToEdge => coord.clamp(I32x4::splat(0), length - I32x4::splat(1)),
    };
    coord * stride
}

/// Byte offsets of texel `coord0` and its right/lower neighbor along one axis.
#[inline(always)]
fn linear_offsets(wrap: SimpleWrap, coord0: I32x4, length: I32x4, stride: I32x4, is_pot: bool) -> (I32x4, I32x4) {
    let zero = I32x4::splat(0);
    let length_minus_one = length - I32x4::splat(1);
    match wrap {
        SimpleWrap::Repeat => {
            let coord0 = repeat_int(coord0, length, is_pot);
            // the neighbor of the last texel is texel 0, at offset 0
            let wraps_around = coord0.cmp_eq(length_minus_one);
            let offset0 = coord0 * stride;
            (offset0, wraps_around.select(zero, offset0 + stride))
        }
        SimpleWrap::ClampToEdge => {
            let above = coord0.cmp_ge(zero);
            let below = coord0.cmp_lt(length_minus_one);
            let coord0 = above.select(coord0, zero);
            let coord0 = below.select(coord0, length_minus_one);
            let offset0 = coord0 * stride;
            (offset0, offset0 + (above & below).select(stride, zero))
        }
    }
}

/// Per lane `a + (b - a) * weight / 256` rounded to nearest, weight in [0, 256].
#[inline(always)]
fn lerp_unorm8(weight: I32x4, a: [RGBA; LANES], b: [RGBA; LANES]) -> [RGBA; LANES] {
    const HALF: i32 = FRAC_ONE / 2;
    std::array::from_fn(|lane| {
        let w = weight.lane(lane);
        let mix = |a: u8, b: u8| (a as i32 + (((b as i32 - a as i32) * w + HALF) >> FRAC_BITS)) as u8;
        let (a, b) = (a[lane], b[lane]);
        RGBA::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
    })
}

fn unpack_unorm8(colors: [RGBA; LANES]) -> [F32x4; 4] {
    let channel = |f: fn(&RGBA) -> u8| F32x4::load(colors.each_ref().map(|c| f(c) as f32 / 255.0));
    [channel(|c| c.r), channel(|c| c.g), channel(|c| c.b), channel(|c| c.a)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::testing::FakeDynamic;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const YELLOW: [u8; 4] = [255, 255, 0, 255];

    fn state(filter: ImgFilter, wrap: WrapMode) -> StaticSamplerState {
        let view = ViewDesc { width: 2, height: 2, ..Default::default() };
        let sampler =
            SamplerDesc { min_img_filter: filter, mag_img_filter: filter, wrap_s: wrap, wrap_t: wrap, ..Default::default() };
        StaticSamplerState::derive(&view, &sampler)
    }

    fn sample_bytes(state: &StaticSamplerState, dynamic: &FakeDynamic, s: F32x4, t: F32x4) -> [RGBA; LANES] {
        let pipeline = AosPipeline::new(state).expect("fixed-point path applies");
        let views = MipViews { level0: MipLevelView::new(state, dynamic, 0, I32x4::splat(0)), level1: None };
        let coords = TexCoords { s, t, r: F32x4::splat(0.0), face: I32x4::splat(0) };
        pipeline.sample_mipmap(state, &views, state.min_img_filter, &coords)
    }

    #[test]
    fn eligibility_requires_unorm8_and_simple_wraps() {
        assert!(AosPipeline::new(&state(ImgFilter::Linear, WrapMode::Repeat)).is_some());
        assert!(AosPipeline::new(&state(ImgFilter::Linear, WrapMode::ClampToEdge)).is_some());
        assert!(AosPipeline::new(&state(ImgFilter::Linear, WrapMode::ClampToBorder)).is_none());
        assert!(AosPipeline::new(&state(ImgFilter::Linear, WrapMode::MirrorRepeat)).is_none());

        let float = ViewDesc { format: PixelFormat::Rgba32Float, ..Default::default() };
        assert!(AosPipeline::new(&StaticSamplerState::derive(&float, &SamplerDesc::default())).is_none());

        // r only matters for volumes
        let sampler = SamplerDesc { wrap_r: WrapMode::ClampToBorder, ..Default::default() };
        let flat = ViewDesc { width: 4, height: 4, ..Default::default() };
        assert!(AosPipeline::new(&StaticSamplerState::derive(&flat, &sampler)).is_some());
        let volume = ViewDesc { target: TextureTarget::Texture3D, width: 4, height: 4, depth: 4, ..Default::default() };
        assert!(AosPipeline::new(&StaticSamplerState::derive(&volume, &sampler)).is_none());
    }

    #[test]
    fn bilinear_center_of_2x2_in_fixed_point() {
        let dynamic = FakeDynamic::with_rgba8(2, 2, &[RED, GREEN, BLUE, YELLOW]);
        let texels = sample_bytes(&state(ImgFilter::Linear, WrapMode::Repeat), &dynamic, F32x4::splat(0.5), F32x4::splat(0.5));
        for texel in texels {
            assert_eq!(texel, RGBA::new(128, 128, 64, 255));
        }
    }

    #[test]
    fn nearest_in_fixed_point() {
        let dynamic = FakeDynamic::with_rgba8(2, 2, &[RED, GREEN, BLUE, WHITE]);
        let texels = sample_bytes(
            &state(ImgFilter::Nearest, WrapMode::Repeat),
            &dynamic,
            F32x4::load([0.25, 1.75, -0.25, 0.75]),
            F32x4::load([0.25, 0.25, 0.25, 0.75]),
        );
        assert_eq!(texels, [RED, GREEN, GREEN, WHITE].map(|[r, g, b, a]| RGBA::new(r, g, b, a)));
    }

    #[test]
    fn linear_offsets_repeat_wraps_neighbor_to_zero() {
        let (offset0, offset1) = linear_offsets(SimpleWrap::Repeat, I32x4::load([0, 1, 2, -1]), I32x4::splat(3), I32x4::splat(4), false);
        assert_eq!(offset0.store(), [0, 4, 8, 8]);
        assert_eq!(offset1.store(), [4, 8, 0, 0]);
    }

    #[test]
    fn linear_offsets_clamp_to_edge_duplicates_edges() {
        let (offset0, offset1) =
            linear_offsets(SimpleWrap::ClampToEdge, I32x4::load([-1, 0, 2, 3]), I32x4::splat(3), I32x4::splat(4), false);
        assert_eq!(offset0.store(), [0, 0, 8, 8]);
        assert_eq!(offset1.store(), [0, 4, 8, 8]);
    }

    #[test]
    fn fixed_point_lerp() {
        let a = [RGBA::new(0, 255, 100, 10); LANES];
        let b = [RGBA::new(255, 0, 100, 20); LANES];
        let mixed = lerp_unorm8(I32x4::load([0, 128, 256, 64]), a, b);
        assert_eq!(mixed[0], RGBA::new(0, 255, 100, 10));
        assert_eq!(mixed[1], RGBA::new(128, 128, 100, 15));
        assert_eq!(mixed[2], RGBA::new(255, 0, 100, 20));
        assert_eq!(mixed[3], RGBA::new(64, 191, 100, 13));
    }
}
