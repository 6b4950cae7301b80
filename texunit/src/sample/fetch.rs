use super::*;
use crate::math::*;
use crate::render::RGBA;

/// Storage and extents of the mip level each lane samples from.
pub struct MipLevelView<'a> {
    data: [&'a [u8]; LANES],
    row_stride: [usize; LANES],
    img_stride: [usize; LANES],
    pub width: I32x4,
    pub height: I32x4,
    pub depth: I32x4,
}

impl<'a> MipLevelView<'a> {
    pub fn new(state: &StaticSamplerState, dynamic: &'a dyn DynamicState, unit: usize, level: I32x4) -> Self {
        let dims = state.dims();
        let base_width = dynamic.width(unit);
        let base_height = dynamic.height(unit);
        let base_depth = dynamic.depth(unit);
        let level = level.store().map(|l| l.max(0) as usize);
        let extent = |base: u32, axis: usize| {
            I32x4::load(level.map(|l| if axis < dims { mip_extent(base, l as u32) as i32 } else { 1 }))
        };
        let depth = match state.target {
            TextureTarget::Cube => I32x4::splat(6),
            _ => extent(base_depth, 2),
        };
        Self {
            data: level.map(|l| dynamic.data_ptr(unit, l)),
            row_stride: level.map(|l| dynamic.row_stride(unit, l)),
            img_stride: level.map(|l| dynamic.img_stride(unit, l)),
            width: extent(base_width, 0),
            height: extent(base_height, 1),
            depth,
        }
    }

    /// Byte offset of the block holding texel (x, y, z) and the texel's position inside the block.
    #[inline(always)]
    fn locate(&self, desc: &FormatDesc, lane: usize, x: i32, y: i32, z: i32) -> (usize, u32, u32) {
        let (x, y, z) = (x.max(0) as u32, y.max(0) as u32, z.max(0) as usize);
        let block = desc.block;
        let offset = (x / block.width) as usize * desc.bytes_per_block()
            + (y / block.height) as usize * self.row_stride[lane]
            + z * self.img_stride[lane];
        (offset, x % block.width, y % block.height)
    }

    pub fn row_strides(&self) -> I32x4 {
        I32x4::load(self.row_stride.map(|s| s as i32))
    }

    pub fn img_strides(&self) -> I32x4 {
        I32x4::load(self.img_stride.map(|s| s as i32))
    }

    #[inline(always)]
    fn texel_bytes(&self, lane: usize, offset: usize) -> &'a [u8] {
        let data: &'a [u8] = self.data[lane];
        &data[offset..]
    }
}

/// Lanes whose coordinates fall outside the level along an axis that wraps to the border color.
pub fn border_mask(state: &StaticSamplerState, view: &MipLevelView, x: I32x4, y: I32x4, z: I32x4) -> Mask4 {
    let zero = I32x4::splat(0);
    let mut mask = Mask4::splat(false);
    let axes = [(x, view.width), (y, view.height), (z, view.depth)];
    for ((coord, length), mode) in axes.into_iter().zip(state.active_wrap_modes()) {
        if wrap_mode_uses_border_color(mode) {
            mask = mask | coord.cmp_lt(zero) | coord.cmp_ge(length);
        }
    }
    mask
}

/// Fetches and decodes four texels to float RGBA, substituting the border color where required.
pub fn fetch_texels(
    state: &StaticSamplerState,
    view: &MipLevelView,
    border_color: [f32; 4],
    x: I32x4,
    y: I32x4,
    z: I32x4,
) -> [F32x4; 4] {
    let desc = state.format.desc();
    let use_border = border_mask(state, view, x, y, z);
    let zero = I32x4::splat(0);
    // masked lanes read texel 0, which always exists
    let x = use_border.select(zero, x);
    let y = use_border.select(zero, y);
    let z = use_border.select(zero, z);

    let mut texels = [[0.0f32; LANES]; 4];
    for lane in 0..LANES {
        let (offset, i, j) = view.locate(desc, lane, x.lane(lane), y.lane(lane), z.lane(lane));
        let rgba = desc.fetch_rgba_float(view.texel_bytes(lane, offset), i, j);
        for (channel, value) in rgba.into_iter().enumerate() {
            texels[channel][lane] = value;
        }
    }

    let texels = texels.map(F32x4::load);
    if !use_border.any() {
        return texels;
    }
    std::array::from_fn(|channel| use_border.select(F32x4::splat(border_color[channel]), texels[channel]))
}

/// Fetches four plain-format texels at precomputed byte offsets as 8-bit normalized RGBA.
/// Only valid for formats which `fits_8unorm`, where every block is a single texel.
pub fn fetch_texels_8unorm(state: &StaticSamplerState, view: &MipLevelView, offsets: I32x4) -> [RGBA; LANES] {
    let desc = state.format.desc();
    std::array::from_fn(|lane| desc.fetch_rgba_8unorm(view.texel_bytes(lane, offsets.lane(lane).max(0) as usize), 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::testing::FakeDynamic;

    fn state(wrap: WrapMode, format: PixelFormat, width: u32, height: u32) -> StaticSamplerState {
        let view = ViewDesc { format, width, height, ..Default::default() };
        let sampler = SamplerDesc { wrap_s: wrap, wrap_t: wrap, ..Default::default() };
        StaticSamplerState::derive(&view, &sampler)
    }

    fn checker() -> FakeDynamic {
        FakeDynamic::with_rgba8(2, 2, &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [255, 255, 255, 255]])
    }

    #[test]
    fn fetches_addressed_texels() {
        let dynamic = checker();
        let state = state(WrapMode::ClampToEdge, PixelFormat::Rgba8Unorm, 2, 2);
        let view = MipLevelView::new(&state, &dynamic, 0, I32x4::splat(0));
        let [r, g, b, a] = fetch_texels(
            &state,
            &view,
            [0.0; 4],
            I32x4::load([0, 1, 0, 1]),
            I32x4::load([0, 0, 1, 1]),
            I32x4::splat(0),
        );
        assert_eq!(r.store(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(g.store(), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(b.store(), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(a, F32x4::splat(1.0));
    }

    #[test]
    fn border_lanes_take_border_color() {
        let mut dynamic = checker();
        dynamic.border_color = [0.25, 0.5, 0.75, 1.0];
        let state = state(WrapMode::ClampToBorder, PixelFormat::Rgba8Unorm, 2, 2);
        let view = MipLevelView::new(&state, &dynamic, 0, I32x4::splat(0));
        let x = I32x4::load([-1, 2, 1, 0]);
        let y = I32x4::load([0, 0, 2, 1]);
        let mask = border_mask(&state, &view, x, y, I32x4::splat(0));
        assert_eq!(mask.store(), [true, true, true, false]);
        let [r, g, b, _] = fetch_texels(&state, &view, dynamic.border_color, x, y, I32x4::splat(0));
        assert_eq!(r.store(), [0.25, 0.25, 0.25, 0.0]);
        assert_eq!(g.store(), [0.5, 0.5, 0.5, 0.0]);
        assert_eq!(b.store(), [0.75, 0.75, 0.75, 1.0]);
    }

    #[test]
    fn edge_wrap_modes_never_mask() {
        let dynamic = checker();
        let state = state(WrapMode::ClampToEdge, PixelFormat::Rgba8Unorm, 2, 2);
        let view = MipLevelView::new(&state, &dynamic, 0, I32x4::splat(0));
        let mask = border_mask(&state, &view, I32x4::splat(-1), I32x4::splat(5), I32x4::splat(0));
        assert!(!mask.any());
    }

    #[test]
    fn level_extents_follow_lanes() {
        let mut dynamic = FakeDynamic::new(8, 4, 1, 3);
        dynamic.data = vec![0; 128];
        let state = state(WrapMode::Repeat, PixelFormat::Rgba8Unorm, 8, 4);
        let view = MipLevelView::new(&state, &dynamic, 0, I32x4::load([0, 1, 2, 3]));
        assert_eq!(view.width.store(), [8, 4, 2, 1]);
        assert_eq!(view.height.store(), [4, 2, 1, 1]);
        assert_eq!(view.depth, I32x4::splat(1));
    }

    #[test]
    fn compressed_texels_are_located_by_block() {
        // 8x4 DXT1: two blocks side by side, second one solid white
        let mut data = vec![0u8; 16];
        data[8..10].copy_from_slice(&0xffffu16.to_le_bytes());
        data[10..12].copy_from_slice(&0xffffu16.to_le_bytes());
        let mut dynamic = FakeDynamic::new(8, 4, 1, 0);
        dynamic.row_stride = 16;
        dynamic.img_stride = 16;
        dynamic.data = data;
        let state = state(WrapMode::Repeat, PixelFormat::Dxt1Rgb, 8, 4);
        let view = MipLevelView::new(&state, &dynamic, 0, I32x4::splat(0));
        let [r, _, _, a] = fetch_texels(
            &state,
            &view,
            [0.0; 4],
            I32x4::load([0, 3, 4, 7]),
            I32x4::load([0, 3, 0, 3]),
            I32x4::splat(0),
        );
        assert_eq!(r.store(), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(a, F32x4::splat(1.0));
    }

    #[test]
    fn fetch_8unorm_reads_at_offsets() {
        let dynamic = checker();
        let state = state(WrapMode::Repeat, PixelFormat::Rgba8Unorm, 2, 2);
        let view = MipLevelView::new(&state, &dynamic, 0, I32x4::splat(0));
        assert_eq!(view.row_strides(), I32x4::splat(8));
        let texels = fetch_texels_8unorm(&state, &view, I32x4::load([12, 8, 4, 0]));
        assert_eq!(texels[0], RGBA::new(255, 255, 255, 255));
        assert_eq!(texels[1], RGBA::new(0, 0, 255, 255));
        assert_eq!(texels[2], RGBA::new(0, 255, 0, 255));
        assert_eq!(texels[3], RGBA::new(255, 0, 0, 255));
    }
}
