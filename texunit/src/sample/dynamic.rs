/// Per-invocation texture state, queried by unit index on every sampling call.
///
/// Implemented by whoever owns the texture storage. The engine never caches any of these values
/// across calls, so two textures with the same static configuration can share one procedure.
pub trait DynamicState {
    /// Base level width in texels.
    fn width(&self, unit: usize) -> u32;

    /// Base level height in texels, 1 for 1D textures.
    fn height(&self, unit: usize) -> u32;

    /// Base level depth in texels, 1 for non-3D textures.
    fn depth(&self, unit: usize) -> u32;

    /// Index of the last valid mip level (number of levels minus one).
    fn last_level(&self, unit: usize) -> u32;

    /// Distance in bytes between consecutive block rows of the given level.
    fn row_stride(&self, unit: usize, level: usize) -> usize;

    /// Distance in bytes between consecutive image slices (3D slices or cube faces) of the given level.
    fn img_stride(&self, unit: usize, level: usize) -> usize;

    /// Raw texel storage of the given level, starting at its first texel.
    fn data_ptr(&self, unit: usize, level: usize) -> &[u8];

    fn min_lod(&self, unit: usize) -> f32;

    fn max_lod(&self, unit: usize) -> f32;

    fn lod_bias(&self, unit: usize) -> f32;

    fn border_color(&self, unit: usize) -> [f32; 4];
}

/// Extent of a mip level given the base extent.
#[inline(always)]
pub fn mip_extent(base: u32, level: u32) -> u32 {
    (base >> level.min(31)).max(1)
}
