use super::format::{PixelFormat, Swizzle};
use arrayvec::ArrayVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture1D,
    Texture2D,
    Texture3D,
    /// Six 2D faces stored as consecutive image slices: +X, -X, +Y, -Y, +Z, -Z.
    Cube,
    /// 2D texture addressed with unnormalized (texel-space) coordinates.
    Rect,
}

/// Number of coordinate axes used to address a texture of the given target.
pub const fn texture_dims(target: TextureTarget) -> usize {
    match target {
        TextureTarget::Texture1D => 1,
        TextureTarget::Texture2D | TextureTarget::Rect | TextureTarget::Cube => 2,
        TextureTarget::Texture3D => 3,
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat = 0,
    Clamp = 1,
    ClampToEdge = 2,
    ClampToBorder = 3,
    MirrorRepeat = 4,
    MirrorClamp = 5,
    MirrorClampToEdge = 6,
    MirrorClampToBorder = 7,
}

/// Wrap modes which need neither mirroring nor the border color.
pub const fn is_simple_wrap_mode(mode: WrapMode) -> bool {
    matches!(mode, WrapMode::Repeat | WrapMode::ClampToEdge)
}

/// Does the given wrap mode allow sampling the texture border color?
pub const fn wrap_mode_uses_border_color(mode: WrapMode) -> bool {
    match mode {
        WrapMode::Repeat | WrapMode::ClampToEdge | WrapMode::MirrorRepeat | WrapMode::MirrorClampToEdge => false,
        WrapMode::Clamp | WrapMode::ClampToBorder | WrapMode::MirrorClamp | WrapMode::MirrorClampToBorder => true,
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImgFilter {
    Nearest = 0,
    Linear = 1,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MipFilter {
    /// Always sample level 0.
    None = 0,
    Nearest = 1,
    Linear = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareMode {
    None,
    /// Compare the depth reference coordinate against the sampled R channel.
    RefToTexture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LEqual,
    Greater,
    NotEqual,
    GEqual,
    Always,
}

/// Describes the texture a sampler is bound to, as far as sampling code generation cares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewDesc {
    pub format: PixelFormat,
    pub target: TextureTarget,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub swizzle: [Swizzle; 4],
}

impl Default for ViewDesc {
    fn default() -> Self {
        Self {
            format: PixelFormat::Rgba8Unorm,
            target: TextureTarget::Texture2D,
            width: 1,
            height: 1,
            depth: 1,
            swizzle: Swizzle::IDENTITY,
        }
    }
}

/// Sampler object state as supplied by the API layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub wrap_r: WrapMode,
    pub min_img_filter: ImgFilter,
    pub mag_img_filter: ImgFilter,
    pub min_mip_filter: MipFilter,
    pub compare_mode: CompareMode,
    pub compare_func: CompareFunc,
    pub normalized_coords: bool,
    pub min_lod: f32,
    pub max_lod: f32,
    pub lod_bias: f32,
    pub border_color: [f32; 4],
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            wrap_r: WrapMode::Repeat,
            min_img_filter: ImgFilter::Nearest,
            mag_img_filter: ImgFilter::Nearest,
            min_mip_filter: MipFilter::None,
            compare_mode: CompareMode::None,
            compare_func: CompareFunc::Never,
            normalized_coords: true,
            min_lod: 0.0,
            max_lod: 1000.0,
            lod_bias: 0.0,
            border_color: [0.0; 4],
        }
    }
}

/// The subset of texture/sampler state which is baked into a specialized sampling procedure.
/// Equal states always yield behaviorally identical procedures; this is the specializer's cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticSamplerState {
    pub format: PixelFormat,
    pub swizzle: [Swizzle; 4],
    pub target: TextureTarget,
    pub pot_width: bool,
    pub pot_height: bool,
    pub pot_depth: bool,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub wrap_r: WrapMode,
    pub min_img_filter: ImgFilter,
    pub mag_img_filter: ImgFilter,
    pub min_mip_filter: MipFilter,
    pub compare_mode: CompareMode,
    pub compare_func: CompareFunc,
    pub normalized_coords: bool,
    pub min_max_lod_equal: bool,
}

impl StaticSamplerState {
    /// Reduces a texture view and a sampler down to the canonical static state.
    /// This is the only place where view/sampler objects are consulted.
    pub fn derive(view: &ViewDesc, sampler: &SamplerDesc) -> Self {
        // Rect textures are addressed in texels regardless of what the sampler says
        let normalized_coords = sampler.normalized_coords && view.target != TextureTarget::Rect;
        Self {
            format: view.format,
            swizzle: view.swizzle,
            target: view.target,
            pot_width: view.width.is_power_of_two(),
            pot_height: view.height.is_power_of_two(),
            pot_depth: view.depth.is_power_of_two(),
            wrap_s: sampler.wrap_s,
            wrap_t: sampler.wrap_t,
            wrap_r: sampler.wrap_r,
            min_img_filter: sampler.min_img_filter,
            mag_img_filter: sampler.mag_img_filter,
            min_mip_filter: sampler.min_mip_filter,
            compare_mode: sampler.compare_mode,
            compare_func: sampler.compare_func,
            normalized_coords,
            min_max_lod_equal: sampler.min_lod == sampler.max_lod,
        }
    }

    pub fn dims(&self) -> usize {
        texture_dims(self.target)
    }

    pub fn wrap_modes(&self) -> [WrapMode; 3] {
        [self.wrap_s, self.wrap_t, self.wrap_r]
    }

    /// Wrap modes of the axes which are actually addressed for this target.
    /// A cube face is addressed in 2D, its face index never wraps.
    pub fn active_wrap_modes(&self) -> ArrayVec<WrapMode, 3> {
        self.wrap_modes().into_iter().take(self.dims()).collect()
    }

    /// Whether LOD needs to be computed at all.
    pub fn needs_lod(&self) -> bool {
        self.min_img_filter != self.mag_img_filter || self.min_mip_filter != MipFilter::None
    }
}
