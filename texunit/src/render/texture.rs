use crate::error::TextureError;
use crate::sample::*;
use arrayvec::ArrayVec;
use log::trace;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;

pub const MAX_MIP_LEVELS: usize = 16;
pub const MAX_TEXTURE_UNITS: usize = 16;

/// Where the levels below the base level come from.
#[derive(Debug, Clone, Copy)]
pub enum MipLevels<'a> {
    /// Base level only.
    None,
    /// Full chain box-filtered from the base level.
    Generate,
    /// Caller-supplied levels 1, 2, ... each laid out like the base level.
    Explicit(&'a [&'a [u8]]),
}

/// Texel data to build a texture from. Cube faces and volume slices follow each other in
/// `texels`, rows are tightly packed.
#[derive(Debug, Clone, Copy)]
pub struct TextureSource<'a> {
    pub texels: &'a [u8],
    pub format: PixelFormat,
    pub target: TextureTarget,
    pub width: u32,
    pub height: u32,
    /// Slices of a 3D texture, 6 for cubes, 1 otherwise.
    pub depth: u32,
    pub mips: MipLevels<'a>,
}

impl<'a> TextureSource<'a> {
    pub fn new_2d(texels: &'a [u8], width: u32, height: u32, format: PixelFormat) -> Self {
        Self { texels, format, target: TextureTarget::Texture2D, width, height, depth: 1, mips: MipLevels::None }
    }

    /// Float texels, e.g. `Rgba32Float` or `Z32Float`, viewed as bytes.
    pub fn from_f32(texels: &'a [f32], width: u32, height: u32, format: PixelFormat) -> Self {
        Self::new_2d(bytemuck::cast_slice(texels), width, height, format)
    }

    /// An RGBA8 2D texture with a generated mip chain.
    pub fn from_rgba_image(image: &'a image::RgbaImage) -> Self {
        Self {
            mips: MipLevels::Generate,
            ..Self::new_2d(image.as_raw(), image.width(), image.height(), PixelFormat::Rgba8Unorm)
        }
    }

    pub fn with_target(mut self, target: TextureTarget, depth: u32) -> Self {
        self.target = target;
        self.depth = depth;
        self
    }

    pub fn with_mips(mut self, mips: MipLevels<'a>) -> Self {
        self.mips = mips;
        self
    }
}

pub fn load_rgba_image(path: impl AsRef<Path>) -> Result<image::RgbaImage, TextureError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Geometry of one mip level inside the texture's allocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mip {
    pub width: u32,
    pub height: u32,
    /// Slices at this level: shrinks for volumes, always 6 for cubes.
    pub depth: u32,
    pub offset: usize,
    pub row_stride: usize,
    pub img_stride: usize,
}

impl Mip {
    pub fn size(&self) -> usize {
        self.img_stride * self.depth as usize
    }
}

/// All levels of all faces/slices in one allocation.
#[derive(Debug)]
pub struct Texture {
    pub texels: Vec<u8>,
    pub mips: ArrayVec<Mip, MAX_MIP_LEVELS>,
    pub format: PixelFormat,
    pub target: TextureTarget,
}

impl Texture {
    pub fn new(source: &TextureSource) -> Result<Arc<Self>, TextureError> {
        validate_extent(source)?;
        let desc = source.format.desc();
        let full_chain = full_chain_length(source);
        let count = match source.mips {
            MipLevels::None => 1,
            MipLevels::Generate => full_chain,
            MipLevels::Explicit(levels) => levels.len() + 1,
        };
        if count > 1 && source.target == TextureTarget::Rect {
            return Err(TextureError::MipmappedRect);
        }
        if count > full_chain {
            return Err(TextureError::TooManyLevels { count, max: full_chain });
        }

        let mut mips = ArrayVec::<Mip, MAX_MIP_LEVELS>::new();
        let mut total_size = 0usize;
        for level in 0..count {
            let mip = level_geometry(source, desc, level as u32, total_size);
            total_size += mip.size();
            mips.push(mip);
        }

        let mut texels = vec![0u8; total_size];
        copy_level(&mut texels, &mips[0], source.texels, 0)?;
        match source.mips {
            MipLevels::None => {}
            MipLevels::Explicit(levels) => {
                for (index, data) in levels.iter().enumerate() {
                    copy_level(&mut texels, &mips[index + 1], data, index + 1)?;
                }
            }
            MipLevels::Generate => {
                let bpp = box_filter_bytes_per_pixel(desc).ok_or(TextureError::MipGenerationUnsupported(source.format))?;
                let reduce_slices = source.target == TextureTarget::Texture3D;
                for level in 1..count {
                    let (src_mip, dst_mip) = (mips[level - 1], mips[level]);
                    trace!("generating mip {} ({}x{}x{}) of {}", level, dst_mip.width, dst_mip.height, dst_mip.depth, desc.name);
                    let (head, tail) = texels.split_at_mut(dst_mip.offset);
                    let src = &head[src_mip.offset..src_mip.offset + src_mip.size()];
                    let dst = &mut tail[..dst_mip.size()];
                    box_filter(src, &src_mip, dst, &dst_mip, bpp, reduce_slices);
                }
            }
        }

        Ok(Arc::new(Texture { texels, mips, format: source.format, target: source.target }))
    }

    pub fn level_count(&self) -> usize {
        self.mips.len()
    }

    pub fn last_level(&self) -> u32 {
        self.mips.len() as u32 - 1
    }

    pub fn mip(&self, level: usize) -> &Mip {
        &self.mips[level.min(self.mips.len() - 1)]
    }

    pub fn level_data(&self, level: usize) -> &[u8] {
        let mip = self.mip(level);
        &self.texels[mip.offset..mip.offset + mip.size()]
    }

    /// View description with identity swizzle, for static state derivation.
    pub fn view(&self) -> ViewDesc {
        let base = &self.mips[0];
        ViewDesc {
            format: self.format,
            target: self.target,
            width: base.width,
            height: base.height,
            depth: base.depth,
            swizzle: Swizzle::IDENTITY,
        }
    }
}

fn validate_extent(source: &TextureSource) -> Result<(), TextureError> {
    let (width, height, depth) = (source.width, source.height, source.depth);
    if width == 0 || height == 0 || depth == 0 {
        return Err(TextureError::ZeroExtent { width, height, depth });
    }
    let valid = match source.target {
        TextureTarget::Texture1D => height == 1 && depth == 1,
        TextureTarget::Texture2D | TextureTarget::Rect => depth == 1,
        TextureTarget::Texture3D => true,
        TextureTarget::Cube => width == height && depth == 6,
    };
    if !valid {
        return Err(TextureError::InvalidExtent { target: source.target, width, height, depth });
    }
    Ok(())
}

fn full_chain_length(source: &TextureSource) -> usize {
    let mut largest = source.width.max(source.height);
    if source.target == TextureTarget::Texture3D {
        largest = largest.max(source.depth);
    }
    ((32 - largest.leading_zeros()) as usize).min(MAX_MIP_LEVELS)
}

fn level_geometry(source: &TextureSource, desc: &FormatDesc, level: u32, offset: usize) -> Mip {
    let width = mip_extent(source.width, level);
    let height = mip_extent(source.height, level);
    let depth = match source.target {
        TextureTarget::Texture3D => mip_extent(source.depth, level),
        _ => source.depth,
    };
    let blocks_x = width.div_ceil(desc.block.width) as usize;
    let blocks_y = height.div_ceil(desc.block.height) as usize;
    let row_stride = blocks_x * desc.bytes_per_block();
    Mip { width, height, depth, offset, row_stride, img_stride: row_stride * blocks_y }
}

fn copy_level(texels: &mut [u8], mip: &Mip, data: &[u8], level: usize) -> Result<(), TextureError> {
    if data.len() != mip.size() {
        return Err(TextureError::DataSize { level, expected: mip.size(), actual: data.len() });
    }
    texels[mip.offset..mip.offset + mip.size()].copy_from_slice(data);
    Ok(())
}

/// Pixel size of formats made of whole 8-bit unorm channels, which the box filter can average bytewise.
fn box_filter_bytes_per_pixel(desc: &FormatDesc) -> Option<usize> {
    let bytewise = desc.layout == FormatLayout::Plain
        && desc.channels.iter().all(|c| match c.kind {
            ChannelType::Void => true,
            ChannelType::Unorm => c.size == 8 && c.shift % 8 == 0,
            ChannelType::Float => false,
        });
    bytewise.then(|| desc.bytes_per_block())
}

/// 2x2 average of the level above, 2x2x2 when slices are reduced too.
/// Odd extents repeat their last row/column/slice.
fn box_filter(src: &[u8], src_mip: &Mip, dst: &mut [u8], dst_mip: &Mip, bpp: usize, reduce_slices: bool) {
    let clamp = |c: u32, extent: u32| c.min(extent - 1) as usize;
    for z in 0..dst_mip.depth {
        let src_slices: ArrayVec<usize, 2> = if reduce_slices {
            [clamp(2 * z, src_mip.depth), clamp(2 * z + 1, src_mip.depth)].into_iter().collect()
        } else {
            [z as usize].into_iter().collect()
        };
        let samples = 4 * src_slices.len() as u32;
        for y in 0..dst_mip.height {
            for x in 0..dst_mip.width {
                let mut sum = [0u32; 16];
                for &src_z in &src_slices {
                    for src_y in [clamp(2 * y, src_mip.height), clamp(2 * y + 1, src_mip.height)] {
                        for src_x in [clamp(2 * x, src_mip.width), clamp(2 * x + 1, src_mip.width)] {
                            let p_offset = src_z * src_mip.img_stride + src_y * src_mip.row_stride + src_x * bpp;
                            for i in 0..bpp {
                                sum[i] += src[p_offset + i] as u32;
                            }
                        }
                    }
                }
                let dst_offset = z as usize * dst_mip.img_stride + y as usize * dst_mip.row_stride + x as usize * bpp;
                for i in 0..bpp {
                    dst[dst_offset + i] = ((sum[i] + samples / 2) / samples) as u8;
                }
            }
        }
    }
}

/// A texture bound to a unit, with the sampler's dynamic parameters.
#[derive(Debug, Clone)]
pub struct TextureBinding {
    pub texture: Arc<Texture>,
    pub min_lod: f32,
    pub max_lod: f32,
    pub lod_bias: f32,
    pub border_color: [f32; 4],
}

impl TextureBinding {
    pub fn new(texture: Arc<Texture>, sampler: &SamplerDesc) -> Self {
        Self {
            texture,
            min_lod: sampler.min_lod,
            max_lod: sampler.max_lod,
            lod_bias: sampler.lod_bias,
            border_color: sampler.border_color,
        }
    }

    pub fn static_state(&self, sampler: &SamplerDesc) -> StaticSamplerState {
        StaticSamplerState::derive(&self.texture.view(), sampler)
    }
}

// Zero strides keep every face and slice on the same 16 bytes, enough for one texel of any format.
static EMPTY_TEXTURE: Lazy<Texture> = Lazy::new(|| {
    let mips = [Mip { width: 1, height: 1, depth: 1, offset: 0, row_stride: 0, img_stride: 0 }].into_iter().collect();
    Texture { texels: vec![0; 16], mips, format: PixelFormat::Rgba8Unorm, target: TextureTarget::Texture2D }
});

/// Bound textures of a draw. Units without a texture read as transparent black.
pub struct TextureUnits {
    units: [Option<TextureBinding>; MAX_TEXTURE_UNITS],
}

impl TextureUnits {
    pub fn new() -> Self {
        Self { units: std::array::from_fn(|_| None) }
    }

    pub fn bind(&mut self, unit: usize, binding: TextureBinding) -> Result<(), TextureError> {
        let slot = self.units.get_mut(unit).ok_or(TextureError::UnitOutOfRange { unit, max: MAX_TEXTURE_UNITS })?;
        *slot = Some(binding);
        Ok(())
    }

    pub fn unbind(&mut self, unit: usize) -> Option<TextureBinding> {
        self.units.get_mut(unit).and_then(Option::take)
    }

    pub fn get(&self, unit: usize) -> Option<&TextureBinding> {
        self.units.get(unit).and_then(Option::as_ref)
    }

    fn texture(&self, unit: usize) -> &Texture {
        match self.get(unit) {
            Some(binding) => &binding.texture,
            None => &EMPTY_TEXTURE,
        }
    }
}

impl Default for TextureUnits {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicState for TextureUnits {
    fn width(&self, unit: usize) -> u32 {
        self.texture(unit).mips[0].width
    }

    fn height(&self, unit: usize) -> u32 {
        self.texture(unit).mips[0].height
    }

    fn depth(&self, unit: usize) -> u32 {
        self.texture(unit).mips[0].depth
    }

    fn last_level(&self, unit: usize) -> u32 {
        self.texture(unit).last_level()
    }

    fn row_stride(&self, unit: usize, level: usize) -> usize {
        self.texture(unit).mip(level).row_stride
    }

    fn img_stride(&self, unit: usize, level: usize) -> usize {
        self.texture(unit).mip(level).img_stride
    }

    fn data_ptr(&self, unit: usize, level: usize) -> &[u8] {
        match self.get(unit) {
            Some(binding) => binding.texture.level_data(level),
            None => &EMPTY_TEXTURE.texels,
        }
    }

    fn min_lod(&self, unit: usize) -> f32 {
        self.get(unit).map_or(0.0, |b| b.min_lod)
    }

    fn max_lod(&self, unit: usize) -> f32 {
        self.get(unit).map_or(0.0, |b| b.max_lod)
    }

    fn lod_bias(&self, unit: usize) -> f32 {
        self.get(unit).map_or(0.0, |b| b.lod_bias)
    }

    fn border_color(&self, unit: usize) -> [f32; 4] {
        self.get(unit).map_or([0.0; 4], |b| b.border_color)
    }
}
