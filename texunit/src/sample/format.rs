use crate::math::F32x4;
use crate::render::RGBA;

/// Selects a source channel (X, Y, Z, W are channels 0..3) or a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Swizzle {
    X,
    Y,
    Z,
    W,
    Zero,
    One,
}

impl Swizzle {
    pub const IDENTITY: [Swizzle; 4] = [Swizzle::X, Swizzle::Y, Swizzle::Z, Swizzle::W];
}

/// Remaps four channels per the swizzle, substituting `zero`/`one` for the constant selectors.
#[inline(always)]
pub fn swizzle_channels<T: Copy>(channels: [T; 4], swizzle: [Swizzle; 4], zero: T, one: T) -> [T; 4] {
    swizzle.map(|s| match s {
        Swizzle::X => channels[0],
        Swizzle::Y => channels[1],
        Swizzle::Z => channels[2],
        Swizzle::W => channels[3],
        Swizzle::Zero => zero,
        Swizzle::One => one,
    })
}

/// Remaps filtered R,G,B,A lanes per the sampler view swizzle.
pub fn apply_sampler_swizzle(texel: [F32x4; 4], swizzle: [Swizzle; 4]) -> [F32x4; 4] {
    if swizzle == Swizzle::IDENTITY {
        return texel;
    }
    swizzle_channels(texel, swizzle, F32x4::splat(0.0), F32x4::splat(1.0))
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba8Unorm = 0,
    Bgra8Unorm = 1,
    Rgb8Unorm = 2,
    L8Unorm = 3,
    A8Unorm = 4,
    L8A8Unorm = 5,
    /// 16-bit packed, red in the high bits.
    R5G6B5Unorm = 6,
    R32Float = 7,
    Rgba32Float = 8,
    Z16Unorm = 9,
    Z32Float = 10,
    /// BC1 without alpha: 4x4 blocks of 8 bytes.
    Dxt1Rgb = 11,
    /// BC1 with 1-bit alpha: 4x4 blocks of 8 bytes.
    Dxt1Rgba = 12,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 13] = [
        PixelFormat::Rgba8Unorm,
        PixelFormat::Bgra8Unorm,
        PixelFormat::Rgb8Unorm,
        PixelFormat::L8Unorm,
        PixelFormat::A8Unorm,
        PixelFormat::L8A8Unorm,
        PixelFormat::R5G6B5Unorm,
        PixelFormat::R32Float,
        PixelFormat::Rgba32Float,
        PixelFormat::Z16Unorm,
        PixelFormat::Z32Float,
        PixelFormat::Dxt1Rgb,
        PixelFormat::Dxt1Rgba,
    ];

    pub fn desc(self) -> &'static FormatDesc {
        &FORMATS[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatLayout {
    /// Every pixel is a little-endian bit-packed word.
    Plain,
    /// S3TC / BC1 compressed blocks.
    S3tc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colorspace {
    Rgb,
    /// Depth/stencil.
    Zs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Void,
    Unorm,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub kind: ChannelType,
    /// Size in bits
    pub size: u32,
    /// Offset of the lowest bit inside the pixel word
    pub shift: u32,
}

/// Pixel block geometry; plain formats use 1x1 blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDesc {
    pub width: u32,
    pub height: u32,
    pub bits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDesc {
    pub format: PixelFormat,
    pub name: &'static str,
    pub layout: FormatLayout,
    pub block: BlockDesc,
    pub channels: [Channel; 4],
    /// Maps the stored channels to R, G, B, A.
    pub swizzle: [Swizzle; 4],
    pub colorspace: Colorspace,
}

const fn void() -> Channel {
    Channel { kind: ChannelType::Void, size: 0, shift: 0 }
}

const fn unorm(size: u32, shift: u32) -> Channel {
    Channel { kind: ChannelType::Unorm, size, shift }
}

const fn float(shift: u32) -> Channel {
    Channel { kind: ChannelType::Float, size: 32, shift }
}

const fn plain(
    format: PixelFormat,
    name: &'static str,
    bits: u32,
    channels: [Channel; 4],
    swizzle: [Swizzle; 4],
    colorspace: Colorspace,
) -> FormatDesc {
    FormatDesc {
        format,
        name,
        layout: FormatLayout::Plain,
        block: BlockDesc { width: 1, height: 1, bits },
        channels,
        swizzle,
        colorspace,
    }
}

const fn dxt1(format: PixelFormat, name: &'static str, swizzle: [Swizzle; 4]) -> FormatDesc {
    FormatDesc {
        format,
        name,
        layout: FormatLayout::S3tc,
        block: BlockDesc { width: 4, height: 4, bits: 64 },
        channels: [unorm(8, 0), unorm(8, 8), unorm(8, 16), unorm(8, 24)],
        swizzle,
        colorspace: Colorspace::Rgb,
    }
}

use Swizzle::{One, W, X, Y, Z, Zero};

// Indexed by `PixelFormat as usize`.
static FORMATS: [FormatDesc; 13] = [
    plain(
        PixelFormat::Rgba8Unorm,
        "rgba8_unorm",
        32,
        [unorm(8, 0), unorm(8, 8), unorm(8, 16), unorm(8, 24)],
        [X, Y, Z, W],
        Colorspace::Rgb,
    ),
    plain(
        PixelFormat::Bgra8Unorm,
        "bgra8_unorm",
        32,
        [unorm(8, 0), unorm(8, 8), unorm(8, 16), unorm(8, 24)],
        [Z, Y, X, W],
        Colorspace::Rgb,
    ),
    plain(
        PixelFormat::Rgb8Unorm,
        "rgb8_unorm",
        24,
        [unorm(8, 0), unorm(8, 8), unorm(8, 16), void()],
        [X, Y, Z, One],
        Colorspace::Rgb,
    ),
    plain(PixelFormat::L8Unorm, "l8_unorm", 8, [unorm(8, 0), void(), void(), void()], [X, X, X, One], Colorspace::Rgb),
    plain(
        PixelFormat::A8Unorm,
        "a8_unorm",
        8,
        [unorm(8, 0), void(), void(), void()],
        [Zero, Zero, Zero, X],
        Colorspace::Rgb,
    ),
    plain(
        PixelFormat::L8A8Unorm,
        "l8a8_unorm",
        16,
        [unorm(8, 0), unorm(8, 8), void(), void()],
        [X, X, X, Y],
        Colorspace::Rgb,
    ),
    plain(
        PixelFormat::R5G6B5Unorm,
        "r5g6b5_unorm",
        16,
        [unorm(5, 11), unorm(6, 5), unorm(5, 0), void()],
        [X, Y, Z, One],
        Colorspace::Rgb,
    ),
    plain(PixelFormat::R32Float, "r32_float", 32, [float(0), void(), void(), void()], [X, Zero, Zero, One], Colorspace::Rgb),
    plain(
        PixelFormat::Rgba32Float,
        "rgba32_float",
        128,
        [float(0), float(32), float(64), float(96)],
        [X, Y, Z, W],
        Colorspace::Rgb,
    ),
    plain(PixelFormat::Z16Unorm, "z16_unorm", 16, [unorm(16, 0), void(), void(), void()], [X, Zero, Zero, One], Colorspace::Zs),
    plain(PixelFormat::Z32Float, "z32_float", 32, [float(0), void(), void(), void()], [X, Zero, Zero, One], Colorspace::Zs),
    dxt1(PixelFormat::Dxt1Rgb, "dxt1_rgb", [X, Y, Z, One]),
    dxt1(PixelFormat::Dxt1Rgba, "dxt1_rgba", [X, Y, Z, W]),
];

impl FormatDesc {
    pub fn bytes_per_block(&self) -> usize {
        (self.block.bits / 8) as usize
    }

    /// Is every channel stored as 8-bit normalized fixed point?
    ///
    /// Narrower unorm channels are excluded: widening them to 8 bits rounds differently than
    /// dividing by their own maximum.
    pub fn fits_8unorm(&self) -> bool {
        self.layout == FormatLayout::Plain
            && self.colorspace == Colorspace::Rgb
            && self.channels.iter().all(|c| match c.kind {
                ChannelType::Void => true,
                ChannelType::Unorm => c.size == 8,
                ChannelType::Float => false,
            })
    }

    /// Decodes pixel (i, j) of the block starting at `src` into float R, G, B, A.
    pub fn fetch_rgba_float(&self, src: &[u8], i: u32, j: u32) -> [f32; 4] {
        match self.layout {
            FormatLayout::Plain => {
                let word = read_block_word(src, self.bytes_per_block());
                let channels = self.channels.map(|c| match c.kind {
                    ChannelType::Void => 0.0,
                    ChannelType::Unorm => extract_bits(word, c) as f32 / mask_of(c.size) as f32,
                    ChannelType::Float => f32::from_bits(extract_bits(word, c)),
                });
                swizzle_channels(channels, self.swizzle, 0.0, 1.0)
            }
            FormatLayout::S3tc => {
                let rgba = fetch_dxt1(src, i, j);
                let channels = rgba.map(|c| c as f32 / 255.0);
                swizzle_channels(channels, self.swizzle, 0.0, 1.0)
            }
        }
    }

    /// Decodes pixel (i, j) of the block starting at `src` into 8-bit normalized R, G, B, A.
    /// Only meaningful for formats which `fits_8unorm`.
    pub fn fetch_rgba_8unorm(&self, src: &[u8], i: u32, j: u32) -> RGBA {
        let channels = match self.layout {
            FormatLayout::Plain => {
                let word = read_block_word(src, self.bytes_per_block());
                self.channels.map(|c| match c.kind {
                    ChannelType::Unorm => expand_to_8bit(extract_bits(word, c), c.size),
                    _ => 0,
                })
            }
            FormatLayout::S3tc => fetch_dxt1(src, i, j),
        };
        let [r, g, b, a] = swizzle_channels(channels, self.swizzle, 0, 255);
        RGBA::new(r, g, b, a)
    }
}

#[inline(always)]
fn mask_of(size: u32) -> u32 {
    if size >= 32 { u32::MAX } else { (1u32 << size) - 1 }
}

#[inline(always)]
fn read_block_word(src: &[u8], bytes: usize) -> u128 {
    let mut raw = [0u8; 16];
    raw[..bytes].copy_from_slice(&src[..bytes]);
    u128::from_le_bytes(raw)
}

#[inline(always)]
fn extract_bits(word: u128, channel: Channel) -> u32 {
    ((word >> channel.shift) as u32) & mask_of(channel.size)
}

/// Widens an n-bit unorm value to 8 bits by bit replication, so that max maps to 255.
#[inline(always)]
fn expand_to_8bit(value: u32, size: u32) -> u8 {
    match size {
        8 => value as u8,
        0 => 0,
        _ if size >= 4 => ((value << (8 - size)) | (value >> (2 * size - 8))) as u8,
        _ => (value * 255 / mask_of(size)) as u8,
    }
}

fn rgb565_to_rgb8(c: u16) -> [u32; 3] {
    let r = (c >> 11) as u32 & 0x1f;
    let g = (c >> 5) as u32 & 0x3f;
    let b = c as u32 & 0x1f;
    [expand_to_8bit(r, 5) as u32, expand_to_8bit(g, 6) as u32, expand_to_8bit(b, 5) as u32]
}

/// Decodes pixel (i, j) of a BC1 block.
fn fetch_dxt1(src: &[u8], i: u32, j: u32) -> [u8; 4] {
    let c0 = u16::from_le_bytes([src[0], src[1]]);
    let c1 = u16::from_le_bytes([src[2], src[3]]);
    let indices = u32::from_le_bytes([src[4], src[5], src[6], src[7]]);
    let index = (indices >> (2 * (j * 4 + i))) & 3;
    let rgb0 = rgb565_to_rgb8(c0);
    let rgb1 = rgb565_to_rgb8(c1);
    let mix = |w0: u32, w1: u32, d: u32| -> [u8; 4] {
        [
            ((rgb0[0] * w0 + rgb1[0] * w1) / d) as u8,
            ((rgb0[1] * w0 + rgb1[1] * w1) / d) as u8,
            ((rgb0[2] * w0 + rgb1[2] * w1) / d) as u8,
            255,
        ]
    };
    if c0 > c1 {
        match index {
            0 => mix(1, 0, 1),
            1 => mix(0, 1, 1),
            2 => mix(2, 1, 3),
            _ => mix(1, 2, 3),
        }
    } else {
        match index {
            0 => mix(1, 0, 1),
            1 => mix(0, 1, 1),
            2 => mix(1, 1, 2),
            _ => [0, 0, 0, 0],
        }
    }
}
