use crate::sample::{PixelFormat, TextureTarget};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Texture extent {width}x{height}x{depth} has a zero dimension")]
    ZeroExtent { width: u32, height: u32, depth: u32 },
    #[error("Extent {width}x{height}x{depth} is not valid for a {target:?} texture")]
    InvalidExtent { target: TextureTarget, width: u32, height: u32, depth: u32 },
    #[error("Level {level} needs {expected} bytes of texel data, got {actual}")]
    DataSize { level: usize, expected: usize, actual: usize },
    #[error("{count} mip levels requested, at most {max} fit this texture")]
    TooManyLevels { count: usize, max: usize },
    #[error("Mipmap generation is not supported for {0:?}")]
    MipGenerationUnsupported(PixelFormat),
    #[error("Rect textures cannot have mip levels")]
    MipmappedRect,
    #[error("Texture unit {unit} is out of range, only {max} units exist")]
    UnitOutOfRange { unit: usize, max: usize },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
