pub mod rgba;
pub mod texture;

pub use rgba::*;
pub use texture::*;
