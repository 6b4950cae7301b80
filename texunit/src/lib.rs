pub mod error;
pub mod math;
pub mod render;
pub mod sample;

pub use error::TextureError;
