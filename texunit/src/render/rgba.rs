use bytemuck::{Pod, Zeroable};

/// 8-bit normalized color, laid out as R, G, B, A bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Zeroable, Pod)]
pub struct RGBA {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RGBA {
    pub const BLACK: RGBA = RGBA::new(0, 0, 0, 255);
    pub const WHITE: RGBA = RGBA::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_u32(&self) -> u32 {
        bytemuck::cast(*self)
    }

    pub fn from_u32(packed: u32) -> Self {
        bytemuck::cast(packed)
    }

    pub fn to_f32(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c as f32 / 255.0)
    }
}
