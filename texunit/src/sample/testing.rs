use super::DynamicState;

/// Single-unit dynamic state with every level backed by the same storage.
pub struct FakeDynamic {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub last_level: u32,
    pub row_stride: usize,
    pub img_stride: usize,
    pub data: Vec<u8>,
    pub min_lod: f32,
    pub max_lod: f32,
    pub lod_bias: f32,
    pub border_color: [f32; 4],
}

impl FakeDynamic {
    pub fn new(width: u32, height: u32, depth: u32, last_level: u32) -> Self {
        Self {
            width,
            height,
            depth,
            last_level,
            row_stride: 0,
            img_stride: 0,
            data: Vec::new(),
            min_lod: 0.0,
            max_lod: 1000.0,
            lod_bias: 0.0,
            border_color: [0.0; 4],
        }
    }

    /// Tightly packed 4-byte texels.
    pub fn with_rgba8(width: u32, height: u32, texels: &[[u8; 4]]) -> Self {
        let mut fake = Self::new(width, height, 1, 0);
        fake.row_stride = width as usize * 4;
        fake.img_stride = fake.row_stride * height as usize;
        fake.data = texels.iter().flatten().copied().collect();
        fake
    }
}

impl DynamicState for FakeDynamic {
    fn width(&self, _unit: usize) -> u32 {
        self.width
    }

    fn height(&self, _unit: usize) -> u32 {
        self.height
    }

    fn depth(&self, _unit: usize) -> u32 {
        self.depth
    }

    fn last_level(&self, _unit: usize) -> u32 {
        self.last_level
    }

    fn row_stride(&self, _unit: usize, _level: usize) -> usize {
        self.row_stride
    }

    fn img_stride(&self, _unit: usize, _level: usize) -> usize {
        self.img_stride
    }

    fn data_ptr(&self, _unit: usize, _level: usize) -> &[u8] {
        &self.data
    }

    fn min_lod(&self, _unit: usize) -> f32 {
        self.min_lod
    }

    fn max_lod(&self, _unit: usize) -> f32 {
        self.max_lod
    }

    fn lod_bias(&self, _unit: usize) -> f32 {
        self.lod_bias
    }

    fn border_color(&self, _unit: usize) -> [f32; 4] {
        self.border_color
    }
}
