use log::info;
use rayon::prelude::*;
use texunit::TextureError;
use texunit::math::*;
use texunit::render::*;
use texunit::sample::*;

const PANEL: usize = 256;
const PANELS: usize = 3;
const HORIZON: f32 = 48.0;
const SKY: RGBA = RGBA::new(120, 170, 220, 255);

fn checkerboard(size: u32, checks: u32) -> image::RgbaImage {
    let cell = (size / checks).max(1);
    image::RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { image::Rgba([230, 230, 230, 255]) } else { image::Rgba([40, 60, 160, 255]) }
    })
}

/// Texture coordinates of the ground plane under pixel (x, y) of a panel.
fn plane_coords(x: f32, y: f32) -> (f32, f32) {
    let depth = PANEL as f32 / (y - HORIZON).max(0.5);
    let u = (x - PANEL as f32 * 0.5) * depth / PANEL as f32;
    (u * 0.25, depth * 0.25)
}

struct Panel {
    name: &'static str,
    units: TextureUnits,
    sampler: std::sync::Arc<Sampler>,
}

impl Panel {
    fn new(name: &'static str, texture: &std::sync::Arc<Texture>, filter: ImgFilter, mip_filter: MipFilter) -> Result<Self, TextureError> {
        let desc = SamplerDesc { min_img_filter: filter, mag_img_filter: filter, min_mip_filter: mip_filter, ..Default::default() };
        let binding = TextureBinding::new(texture.clone(), &desc);
        let sampler = default_specializer().specialize(&binding.static_state(&desc));
        let mut units = TextureUnits::new();
        units.bind(0, binding)?;
        Ok(Self { name, units, sampler })
    }

    /// Shades rows `y` and `y + 1` of this panel, one quad at a time.
    fn render_rows(&self, index: usize, y: usize, rows: &mut [u8]) {
        let row_bytes = PANEL * PANELS * 4;
        for x in (0..PANEL).step_by(2) {
            let mut s = [0.0; LANES];
            let mut t = [0.0; LANES];
            for lane in 0..LANES {
                let (u, v) = plane_coords((x + lane % 2) as f32 + 0.5, (y + lane / 2) as f32 + 0.5);
                s[lane] = u;
                t[lane] = v;
            }
            let request = SampleRequest::new(0, &[F32x4::load(s), F32x4::load(t)]);
            let result = self.sampler.sample(&self.units, &request);
            for lane in 0..LANES {
                let (dx, dy) = (lane % 2, lane / 2);
                let color = if ((y + dy) as f32 + 0.5) < HORIZON { SKY } else { result.lane_rgba8(lane) };
                let offset = dy * row_bytes + ((index * PANEL + x + dx) * 4);
                rows[offset..offset + 4].copy_from_slice(bytemuck::bytes_of(&color));
            }
        }
    }
}

fn main() -> Result<(), TextureError> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "filters.png".to_string());
    let image = match args.next() {
        Some(path) => texunit::render::load_rgba_image(path)?,
        None => checkerboard(256, 16),
    };

    let texture = Texture::new(&TextureSource::from_rgba_image(&image))?;
    info!("texture {}x{} with {} mip levels", image.width(), image.height(), texture.level_count());

    let panels = [
        Panel::new("nearest", &texture, ImgFilter::Nearest, MipFilter::None)?,
        Panel::new("bilinear", &texture, ImgFilter::Linear, MipFilter::None)?,
        Panel::new("trilinear", &texture, ImgFilter::Linear, MipFilter::Linear)?,
    ];
    for panel in &panels {
        info!("{}: {:?} path", panel.name, panel.sampler.path());
    }

    let row_bytes = PANEL * PANELS * 4;
    let mut pixels = vec![0u8; row_bytes * PANEL];
    let start = std::time::Instant::now();
    pixels.par_chunks_mut(row_bytes * 2).enumerate().for_each(|(pair, rows)| {
        for (index, panel) in panels.iter().enumerate() {
            panel.render_rows(index, pair * 2, rows);
        }
    });
    info!("rendered {}x{} in {:?}", PANEL * PANELS, PANEL, start.elapsed());

    image::save_buffer(&output, &pixels, (PANEL * PANELS) as u32, PANEL as u32, image::ExtendedColorType::Rgba8)?;
    info!("wrote {}", output);
    Ok(())
}
