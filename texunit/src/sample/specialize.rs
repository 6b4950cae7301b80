use super::*;
use crate::math::*;
use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

pub type SampleFunction = fn(&Sampler, &dyn DynamicState, &SampleRequest) -> SampleResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpecializeMode {
    #[default]
    Normal,
    /// Every sampler returns opaque white without reading texture memory.
    Nop,
}

/// Which pipeline a specialized sampler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplePath {
    FixedPoint,
    Float,
    Nop,
}

/// A sampling procedure specialized for one static state.
pub struct Sampler {
    state: StaticSamplerState,
    format: &'static FormatDesc,
    wraps: WrapFunctions,
    aos: Option<AosPipeline>,
    path: SamplePath,
    sample_function: SampleFunction,
}

impl Sampler {
    pub fn new(state: StaticSamplerState, mode: SpecializeMode) -> Self {
        let format = state.format.desc();
        let aos = AosPipeline::new(&state);
        let (path, sample_function): (SamplePath, SampleFunction) = match (mode, aos) {
            (SpecializeMode::Nop, _) => (SamplePath::Nop, noop_sample),
            (SpecializeMode::Normal, Some(_)) => (SamplePath::FixedPoint, sample_aos),
            (SpecializeMode::Normal, None) => {
                if format.fits_8unorm() {
                    warn!(
                        "{}: wrap modes {:?} are not supported by the fixed-point path, using float filtering",
                        format.name,
                        state.active_wrap_modes().as_slice()
                    );
                }
                (SamplePath::Float, sample_soa)
            }
        };
        debug!(
            "specialized {:?} sampler for {} {:?}: min {:?} mag {:?} mip {:?} wrap {:?}",
            path,
            format.name,
            state.target,
            state.min_img_filter,
            state.mag_img_filter,
            state.min_mip_filter,
            state.wrap_modes()
        );
        Self { state, format, wraps: WrapFunctions::new(&state), aos, path, sample_function }
    }

    pub fn state(&self) -> &StaticSamplerState {
        &self.state
    }

    pub fn format(&self) -> &'static FormatDesc {
        self.format
    }

    pub fn path(&self) -> SamplePath {
        self.path
    }

    pub fn sample(&self, dynamic: &dyn DynamicState, request: &SampleRequest) -> SampleResult {
        (self.sample_function)(self, dynamic, request)
    }

    /// Samples many quads in parallel; results are in request order.
    pub fn sample_batch(&self, dynamic: &(dyn DynamicState + Sync), requests: &[SampleRequest]) -> Vec<SampleResult> {
        requests.par_iter().map(|request| self.sample(dynamic, request)).collect()
    }

    /// Shared front end of both pipelines: cube projection, LOD and level selection before
    /// filtering, sampler swizzle and depth compare after.
    fn run(
        &self,
        dynamic: &dyn DynamicState,
        request: &SampleRequest,
        filter: impl FnOnce(&MipViews, &TexCoords, Option<F32x4>) -> [F32x4; 4],
    ) -> SampleResult {
        let state = &self.state;
        let unit = request.unit;
        let zero = F32x4::splat(0.0);

        let mut coords = TexCoords { s: request.coord(0), t: request.coord(1), r: request.coord(2), face: I32x4::splat(0) };
        if state.target == TextureTarget::Cube {
            let cube = cube_lookup(coords.s, coords.t, coords.r);
            coords = TexCoords { s: cube.s, t: cube.t, r: zero, face: cube.face };
        }

        let lod = if state.needs_lod() {
            let (ddx, ddy, explicit_lod) = match request.lod {
                LodInput::Explicit(lod) => ([zero; 3], [zero; 3], Some(lod)),
                // face coordinates have their own derivatives, the direction's are meaningless
                LodInput::Gradients { ddx, ddy } if state.target != TextureTarget::Cube => (ddx, ddy, None),
                _ => {
                    let (ddx, ddy) = quad_gradients(&coords);
                    (ddx, ddy, None)
                }
            };
            Some(lod_selector(
                state,
                dynamic,
                unit,
                &ddx,
                &ddy,
                request.lod_bias,
                explicit_lod,
            ))
        } else {
            None
        };

        let last_level = dynamic.last_level(unit);
        let view = |level| MipLevelView::new(state, dynamic, unit, level);
        let views = match state.min_mip_filter {
            MipFilter::None => {
                let level = if state.target == TextureTarget::Cube {
                    nearest_mip_level(zero, last_level)
                } else {
                    I32x4::splat(0)
                };
                MipViews { level0: view(level), level1: None }
            }
            MipFilter::Nearest => {
                MipViews { level0: view(nearest_mip_level(lod.unwrap_or(zero), last_level)), level1: None }
            }
            MipFilter::Linear => {
                let levels = linear_mip_levels(lod.unwrap_or(zero), last_level);
                MipViews { level0: view(levels.level0), level1: Some((view(levels.level1), levels.weight)) }
            }
        };

        let rgba = filter(&views, &coords, lod);
        let rgba = apply_sampler_swizzle(rgba, state.swizzle);
        SampleResult { rgba: shadow_compare(state, request.coord(2), rgba) }
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler").field("path", &self.path).field("format", &self.format.name).field("state", &self.state).finish()
    }
}

fn quad_gradients(coords: &TexCoords) -> ([F32x4; 3], [F32x4; 3]) {
    let axes = [coords.s, coords.t, coords.r];
    (axes.map(F32x4::quad_ddx), axes.map(F32x4::quad_ddy))
}

fn sample_aos(sampler: &Sampler, dynamic: &dyn DynamicState, request: &SampleRequest) -> SampleResult {
    let Some(pipeline) = &sampler.aos else {
        panic!("fixed-point sampling of {} with wrap modes {:?}", sampler.format.name, sampler.state.wrap_modes());
    };
    sampler.run(dynamic, request, |views, coords, lod| pipeline.sample(&sampler.state, views, coords, lod))
}

fn sample_soa(sampler: &Sampler, dynamic: &dyn DynamicState, request: &SampleRequest) -> SampleResult {
    let border_color = dynamic.border_color(request.unit);
    sampler.run(dynamic, request, |views, coords, lod| {
        filter_soa(&sampler.state, &sampler.wraps, views, border_color, coords, lod)
    })
}

fn noop_sample(_sampler: &Sampler, _dynamic: &dyn DynamicState, _request: &SampleRequest) -> SampleResult {
    SampleResult::splat([1.0; 4])
}

/// Cache of specialized samplers keyed by static state.
pub struct Specializer {
    mode: SpecializeMode,
    cache: RwLock<HashMap<StaticSamplerState, Arc<Sampler>>>,
}

impl Specializer {
    pub fn new(mode: SpecializeMode) -> Self {
        Self { mode, cache: RwLock::new(HashMap::new()) }
    }

    pub fn mode(&self) -> SpecializeMode {
        self.mode
    }

    /// Returns the sampler for `state`, building it on first use.
    /// Concurrent first uses may each build one, but all of them get the first one inserted.
    pub fn specialize(&self, state: &StaticSamplerState) -> Arc<Sampler> {
        if let Some(sampler) = self.cache.read().get(state) {
            trace!("sampler cache hit for {} {:?}", sampler.format.name, state.target);
            return sampler.clone();
        }
        let built = Arc::new(Sampler::new(*state, self.mode));
        self.cache.write().entry(*state).or_insert(built).clone()
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

impl Default for Specializer {
    fn default() -> Self {
        Self::new(SpecializeMode::Normal)
    }
}

static DEFAULT_SPECIALIZER: Lazy<Specializer> = Lazy::new(Specializer::default);

/// The process-wide specializer used by [`sample`].
pub fn default_specializer() -> &'static Specializer {
    &DEFAULT_SPECIALIZER
}

/// Samples one quad with the process-wide specializer.
pub fn sample(state: &StaticSamplerState, dynamic: &dyn DynamicState, request: &SampleRequest) -> SampleResult {
    default_specializer().specialize(state).sample(dynamic, request)
}
