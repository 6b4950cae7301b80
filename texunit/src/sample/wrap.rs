use super::*;
use crate::math::*;

/// Wrapped integer coordinates of the two texels straddling a sample position along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrappedLinear {
    pub coord0: I32x4,
    pub coord1: I32x4,
    /// Blend weight of `coord1`, in [0, 1).
    pub weight: F32x4,
}

/// Wraps a coordinate for nearest filtering: (coord, axis length, is_pot, normalized) -> texel index.
pub type WrapNearestFn = fn(F32x4, I32x4, bool, bool) -> I32x4;

/// Wraps a coordinate for linear filtering: (coord, axis length, is_pot, normalized) -> texel pair.
pub type WrapLinearFn = fn(F32x4, I32x4, bool, bool) -> WrappedLinear;

const REPEAT: u8 = WrapMode::Repeat as u8;
const CLAMP: u8 = WrapMode::Clamp as u8;
const CLAMP_TO_EDGE: u8 = WrapMode::ClampToEdge as u8;
const CLAMP_TO_BORDER: u8 = WrapMode::ClampToBorder as u8;
const MIRROR_REPEAT: u8 = WrapMode::MirrorRepeat as u8;
const MIRROR_CLAMP: u8 = WrapMode::MirrorClamp as u8;
const MIRROR_CLAMP_TO_EDGE: u8 = WrapMode::MirrorClampToEdge as u8;
const MIRROR_CLAMP_TO_BORDER: u8 = WrapMode::MirrorClampToBorder as u8;

/// Multiple of the axis length added before the modulo in non-power-of-two repeat, so that
/// coordinates down to about -1024 periods wrap correctly.
pub const REPEAT_BIAS_PERIODS: i32 = 1024;

pub fn wrap_nearest_fn(mode: WrapMode) -> WrapNearestFn {
    match mode {
        WrapMode::Repeat => wrap_nearest::<REPEAT>,
        WrapMode::Clamp => wrap_nearest::<CLAMP>,
        WrapMode::ClampToEdge => wrap_nearest::<CLAMP_TO_EDGE>,
        WrapMode::ClampToBorder => wrap_nearest::<CLAMP_TO_BORDER>,
        WrapMode::MirrorRepeat => wrap_nearest::<MIRROR_REPEAT>,
        WrapMode::MirrorClamp => wrap_nearest::<MIRROR_CLAMP>,
        WrapMode::MirrorClampToEdge => wrap_nearest::<MIRROR_CLAMP_TO_EDGE>,
        WrapMode::MirrorClampToBorder => wrap_nearest::<MIRROR_CLAMP_TO_BORDER>,
    }
}

pub fn wrap_linear_fn(mode: WrapMode) -> WrapLinearFn {
    match mode {
        WrapMode::Repeat => wrap_linear::<REPEAT>,
        WrapMode::Clamp => wrap_linear::<CLAMP>,
        WrapMode::ClampToEdge => wrap_linear::<CLAMP_TO_EDGE>,
        WrapMode::ClampToBorder => wrap_linear::<CLAMP_TO_BORDER>,
        WrapMode::MirrorRepeat => wrap_linear::<MIRROR_REPEAT>,
        WrapMode::MirrorClamp => wrap_linear::<MIRROR_CLAMP>,
        WrapMode::MirrorClampToEdge => wrap_linear::<MIRROR_CLAMP_TO_EDGE>,
        WrapMode::MirrorClampToBorder => wrap_linear::<MIRROR_CLAMP_TO_BORDER>,
    }
}

/// Wrap functions of the three axes, resolved once per static state.
#[derive(Debug, Clone, Copy)]
pub struct WrapFunctions {
    pub nearest: [WrapNearestFn; 3],
    pub linear: [WrapLinearFn; 3],
}

impl WrapFunctions {
    pub fn new(state: &StaticSamplerState) -> Self {
        let modes = state.wrap_modes();
        Self { nearest: modes.map(wrap_nearest_fn), linear: modes.map(wrap_linear_fn) }
    }
}

/// Repeat-wraps integer texel coordinates into [0, length - 1].
#[inline(always)]
pub fn repeat_int(coord: I32x4, length: I32x4, is_pot: bool) -> I32x4 {
    if is_pot {
        coord & (length - I32x4::splat(1))
    } else {
        let bias = length * I32x4::splat(REPEAT_BIAS_PERIODS);
        (coord + bias).zip(length, |c, l| ((c as u32) % (l as u32)) as i32)
    }
}

/// Ping-pong fold of normalized coordinates: [0,1] maps to itself, [1,2] back onto [1,0], etc.
#[inline(always)]
pub fn coord_mirror(coord: F32x4) -> F32x4 {
    let fract = coord.fract();
    let is_odd = coord.ifloor() & I32x4::splat(1);
    let signed = is_odd.cmp_ne(I32x4::splat(0)).select(-fract, fract);
    signed + is_odd.to_f32()
}

fn wrap_nearest<const MODE: u8>(coord: F32x4, length: I32x4, is_pot: bool, normalized: bool) -> I32x4 {
    let length_f = length.to_f32();
    let zero = I32x4::splat(0);
    let length_minus_one = length - I32x4::splat(1);
    let scale = |c: F32x4| if normalized { c * length_f } else { c };
    match MODE {
        REPEAT => repeat_int(scale(coord).ifloor(), length, is_pot),
        CLAMP | CLAMP_TO_EDGE => scale(coord).ifloor().clamp(zero, length_minus_one),
        CLAMP_TO_BORDER => scale(coord).ifloor().clamp(I32x4::splat(-1), length),
        MIRROR_REPEAT => {
            let unit = if normalized { coord } else { coord / length_f };
            (coord_mirror(unit) * length_f).ifloor().clamp(zero, length_minus_one)
        }
        MIRROR_CLAMP | MIRROR_CLAMP_TO_EDGE => scale(coord.abs()).ifloor().clamp(zero, length_minus_one),
        MIRROR_CLAMP_TO_BORDER => scale(coord.abs()).ifloor().clamp(zero, length),
        _ => unreachable!("unexpected wrap mode {}", MODE),
    }
}

fn wrap_linear<const MODE: u8>(coord: F32x4, length: I32x4, is_pot: bool, normalized: bool) -> WrappedLinear {
    let length_f = length.to_f32();
    let zero = I32x4::splat(0);
    let one = I32x4::splat(1);
    let half = F32x4::splat(0.5);
    let length_minus_one = length - one;
    let scale = |c: F32x4| if normalized { c * length_f } else { c };
    let split = |c: F32x4| {
        let coord0 = c.ifloor();
        WrappedLinear { coord0, coord1: coord0 + one, weight: c.fract() }
    };
    match MODE {
        REPEAT => {
            let w = split(scale(coord) - half);
            WrappedLinear {
                coord0: repeat_int(w.coord0, length, is_pot),
                coord1: repeat_int(w.coord1, length, is_pot),
                weight: w.weight,
            }
        }
        CLAMP => split(scale(coord).clamp(F32x4::splat(0.0), length_f) - half),
        CLAMP_TO_EDGE => {
            let w = split(scale(coord).clamp(F32x4::splat(0.0), length_f) - half);
            WrappedLinear {
                coord0: w.coord0.clamp(zero, length_minus_one),
                coord1: w.coord1.clamp(zero, length_minus_one),
                weight: w.weight,
            }
        }
        CLAMP_TO_BORDER => split(scale(coord).clamp(-half, length_f + half) - half),
        MIRROR_REPEAT => {
            let unit = if normalized { coord } else { coord / length_f };
            let w = split(coord_mirror(unit) * length_f - half);
            WrappedLinear {
                coord0: w.coord0.clamp(zero, length_minus_one),
                coord1: w.coord1.clamp(zero, length_minus_one),
                weight: w.weight,
            }
        }
        MIRROR_CLAMP => split(scale(coord.abs()).min(length_f) - half),
        MIRROR_CLAMP_TO_EDGE => {
            let w = split(scale(coord.abs()).clamp(half, length_f - half) - half);
            // at the far edge coord0 == length - 1 with zero weight, keep coord1 inside as well
            WrappedLinear { coord0: w.coord0, coord1: w.coord1.min(length_minus_one), weight: w.weight }
        }
        MIRROR_CLAMP_TO_BORDER => split(scale(coord.abs()).clamp(-half, length_f + half) - half),
        _ => unreachable!("unexpected wrap mode {}", MODE),
    }
}
