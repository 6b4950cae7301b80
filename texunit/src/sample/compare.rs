use super::*;
use crate::math::*;

/// Per-lane `reference FUNC value`.
pub fn compare_mask(func: CompareFunc, reference: F32x4, value: F32x4) -> Mask4 {
    match func {
        CompareFunc::Never => Mask4::splat(false),
        CompareFunc::Less => reference.cmp_lt(value),
        CompareFunc::Equal => reference.cmp_eq(value),
        CompareFunc::LEqual => reference.cmp_le(value),
        CompareFunc::Greater => reference.cmp_gt(value),
        CompareFunc::NotEqual => reference.cmp_ne(value),
        CompareFunc::GEqual => reference.cmp_ge(value),
        CompareFunc::Always => Mask4::splat(true),
    }
}

/// Replaces the sampled color with the shadow test result, broadcast as luminance.
/// The test compares the reference against the R channel; alpha is always 1.
pub fn shadow_compare(state: &StaticSamplerState, reference: F32x4, texel: [F32x4; 4]) -> [F32x4; 4] {
    if state.compare_mode == CompareMode::None {
        return texel;
    }
    let one = F32x4::splat(1.0);
    let passed = compare_mask(state.compare_func, reference, texel[0]).select(one, F32x4::splat(0.0));
    [passed, passed, passed, one]
}
