/// Number of parallel lanes processed by one sampling call: a single 2x2 quad.
/// Lanes are laid out as [top-left, top-right, bottom-left, bottom-right].
pub const LANES: usize = 4;

/// Fixed-width vector holding one value per lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneVector<T>(pub [T; LANES]);

pub type F32x4 = LaneVector<f32>;
pub type I32x4 = LaneVector<i32>;
pub type Mask4 = LaneVector<bool>;

impl<T: Copy> LaneVector<T> {
    /// Construct from array
    #[inline(always)]
    pub fn load(values: [T; LANES]) -> Self {
        Self(values)
    }

    /// Store back into array
    #[inline(always)]
    pub fn store(self) -> [T; LANES] {
        self.0
    }

    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self([value; LANES])
    }

    #[inline(always)]
    pub fn lane(self, index: usize) -> T {
        self.0[index]
    }

    #[inline(always)]
    pub fn map<U: Copy>(self, f: impl Fn(T) -> U) -> LaneVector<U> {
        LaneVector(self.0.map(f))
    }

    #[inline(always)]
    pub fn zip<U: Copy, R: Copy>(self, other: LaneVector<U>, f: impl Fn(T, U) -> R) -> LaneVector<R> {
        LaneVector(std::array::from_fn(|i| f(self.0[i], other.0[i])))
    }
}

impl<T: Copy + Default> Default for LaneVector<T> {
    fn default() -> Self {
        Self([T::default(); LANES])
    }
}

impl<T: Copy + PartialOrd> LaneVector<T> {
    #[inline(always)]
    pub fn cmp_lt(self, other: Self) -> Mask4 {
        self.zip(other, |a, b| a < b)
    }

    #[inline(always)]
    pub fn cmp_le(self, other: Self) -> Mask4 {
        self.zip(other, |a, b| a <= b)
    }

    #[inline(always)]
    pub fn cmp_gt(self, other: Self) -> Mask4 {
        self.zip(other, |a, b| a > b)
    }

    #[inline(always)]
    pub fn cmp_ge(self, other: Self) -> Mask4 {
        self.zip(other, |a, b| a >= b)
    }

    #[inline(always)]
    pub fn cmp_eq(self, other: Self) -> Mask4 {
        self.zip(other, |a, b| a == b)
    }

    #[inline(always)]
    pub fn cmp_ne(self, other: Self) -> Mask4 {
        self.zip(other, |a, b| a != b)
    }
}

impl Mask4 {
    /// Per-lane `mask ? one : zero`.
    #[inline(always)]
    pub fn select<T: Copy>(self, one: LaneVector<T>, zero: LaneVector<T>) -> LaneVector<T> {
        LaneVector(std::array::from_fn(|i| if self.0[i] { one.0[i] } else { zero.0[i] }))
    }

    #[inline(always)]
    pub fn any(self) -> bool {
        self.0.iter().any(|&b| b)
    }

    #[inline(always)]
    pub fn all(self) -> bool {
        self.0.iter().all(|&b| b)
    }
}

impl F32x4 {
    #[inline(always)]
    pub fn floor(self) -> Self {
        self.map(f32::floor)
    }

    /// x - floor(x), always in [0, 1)
    #[inline(always)]
    pub fn fract(self) -> Self {
        self.map(|x| x - x.floor())
    }

    #[inline(always)]
    pub fn abs(self) -> Self {
        self.map(f32::abs)
    }

    #[inline(always)]
    pub fn round(self) -> Self {
        self.map(f32::round)
    }

    #[inline(always)]
    pub fn log2(self) -> Self {
        self.map(f32::log2)
    }

    /// NaN-ignoring minimum, like `f32::min`.
    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        self.zip(other, f32::min)
    }

    /// NaN-ignoring maximum, like `f32::max`.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        self.zip(other, f32::max)
    }

    /// Clamps to [lo, hi]. Unlike `f32::clamp` this never panics: with lo > hi, hi wins.
    #[inline(always)]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// floor() converted to integers, saturating out-of-range values.
    #[inline(always)]
    pub fn ifloor(self) -> I32x4 {
        self.map(|x| x.floor() as i32)
    }

    /// Screen-space x derivative of a quad, broadcast to all lanes.
    #[inline(always)]
    pub fn quad_ddx(self) -> Self {
        Self::splat(self.0[1] - self.0[0])
    }

    /// Screen-space y derivative of a quad, broadcast to all lanes.
    #[inline(always)]
    pub fn quad_ddy(self) -> Self {
        Self::splat(self.0[2] - self.0[0])
    }
}

impl I32x4 {
    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        self.zip(other, i32::min)
    }

    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        self.zip(other, i32::max)
    }

    /// Clamps to [lo, hi]; with lo > hi, hi wins.
    #[inline(always)]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        self.map(|x| x as f32)
    }
}

macro_rules! impl_float_ops {
    ($t:ty) => {
        // LaneVector + LaneVector
        impl std::ops::Add for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self {
                self.zip(other, |a, b| a + b)
            }
        }

        // LaneVector - LaneVector
        impl std::ops::Sub for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                self.zip(other, |a, b| a - b)
            }
        }

        // LaneVector * LaneVector
        impl std::ops::Mul for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn mul(self, other: Self) -> Self {
                self.zip(other, |a, b| a * b)
            }
        }

        // LaneVector / LaneVector
        impl std::ops::Div for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn div(self, other: Self) -> Self {
                self.zip(other, |a, b| a / b)
            }
        }

        // -LaneVector
        impl std::ops::Neg for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self {
                self.map(|a| -a)
            }
        }
    };
}

// Integer lanes wrap on overflow: out-of-contract coordinates may produce garbage, never a panic.
macro_rules! impl_int_ops {
    ($t:ty) => {
        // LaneVector + LaneVector
        impl std::ops::Add for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self {
                self.zip(other, <$t>::wrapping_add)
            }
        }

        // LaneVector - LaneVector
        impl std::ops::Sub for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                self.zip(other, <$t>::wrapping_sub)
            }
        }

        // LaneVector * LaneVector
        impl std::ops::Mul for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn mul(self, other: Self) -> Self {
                self.zip(other, <$t>::wrapping_mul)
            }
        }

        // LaneVector & LaneVector
        impl std::ops::BitAnd for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn bitand(self, other: Self) -> Self {
                self.zip(other, |a, b| a & b)
            }
        }

        // LaneVector | LaneVector
        impl std::ops::BitOr for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn bitor(self, other: Self) -> Self {
                self.zip(other, |a, b| a | b)
            }
        }

        // LaneVector >> u32
        impl std::ops::Shr<u32> for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn shr(self, amount: u32) -> Self {
                self.map(|a| a >> amount)
            }
        }

        // LaneVector << u32
        impl std::ops::Shl<u32> for LaneVector<$t> {
            type Output = Self;
            #[inline(always)]
            fn shl(self, amount: u32) -> Self {
                self.map(|a| a.wrapping_shl(amount))
            }
        }
    };
}

impl_float_ops!(f32);
impl_int_ops!(i32);

// Mask4 | Mask4
impl std::ops::BitOr for Mask4 {
    type Output = Mask4;
    #[inline(always)]
    fn bitor(self, other: Mask4) -> Mask4 {
        self.zip(other, |a, b| a | b)
    }
}

// Mask4 & Mask4
impl std::ops::BitAnd for Mask4 {
    type Output = Mask4;
    #[inline(always)]
    fn bitand(self, other: Mask4) -> Mask4 {
        self.zip(other, |a, b| a & b)
    }
}

// !Mask4
impl std::ops::Not for Mask4 {
    type Output = Mask4;
    #[inline(always)]
    fn not(self) -> Mask4 {
        self.map(|a| !a)
    }
}
