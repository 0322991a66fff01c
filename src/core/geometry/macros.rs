//! Utility macros used across the geometry types.

/// Scalar-on-the-left multiplication for a generic type.
macro_rules! reverse_mul {
    ($T:ident, { $($field:ident),+ }, $U:ty) => {
        impl Mul<$T<$U>> for $U {
            type Output = $T<$U>;
            #[inline]
            fn mul(self, rhs: $T<$U>) -> Self::Output {
                $T::new($(rhs.$field * self),+)
            }
        }
    };
}

macro_rules! reverse_mul_scalar {
    ($T:ident, { $($field:ident),+ }) => {
        reverse_mul!($T, {$($field),+}, f32);
        reverse_mul!($T, {$($field),+}, f64);
    };
}
