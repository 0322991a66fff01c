use std::ops::*;
use std::fmt;
use crate::core::math::Float;
use super::Vector2;

pub type Point2f = Point2<Float>;

/// Representation of a 2D point.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[repr(C)]
pub struct Point2<T> {
    pub x: T,
    pub y: T
}

impl<T> Point2<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Point2<T> {
        Point2::<T>{x, y}
    }

    #[inline]
    pub fn zero() -> Point2<T>
    where
    T: num::Zero
    {
        Point2::<T>{x: T::zero(), y: T::zero()}
    }

    /// Returns a component wise minimum.
    #[inline]
    pub fn min(&self, other: &Point2<T>) -> Point2<T>
    where
    T: Copy + PartialOrd
    {
        Point2::<T>{
            x: if self.x < other.x { self.x } else { other.x },
            y: if self.y < other.y { self.y } else { other.y }
        }
    }

    /// Returns a component wise maximum.
    #[inline]
    pub fn max(&self, other: &Point2<T>) -> Point2<T>
    where
    T: Copy + PartialOrd
    {
        Point2::<T>{
            x: if self.x > other.x { self.x } else { other.x },
            y: if self.y > other.y { self.y } else { other.y }
        }
    }
}

impl<T> Add<Vector2<T>> for Point2<T>
where
T: Add<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn add(self, rhs: Vector2<T>) -> Self {
        Point2::<T>{
            x: self.x + rhs.x,
            y: self.y + rhs.y
        }
    }
}

impl<T> Sub<Point2<T>> for Point2<T>
where
T: Sub<T, Output = T>
{
    type Output = Vector2<T>;
    #[inline]
    fn sub(self, rhs: Self) -> Vector2<T> {
        Vector2::<T>{
            x: self.x - rhs.x,
            y: self.y - rhs.y
        }
    }
}

impl<T> Sub<Vector2<T>> for Point2<T>
where
T: Sub<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Vector2<T>) -> Self {
        Point2::<T>{
            x: self.x - rhs.x,
            y: self.y - rhs.y
        }
    }
}

impl<T> Sub<T> for Point2<T>
where
T: Copy + Sub<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn sub(self, rhs: T) -> Self {
        Point2::<T>{
            x: self.x - rhs,
            y: self.y - rhs
        }
    }
}

impl<T> Add<T> for Point2<T>
where
T: Copy + Add<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn add(self, rhs: T) -> Self {
        Point2::<T>{
            x: self.x + rhs,
            y: self.y + rhs
        }
    }
}

impl<T> Mul<T> for Point2<T>
where
T: Copy + Mul<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Point2::<T>{
            x: self.x * rhs,
            y: self.y * rhs
        }
    }
}

reverse_mul_scalar!(Point2, {x, y});

impl<T> fmt::Display for Point2<T>
where
T: fmt::Display
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
