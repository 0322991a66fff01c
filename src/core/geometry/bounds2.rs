use num;
use std::fmt;
use crate::core::math::{lerp, Float};
use super::{Point2, Vector2};

pub type Bounds2f = Bounds2<Float>;

/// An axis aligned 2D bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(C)]
pub struct Bounds2<T> {
    pub min: Point2<T>,
    pub max: Point2<T>
}

impl<T> Bounds2<T> {
    pub fn new(min: Point2<T>, max: Point2<T>) -> Self
    where
    T: Copy + PartialOrd
    {
        Bounds2::<T>{
            min: min.min(&max),
            max: min.max(&max)
        }
    }

    /// Creates a Bounds2 that encompasses a single point.
    pub fn from_point(p: Point2<T>) -> Bounds2<T>
    where
    T: Copy
    {
        Bounds2::<T>{
            min: p,
            max: p
        }
    }

    /// Returns the bounding box that encompasses two boxes.
    pub fn union(&self, b: &Bounds2<T>) -> Bounds2<T>
    where
    T: Copy + PartialOrd
    {
        Bounds2::<T>{
            min: self.min.min(&b.min),
            max: self.max.max(&b.max)
        }
    }

    /// Returns the bounding box that encompasses this box and the given point.
    pub fn union_point(&self, p: &Point2<T>) -> Bounds2<T>
    where
    T: Copy + PartialOrd
    {
        Bounds2::<T>{
            min: self.min.min(p),
            max: self.max.max(p)
        }
    }

    /// Test if a point is inside this box, boundary included.
    pub fn inside(&self, p: &Point2<T>) -> bool
    where
    T: PartialOrd
    {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y
    }

    /// The vector along the box diagonal.
    pub fn diagonal(&self) -> Vector2<T>
    where
    T: Copy + std::ops::Sub<Output = T>
    {
        self.max - self.min
    }

    /// Returns the area of the box.
    pub fn area(&self) -> T
    where
    T: Copy + std::ops::Sub<Output = T> + std::ops::Mul<Output = T>
    {
        let d = self.max - self.min;
        d.x * d.y
    }

    /// Linearly interpolates between the corners of the box by the given
    /// amount in each dimension.
    pub fn lerp(&self, t: &Point2<T>) -> Point2<T>
    where
    T: num::One + Copy + std::ops::Add<Output = T> + std::ops::Sub<Output = T> + std::ops::Mul<Output = T>
    {
        Point2::<T>{
            x: lerp(t.x, self.min.x, self.max.x),
            y: lerp(t.y, self.min.y, self.max.y)
        }
    }

    /// Pad the box by a constant amount on every side.
    pub fn expand(&self, delta: T) -> Bounds2<T>
    where
    T: Copy + std::ops::Sub<Output = T> + std::ops::Add<Output = T>
    {
        Bounds2::<T>{
            min: self.min - delta,
            max: self.max + delta
        }
    }
}

impl<T> Default for Bounds2<T>
where
T: num::Bounded
{
    /// An empty box, with min and max inverted so that any union fixes it.
    fn default() -> Bounds2<T> {
        Bounds2::<T>{
            min: Point2::<T>::new(T::max_value(), T::max_value()),
            max: Point2::<T>::new(T::min_value(), T::min_value())
        }
    }
}

impl<T> fmt::Display for Bounds2<T>
where
T: fmt::Display
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {} - {} ]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point2f;

    #[test]
    fn default_is_empty_and_union_repairs_it() {
        let empty = Bounds2f::default();
        assert!(!empty.inside(&Point2f::new(0.0, 0.0)));
        let b = empty.union_point(&Point2f::new(1.0, -2.0));
        assert_eq!(b.min, Point2f::new(1.0, -2.0));
        assert_eq!(b.max, Point2f::new(1.0, -2.0));
    }

    #[test]
    fn lerp_hits_corners_and_center() {
        let b = Bounds2f::new(Point2f::new(-1.0, -2.0), Point2f::new(3.0, 2.0));
        assert_eq!(b.lerp(&Point2f::new(0.0, 0.0)), Point2f::new(-1.0, -2.0));
        assert_eq!(b.lerp(&Point2f::new(1.0, 1.0)), Point2f::new(3.0, 2.0));
        assert_eq!(b.lerp(&Point2f::new(0.5, 0.5)), Point2f::new(1.0, 0.0));
    }

    #[test]
    fn area_and_expand() {
        let b = Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(2.0, 3.0));
        assert_eq!(b.area(), 6.0);
        let e = b.expand(1.0);
        assert_eq!(e.min, Point2f::new(-1.0, -1.0));
        assert_eq!(e.max, Point2f::new(3.0, 4.0));
    }
}
