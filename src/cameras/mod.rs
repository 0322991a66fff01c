//! Camera models mapping film samples to world-space rays.
use std::fmt;
use crate::core::math::Float;
use crate::core::geometry::{Point2f, Ray};

pub mod environment;
pub use environment::*;
pub mod orthographic;
pub use orthographic::*;
pub mod pinhole;
pub use pinhole::*;
pub mod realistic;
pub use realistic::*;

/// A film/lens/time sample in the canonical unit cube. The camera maps it
/// to physical quantities: `p_film` spans the film plane, `p_lens` selects
/// a point on the lens, `time` interpolates the shutter interval.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct CameraSample {
    pub p_film: Point2f,
    pub p_lens: Point2f,
    pub time: Float
}

impl fmt::Display for CameraSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ p_film: {}, p_lens: {}, time {} ]", self.p_film, self.p_lens, self.time)
    }
}

/// The contract shared by every camera model: turn a [`CameraSample`] into
/// a world-space ray and its radiometric weight. A weight of zero means
/// the sample contributes nothing and the ray must be skipped.
///
/// Cameras are immutable once constructed; `generate_ray` may be invoked
/// from many render threads concurrently.
pub trait Camera: Send + Sync {
    fn shutter_open(&self) -> Float;

    fn shutter_close(&self) -> Float;

    fn generate_ray(&self, sample: &CameraSample) -> (Float, Ray);
}
