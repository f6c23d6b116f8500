//! Type-safe coordinate spaces for the player surface.
//!
//! ```text
//! ContainerSpace → FrameSpace → NormalizedPosition (percent)
//! ```
//!
//! `ContainerSpace` is the player box as laid out by the page, `(0, 0)` at its
//! top-left. `FrameSpace` is the sub-rectangle that actually shows decoded
//! video pixels once `object-fit: contain` has added letterbox or pillarbox
//! bars, `(0, 0)` at the top-left of the visible frame.
//!
//! Each space is a phantom type so a pointer position can't be handed to code
//! that expects frame-relative pixels without going through the mapper.

use std::marker::PhantomData;

/// Coordinates relative to the player container.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct ContainerSpace;

/// Coordinates relative to the visible video frame inside the container.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct FrameSpace;

/// A point in one coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Pointer events can carry NaN when the layout collapses.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Width and height in one coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size<TSpace> {
    pub width: f64,
    pub height: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Size<TSpace> {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            _space: PhantomData,
        }
    }

    pub fn from_u32(width: u32, height: u32) -> Self {
        Self::new(f64::from(width), f64::from(height))
    }

    /// Both sides finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width over height. Only meaningful when [`Size::is_usable`].
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Axis-aligned box in one coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect<TSpace> {
    pub origin: Coord<TSpace>,
    pub size: Size<TSpace>,
}

impl<TSpace> Rect<TSpace> {
    pub fn from_coords(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Coord::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Interior test; a point on an edge is outside.
    pub fn contains_strict(&self, point: Coord<TSpace>) -> bool {
        point.x > self.origin.x
            && point.x < self.right()
            && point.y > self.origin.y
            && point.y < self.bottom()
    }
}

// Container → frame is a pure translation; scaling to percent happens in the mapper.
impl Coord<ContainerSpace> {
    pub fn to_frame_space(&self, frame: &Rect<ContainerSpace>) -> Coord<FrameSpace> {
        Coord::new(self.x - frame.origin.x, self.y - frame.origin.y)
    }
}

impl Coord<FrameSpace> {
    pub fn to_container_space(&self, frame: &Rect<ContainerSpace>) -> Coord<ContainerSpace> {
        Coord::new(self.x + frame.origin.x, self.y + frame.origin.y)
    }
}
