//! 2D box workspace with axis-aligned obstacles.

use kp_core::{Point2, Real};
use nalgebra::Rotation2;

/// A rectangle of half-size `half_extents` centred at `center` and rotated by `rotation`.
#[derive(Clone, Debug, PartialEq)]
pub struct OrientedBox {
    pub center: Point2,
    pub rotation: Rotation2<Real>,
    pub half_extents: Point2,
}

impl OrientedBox {
    pub fn new(center: Point2, angle: Real, half_extents: Point2) -> Self {
        Self {
            center,
            rotation: Rotation2::new(angle),
            half_extents,
        }
    }

    /// Unit vectors along the box's local x and y.
    pub fn axes(&self) -> [Point2; 2] {
        let m = self.rotation.matrix();
        [m.column(0).into_owned(), m.column(1).into_owned()]
    }

    /// Half-width of the box's shadow on a unit `axis`.
    fn radius_along(&self, axis: &Point2) -> Real {
        let [u, v] = self.axes();
        self.half_extents.x * u.dot(axis).abs() + self.half_extents.y * v.dot(axis).abs()
    }
}

/// Anything that can judge planar points and rectangular footprints.
pub trait Workspace {
    fn feasible(&self, point: &Point2) -> bool;

    /// Whether a rigid rectangle centred at `footprint.center` may occupy the workspace.
    fn footprint_feasible(&self, footprint: &OrientedBox) -> bool;
}

impl<W: Workspace + ?Sized> Workspace for &W {
    fn feasible(&self, point: &Point2) -> bool {
        (**self).feasible(point)
    }

    fn footprint_feasible(&self, footprint: &OrientedBox) -> bool {
        (**self).footprint_feasible(footprint)
    }
}

/// Axis-aligned rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Rectangle from its lower corner and size, `[x, y, width, height]`.
    pub fn from_xywh(x: Real, y: Real, width: Real, height: Real) -> Self {
        Self {
            min: Point2::new(x, y),
            max: Point2::new(x + width, y + height),
        }
    }

    /// Closed containment test.
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Point2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Point2 {
        (self.max - self.min) * 0.5
    }

    /// Separating-axis test against an oriented box over both world axes and both box axes.
    ///
    /// Closed on both sides: touching boundaries count as overlap.
    pub fn overlaps(&self, other: &OrientedBox) -> bool {
        let offset = other.center - self.center();
        let half = self.half_extents();
        let [u, v] = other.axes();
        [Point2::x(), Point2::y(), u, v].iter().all(|axis| {
            let own = half.x * axis.x.abs() + half.y * axis.y.abs();
            offset.dot(axis).abs() <= own + other.radius_along(axis)
        })
    }
}

/// A bounded rectangle of free space minus a set of box obstacles.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometric2DWorkspace {
    bounds: Aabb,
    obstacles: Vec<Aabb>,
}

impl Geometric2DWorkspace {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            obstacles: Vec::new(),
        }
    }

    /// Workspace `[0, width] x [0, height]`.
    pub fn with_extent(width: Real, height: Real) -> Self {
        Self::new(Aabb::new(Point2::zeros(), Point2::new(width, height)))
    }

    pub fn add_obstacle(&mut self, obstacle: Aabb) {
        self.obstacles.push(obstacle);
    }

    pub fn with_obstacle(mut self, obstacle: Aabb) -> Self {
        self.add_obstacle(obstacle);
        self
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    pub fn in_obstacle(&self, point: &Point2) -> bool {
        self.obstacles.iter().any(|o| o.contains(point))
    }
}

impl Workspace for Geometric2DWorkspace {
    fn feasible(&self, point: &Point2) -> bool {
        self.bounds.contains(point) && !self.in_obstacle(point)
    }

    /// The extent bounds only the footprint's center; obstacles are tested against the
    /// whole rectangle.
    fn footprint_feasible(&self, footprint: &OrientedBox) -> bool {
        self.bounds.contains(&footprint.center)
            && !self.obstacles.iter().any(|o| o.overlaps(footprint))
    }
}
