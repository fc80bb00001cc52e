use super::aabb::AABB;
use crate::math::{Ray, Transform, Vec2};
use crate::objects::BodyHandle;
use crate::shapes::{Shape, WorldShape};

/// A shape attached to a body, with its world-space placement cached.
///
/// The cache is refreshed through [`update`](Collider::update) whenever the
/// owning body's transform changes; everything the narrow phase and the
/// broad phase read comes from it.
#[derive(Debug, Clone)]
pub struct Collider {
    shape: Shape,
    owner: BodyHandle,
    transform: Transform,
    world: WorldShape,
    bounds: AABB,
}

impl Collider {
    pub fn new(shape: Shape) -> Self {
        let transform = Transform::identity();
        let world = shape.to_world(&transform);
        let bounds = world.bounds();
        Self {
            shape,
            owner: BodyHandle::DANGLING,
            transform,
            world,
            bounds,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn set_shape(&mut self, shape: Shape) {
        self.world = shape.to_world(&self.transform);
        self.bounds = self.world.bounds();
        self.shape = shape;
    }

    pub fn owner(&self) -> BodyHandle {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: BodyHandle) {
        self.owner = owner;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn world_shape(&self) -> &WorldShape {
        &self.world
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn center(&self) -> Vec2 {
        self.world.center()
    }

    pub fn local_bounds(&self) -> AABB {
        self.shape.local_bounds()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds.contains_point(point) && self.world.contains(point)
    }

    pub fn ray_cast(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        if !self.bounds.ray_cast(ray, max_distance) {
            return None;
        }
        self.world.ray_cast(ray, max_distance)
    }

    pub fn update(&mut self, transform: &Transform) {
        self.transform = *transform;
        self.shape.write_world(transform, &mut self.world);
        self.bounds = self.world.bounds();
    }
}
