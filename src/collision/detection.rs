//! Narrow phase: exact contacts between two colliders.

use super::collider::Collider;
use super::manifold::{Contact, ContactPool, Participant, SeparationModel};
use super::separating_axis::{find_circle_polygon_overlap, find_polygon_separation};
use crate::common::{CompositeStrategy, PhysicsConfig};
use crate::math::{LineSegment, Transform, Vec2};
use crate::objects::BodyHandle;
use crate::shapes::{WorldCircle, WorldPolygon, WorldShape};

/// Depth the temporary polygon built from an edge is extruded by.
const EDGE_EXTRUSION: f64 = 100.0;

/// Narrow-phase tuning, taken from [`PhysicsConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrowPhaseSettings {
    /// Overlaps no deeper than this are treated as touching.
    pub touching_epsilon: f64,
    pub composite_strategy: CompositeStrategy,
}

impl NarrowPhaseSettings {
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            touching_epsilon: config.contact.touching_epsilon,
            composite_strategy: config.colliders.composite_strategy,
        }
    }
}

impl Default for NarrowPhaseSettings {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

/// One side of a shape test: the shape in world space plus its body.
#[derive(Clone, Copy)]
struct Body<'a> {
    handle: BodyHandle,
    xf: &'a Transform,
}

/// Deepest contact between two colliders, if they penetrate.
pub fn collide(a: &Collider, b: &Collider, settings: &NarrowPhaseSettings) -> Option<Contact> {
    let mut deepest: Option<Contact> = None;
    generate(a, b, settings, &mut |contact| {
        if deepest.map_or(true, |d| contact.depth > d.depth) {
            deepest = Some(contact);
        }
    });
    deepest
}

/// Pushes every contact between two colliders into `out`: one for simple
/// shapes, and for composites one or one per child pairing depending on the
/// composite strategy. Returns how many were pushed.
pub fn collide_into(a: &Collider, b: &Collider, settings: &NarrowPhaseSettings, out: &mut ContactPool) -> usize {
    let before = out.len();
    generate(a, b, settings, &mut |contact| out.push(contact));
    out.len() - before
}

fn generate(a: &Collider, b: &Collider, settings: &NarrowPhaseSettings, sink: &mut dyn FnMut(Contact)) {
    let body_a = Body {
        handle: a.owner(),
        xf: a.transform(),
    };
    let body_b = Body {
        handle: b.owner(),
        xf: b.transform(),
    };
    let eps = settings.touching_epsilon;
    let (wa, wb) = (a.world_shape(), b.world_shape());

    let composite = matches!(wa, WorldShape::Composite(_)) || matches!(wb, WorldShape::Composite(_));
    if !composite {
        if let Some(contact) = collide_primitives(wa, body_a, wb, body_b, eps) {
            sink(contact);
        }
        return;
    }

    let mut deepest: Option<Contact> = None;
    for (ia, sa) in children(wa) {
        for (ib, sb) in children(wb) {
            if !sa.bounds().intersects(&sb.bounds()) {
                continue;
            }
            let Some(mut contact) = collide_primitives(sa, body_a, sb, body_b, eps) else {
                continue;
            };
            match settings.composite_strategy {
                CompositeStrategy::Separate => {
                    contact.id.children = Some((ia, ib));
                    sink(contact);
                }
                CompositeStrategy::Together => {
                    if deepest.map_or(true, |d| contact.depth > d.depth) {
                        deepest = Some(contact);
                    }
                }
            }
        }
    }
    if let Some(contact) = deepest {
        sink(contact);
    }
}

fn children(shape: &WorldShape) -> Vec<(u32, &WorldShape)> {
    match shape {
        WorldShape::Composite(children) => children.iter().enumerate().map(|(i, c)| (i as u32, c)).collect(),
        other => vec![(0, other)],
    }
}

fn collide_primitives(a: &WorldShape, body_a: Body, b: &WorldShape, body_b: Body, eps: f64) -> Option<Contact> {
    match (a, b) {
        (WorldShape::Circle(ca), WorldShape::Circle(cb)) => circle_circle(ca, body_a, cb, body_b, eps),
        (WorldShape::Circle(c), WorldShape::Polygon(p)) => circle_polygon(c, body_a, p, body_b, eps),
        (WorldShape::Polygon(p), WorldShape::Circle(c)) => {
            circle_polygon(c, body_b, p, body_a, eps).map(|contact| contact.swapped())
        }
        (WorldShape::Circle(c), WorldShape::Edge(e)) => circle_edge(c, body_a, e, body_b, eps),
        (WorldShape::Edge(e), WorldShape::Circle(c)) => {
            circle_edge(c, body_b, e, body_a, eps).map(|contact| contact.swapped())
        }
        (WorldShape::Polygon(pa), WorldShape::Polygon(pb)) => polygon_polygon(pa, body_a, pb, body_b, eps),
        (WorldShape::Polygon(p), WorldShape::Edge(e)) => polygon_edge(p, body_a, e, body_b, eps),
        (WorldShape::Edge(e), WorldShape::Polygon(p)) => {
            polygon_edge(p, body_b, e, body_a, eps).map(|contact| contact.swapped())
        }
        (WorldShape::Edge(_), WorldShape::Edge(_)) => None,
        // composites are expanded by the caller
        (WorldShape::Composite(_), _) | (_, WorldShape::Composite(_)) => None,
    }
}

fn circle_circle(a: &WorldCircle, body_a: Body, b: &WorldCircle, body_b: Body, eps: f64) -> Option<Contact> {
    let offset = b.center - a.center;
    let distance = offset.magnitude();
    let radii = a.radius + b.radius;
    if distance >= radii - eps {
        return None;
    }
    let normal = if distance > 1e-12 { offset / distance } else { Vec2::UP };
    let mtv = normal * (radii - distance);
    let point = a.center + normal * a.radius;
    Some(Contact::new(
        body_a.handle,
        body_b.handle,
        mtv,
        normal,
        &[point],
        &[body_a.xf.apply_inverse(point)],
        SeparationModel::Circles {
            local_a: body_a.xf.apply_inverse(a.center),
            radius_a: a.radius,
            local_b: body_b.xf.apply_inverse(b.center),
            radius_b: b.radius,
        },
    ))
}

fn circle_polygon(c: &WorldCircle, body_c: Body, p: &WorldPolygon, body_p: Body, eps: f64) -> Option<Contact> {
    let (overlap, normal) = find_circle_polygon_overlap(c, p)?;
    if overlap <= eps {
        return None;
    }
    let (_, side) = p.find_side(-normal);
    let point = c.support(normal);
    Some(Contact::new(
        body_c.handle,
        body_p.handle,
        normal * overlap,
        normal,
        &[point],
        &[body_c.xf.apply_inverse(c.center)],
        SeparationModel::Side {
            reference: Participant::B,
            local_side: side.inverse_transform(body_p.xf),
            radius: c.radius,
        },
    ))
}

/// Voronoi-region test of a circle against a segment: the begin vertex, the
/// end vertex, or the interior.
fn circle_edge(c: &WorldCircle, body_c: Body, edge: &LineSegment, body_e: Body, eps: f64) -> Option<Contact> {
    let center = c.center;
    let e = edge.direction();
    let u = e.dot(edge.end - center);
    let v = e.dot(center - edge.begin);

    let closest = if v <= 0.0 {
        edge.begin
    } else if u <= 0.0 {
        edge.end
    } else {
        edge.begin + e * (v / e.magnitude_squared())
    };

    let to_edge = closest - center;
    let distance = to_edge.magnitude();
    let depth = c.radius - distance;
    if depth <= eps {
        return None;
    }

    // outward side: the edge walked so its normal faces the circle
    let side = if edge.normal().dot(center - edge.begin) >= 0.0 {
        *edge
    } else {
        edge.flipped()
    };
    let normal = if distance > 1e-12 { to_edge / distance } else { -side.normal() };

    Some(Contact::new(
        body_c.handle,
        body_e.handle,
        normal * depth,
        normal,
        &[closest],
        &[body_c.xf.apply_inverse(center)],
        SeparationModel::Side {
            reference: Participant::B,
            local_side: side.inverse_transform(body_e.xf),
            radius: c.radius,
        },
    ))
}

/// SAT on both polygons, then clips the incident side against the
/// reference side to get up to two contact points.
fn polygon_polygon(a: &WorldPolygon, body_a: Body, b: &WorldPolygon, body_b: Body, eps: f64) -> Option<Contact> {
    let sep_a = find_polygon_separation(a, b);
    if sep_a.separation > -eps {
        return None;
    }
    let sep_b = find_polygon_separation(b, a);
    if sep_b.separation > -eps {
        return None;
    }

    // the least negative separation is the cheapest way out
    let (separation, reference, incident_poly, incident_body, reference_body) = if sep_a.separation >= sep_b.separation
    {
        (sep_a, Participant::A, b, body_b, body_a)
    } else {
        (sep_b, Participant::B, a, body_a, body_b)
    };

    let (_, incident) = incident_poly.find_side(-separation.axis);
    let reference_side = separation.side;
    let ref_dir = reference_side.direction().normalize();

    let clip_right = incident.clip(-ref_dir, -ref_dir.dot(reference_side.begin))?;
    let clip_left = clip_right.clip(ref_dir, ref_dir.dot(reference_side.end))?;

    let mut points = [Vec2::ZERO; 2];
    let mut count = 0;
    for p in [clip_left.begin, clip_left.end] {
        if reference_side.below(p) {
            points[count] = p;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }

    let mut normal = separation.axis;
    if (b.center - a.center).dot(normal) < 0.0 {
        normal = -normal;
    }
    let mut local_points = [Vec2::ZERO; 2];
    for (local, world) in local_points.iter_mut().zip(&points[..count]) {
        *local = incident_body.xf.apply_inverse(*world);
    }

    Some(Contact::new(
        body_a.handle,
        body_b.handle,
        normal * -separation.separation,
        normal,
        &points[..count],
        &local_points[..count],
        SeparationModel::Side {
            reference,
            local_side: reference_side.inverse_transform(reference_body.xf),
            radius: 0.0,
        },
    ))
}

/// Treats the edge as a deep polygon extruded away from `p` and runs the
/// polygon test.
fn polygon_edge(p: &WorldPolygon, body_p: Body, edge: &LineSegment, body_e: Body, eps: f64) -> Option<Contact> {
    let mut dir = (edge.midpoint() - p.center).normalize();
    if dir == Vec2::ZERO {
        dir = edge.normal();
    }
    let extruded = WorldPolygon::from_points(vec![
        edge.begin,
        edge.end,
        edge.end + dir * EDGE_EXTRUSION,
        edge.begin + dir * EDGE_EXTRUSION,
    ]);
    polygon_polygon(p, body_p, &extruded, body_e, eps)
}
