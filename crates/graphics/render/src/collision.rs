//! Intersection tests between the colliders of two shapes
//!
//! Circles stay true circles in world space (their radius is scaled by the
//! mean axis scale), everything else is reduced to a ring of world space
//! vertices. Polygons are compared using the separating axis theorem, which
//! is exact for convex outlines. Touching outlines count as intersecting.

use math::{AffineTransform, Vec2D};

use crate::{Collider, Geometry, Scene, Shape};

#[derive(Clone, Debug, PartialEq)]
enum Outline {
    Circle { center: Vec2D, radius: f32 },

    /// Two vertices describe a line segment
    Polygon(Vec<Vec2D>),
}

/// Whether the colliders of two shapes that have no parent overlap
///
/// Collections need a [Scene] to resolve their children, use [Scene::intersects]
/// for those.
#[must_use]
pub fn intersects(a: &Shape, b: &Shape) -> bool {
    let identity = AffineTransform::identity();
    test_pair(None, a, identity, b, identity)
}

pub(crate) fn intersects_in(
    scene: &Scene,
    a: &Shape,
    a_parent: AffineTransform,
    b: &Shape,
    b_parent: AffineTransform,
) -> bool {
    test_pair(Some(scene), a, a_parent, b, b_parent)
}

fn test_pair(
    scene: Option<&Scene>,
    a: &Shape,
    a_parent: AffineTransform,
    b: &Shape,
    b_parent: AffineTransform,
) -> bool {
    let (Some(a_collider), Some(b_collider)) = (a.collider(), b.collider()) else {
        return false;
    };

    let a_outlines = collider_outlines(scene, a, a_collider, a_parent);
    let b_outlines = collider_outlines(scene, b, b_collider, b_parent);

    a_outlines.iter().any(|a_outline| {
        b_outlines
            .iter()
            .any(|b_outline| outlines_intersect(a_outline, b_outline))
    })
}

fn collider_outlines(
    scene: Option<&Scene>,
    shape: &Shape,
    collider: &Collider,
    parent: AffineTransform,
) -> Vec<Outline> {
    let world = shape.local_matrix().chain(parent);

    match collider {
        Collider::Circle { radius } => vec![Outline::Circle {
            center: world.apply_to(Vec2D::ORIGIN),
            radius: radius * world.mean_scale(),
        }],
        Collider::Polygon { vertices } => vec![Outline::Polygon(
            vertices.iter().map(|&vertex| world.apply_to(vertex)).collect(),
        )],
        Collider::Outline => {
            let mut outlines = vec![];
            geometry_outlines(scene, shape, world, 0, &mut outlines);
            outlines
        },
    }
}

fn geometry_outlines(
    scene: Option<&Scene>,
    shape: &Shape,
    world: AffineTransform,
    depth: usize,
    outlines: &mut Vec<Outline>,
) {
    match shape.geometry() {
        Geometry::Point => outlines.push(Outline::Circle {
            center: world.apply_to(Vec2D::ORIGIN),
            radius: 0.,
        }),
        Geometry::LineSegment { end } => outlines.push(Outline::Polygon(vec![
            world.apply_to(Vec2D::ORIGIN),
            world.apply_to(*end),
        ])),
        Geometry::Circle { radius } => outlines.push(Outline::Circle {
            center: world.apply_to(Vec2D::ORIGIN),
            radius: radius * world.mean_scale(),
        }),
        Geometry::Collection { children } => {
            let Some(scene) = scene else {
                return;
            };

            // A scene without cycles can't be nested deeper than it has shapes
            if depth > scene.len() {
                log::warn!("Collection nesting exceeds scene size, the scene contains a cycle");
                return;
            }

            for &child in children {
                if let Some(child) = scene.get(child) {
                    let child_world = child.local_matrix().chain(world);
                    geometry_outlines(Some(scene), child, child_world, depth + 1, outlines);
                }
            }
        },
        geometry => {
            if let Some(ring) = geometry.vertex_ring() {
                outlines.push(Outline::Polygon(
                    ring.into_iter()
                        .map(|vertex| world.apply_to(vertex))
                        .collect(),
                ));
            }
        },
    }
}

fn outlines_intersect(a: &Outline, b: &Outline) -> bool {
    match (a, b) {
        (
            Outline::Circle {
                center: a_center,
                radius: a_radius,
            },
            Outline::Circle {
                center: b_center,
                radius: b_radius,
            },
        ) => a_center.distance_to(*b_center) <= a_radius + b_radius,
        (Outline::Circle { center, radius }, Outline::Polygon(polygon))
        | (Outline::Polygon(polygon), Outline::Circle { center, radius }) => {
            circle_intersects_polygon(*center, *radius, polygon)
        },
        (Outline::Polygon(a), Outline::Polygon(b)) => polygons_intersect(a, b),
    }
}

fn edges(polygon: &[Vec2D]) -> impl Iterator<Item = (Vec2D, Vec2D)> + '_ {
    let next = polygon.iter().cycle().skip(1);
    polygon.iter().copied().zip(next.copied())
}

/// Even-odd containment test
fn contains_point(polygon: &[Vec2D], point: Vec2D) -> bool {
    let mut inside = false;
    for (from, to) in edges(polygon) {
        if (from.y > point.y) != (to.y > point.y) {
            let crossing = from.x + (point.y - from.y) * (to.x - from.x) / (to.y - from.y);
            if point.x < crossing {
                inside = !inside;
            }
        }
    }
    inside
}

fn distance_to_segment(point: Vec2D, from: Vec2D, to: Vec2D) -> f32 {
    let direction = to - from;
    let length_squared = direction.dot(direction);
    if length_squared == 0. {
        return point.distance_to(from);
    }

    let t = ((point - from).dot(direction) / length_squared).clamp(0., 1.);
    point.distance_to(from + direction * t)
}

fn circle_intersects_polygon(center: Vec2D, radius: f32, polygon: &[Vec2D]) -> bool {
    if polygon.len() > 2 && contains_point(polygon, center) {
        return true;
    }

    edges(polygon).any(|(from, to)| distance_to_segment(center, from, to) <= radius)
}

/// Project all vertices onto `axis`, returning the covered interval
fn project(polygon: &[Vec2D], axis: Vec2D) -> (f32, f32) {
    polygon
        .iter()
        .map(|vertex| vertex.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        })
}

fn candidate_axes(polygon: &[Vec2D]) -> impl Iterator<Item = Vec2D> + '_ {
    // A line segment can also be separated along its own direction
    let segment_direction = (polygon.len() == 2).then(|| polygon[1] - polygon[0]);

    edges(polygon)
        .map(|(from, to)| (to - from).perpendicular())
        .chain(segment_direction)
}

fn polygons_intersect(a: &[Vec2D], b: &[Vec2D]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    // The coordinate axes catch outlines that collapsed into a single point
    let axes = [Vec2D::new(1., 0.), Vec2D::new(0., 1.)]
        .into_iter()
        .chain(candidate_axes(a))
        .chain(candidate_axes(b));

    for axis in axes {
        if axis.is_origin() {
            continue;
        }

        let (a_min, a_max) = project(a, axis);
        let (b_min, b_max) = project(b, axis);
        if a_max < b_min || b_max < a_min {
            return false;
        }
    }
    true
}
