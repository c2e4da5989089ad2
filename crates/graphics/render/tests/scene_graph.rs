use std::sync::Arc;

use font::BitmapFont;
use image::{Texture, WrapMode};
use math::{Angle, Bitmap, Color, Vec2D};
use render::{
    decode_records, encode_records, Collider, FrameBuffer, RegularPolygonSize, RenderError,
    Renderer, Scene, Shape, ShapeId,
};

fn filled_square(x: f32, y: f32, size: f32, color: Color) -> Shape {
    Shape::rectangle(Vec2D::new(x, y), size, size)
        .unwrap()
        .with_color(color)
        .filled(true)
}

fn group(scene: &mut Scene, children: &[ShapeId]) -> ShapeId {
    let root = scene.insert(Shape::collection(Vec2D::ORIGIN).unwrap());
    for &child in children {
        scene.add_child(root, child).unwrap();
    }
    root
}

#[test]
fn animation_frames_reuse_the_buffer() {
    let mut scene = Scene::new();
    let square = scene.insert(filled_square(0., 0., 4., Color::RED));
    let root = group(&mut scene, &[square]);

    let renderer = Renderer::new(16, 16);
    let mut buffer = FrameBuffer::new(16, 16);

    let mut coverage = vec![];
    for _ in 0..3 {
        buffer.clear();
        renderer.render(&scene, root, &mut buffer).unwrap();
        coverage.push(buffer.covered_pixels().map(|p| (p.x, p.y)).collect::<Vec<_>>());
        scene.get_mut(square).unwrap().translate(4., 0.);
    }

    assert_eq!(coverage[0].len(), 16);
    assert_eq!(coverage[1][0], (4, 0));
    assert_eq!(coverage[2][0], (8, 0));
}

#[test]
fn accumulating_frames_keep_old_pixels() {
    let mut scene = Scene::new();
    let dot = scene.insert(Shape::point(Vec2D::ORIGIN).unwrap().with_color(Color::WHITE));

    let renderer = Renderer::new(8, 8);
    let mut buffer = FrameBuffer::new(8, 8);
    for step in 0..8 {
        scene.get_mut(dot).unwrap().set_position(step as f32, step as f32);
        renderer.render(&scene, dot, &mut buffer).unwrap();
    }

    assert_eq!(buffer.covered_pixels().count(), 8);
}

#[test]
fn nested_collections_compose() {
    let mut scene = Scene::new();
    let dot = scene.insert(Shape::point(Vec2D::new(10., 0.)).unwrap().with_color(Color::GREEN));

    // The inner collection doubles distances, the outer one moves everything to the center
    let mut inner = Shape::collection(Vec2D::ORIGIN).unwrap();
    inner.set_scale(2., 2.);
    let inner = scene.insert(inner);
    scene.add_child(inner, dot).unwrap();

    let outer = scene.insert(Shape::collection(Vec2D::new(32., 32.)).unwrap());
    scene.add_child(outer, inner).unwrap();

    let mut buffer = FrameBuffer::new(64, 64);
    Renderer::new(64, 64).render(&scene, outer, &mut buffer).unwrap();
    assert_eq!(buffer.get_pixel(52, 32), Some(Color::GREEN));

    // Rendering a subtree still respects its ancestors
    buffer.clear();
    Renderer::new(64, 64).render(&scene, dot, &mut buffer).unwrap();
    assert_eq!(buffer.get_pixel(52, 32), Some(Color::GREEN));
}

#[test]
fn child_z_is_absolute() {
    let mut scene = Scene::new();
    let low = scene.insert(filled_square(0., 0., 2., Color::BLUE).with_z(1.));
    let inner = scene.insert(Shape::collection(Vec2D::ORIGIN).unwrap().with_z(10.));
    scene.add_child(inner, low).unwrap();

    let high = scene.insert(filled_square(0., 0., 2., Color::RED).with_z(5.));
    let root = group(&mut scene, &[inner, high]);

    let mut buffer = FrameBuffer::new(4, 4);
    Renderer::new(4, 4).render(&scene, root, &mut buffer).unwrap();
    assert_eq!(buffer.get_pixel(0, 0), Some(Color::RED));
}

#[test]
fn removed_shapes_disappear() {
    let mut scene = Scene::new();
    let square = scene.insert(filled_square(0., 0., 2., Color::RED));
    let root = group(&mut scene, &[square]);
    scene.remove(square).unwrap();

    let mut buffer = FrameBuffer::new(4, 4);
    Renderer::new(4, 4).render(&scene, root, &mut buffer).unwrap();
    assert_eq!(buffer.covered_pixels().count(), 0);
    assert!(scene.children(root).is_empty());
}

#[test]
fn rendering_a_removed_root_fails() {
    let mut scene = Scene::new();
    let root = group(&mut scene, &[]);
    scene.remove(root).unwrap();

    let mut buffer = FrameBuffer::new(4, 4);
    assert_eq!(
        Renderer::new(4, 4).render(&scene, root, &mut buffer),
        Err(RenderError::UnknownShape(root))
    );
}

#[test]
fn textured_polygon_with_tint() {
    let mut texture = Texture::from_pixels(Bitmap::from_data(
        vec![Color::WHITE, Color::BLACK, Color::BLACK, Color::WHITE],
        2,
        2,
    ));
    texture.set_wrap_mode(WrapMode::Repeat);

    let mut square = filled_square(0., 0., 8., Color::YELLOW);
    square.set_texture(Arc::new(texture));
    square.set_texture_scale(2., 2.);

    let mut scene = Scene::new();
    let square = scene.insert(square);
    let mut buffer = FrameBuffer::new(8, 8);
    Renderer::new(8, 8).render(&scene, square, &mut buffer).unwrap();

    // A 2x2 checkerboard repeated twice in each direction gives 2x2 pixel cells
    assert_eq!(buffer.get_pixel(0, 0), Some(Color::YELLOW));
    assert_eq!(buffer.get_pixel(2, 0), Some(Color::BLACK));
    assert_eq!(buffer.get_pixel(2, 2), Some(Color::YELLOW));
    assert_eq!(buffer.get_pixel(5, 1), Some(Color::YELLOW));
}

#[test]
fn collisions_follow_animation() {
    let mut scene = Scene::new();
    let ball = scene.insert(
        Shape::circle(Vec2D::new(5., 5.), 2.)
            .unwrap()
            .with_collider(Collider::Outline)
            .unwrap(),
    );
    let wall = scene.insert(
        Shape::regular_polygon(Vec2D::new(30., 5.), 4, RegularPolygonSize::SideLength(4.))
            .unwrap()
            .with_collider(Collider::Outline)
            .unwrap(),
    );

    let mut hits = 0;
    for _ in 0..30 {
        scene.get_mut(ball).unwrap().translate(1., 0.);
        if scene.intersects(ball, wall) {
            assert!(scene.intersects(wall, ball));
            hits += 1;
        }
    }
    assert!(hits > 0);

    scene.get_mut(wall).unwrap().remove_collider();
    assert!(!scene.intersects(ball, wall));
}

#[test]
fn text_and_records() {
    let renderer = Renderer::new(32, 8);
    let mut buffer = FrameBuffer::new(32, 8);
    renderer.draw_text(&mut buffer, "ok", 0, 0, &BitmapFont::new(), Color::MAGENTA, true);

    let records: Vec<_> = buffer.covered_pixels().collect();
    assert!(!records.is_empty());
    assert!(records.iter().all(|record| record.color == Color::MAGENTA));

    let decoded = decode_records(&encode_records(&records));
    assert_eq!(decoded, records);
}

#[test]
fn rotating_a_collection_moves_its_children() {
    let mut scene = Scene::new();
    let dot = scene.insert(Shape::point(Vec2D::new(52., 32.)).unwrap().with_color(Color::WHITE));
    let mut orbit = Shape::collection(Vec2D::ORIGIN).unwrap();
    orbit.set_pivot(32., 32.);
    let orbit = scene.insert(orbit);
    scene.add_child(orbit, dot).unwrap();

    let renderer = Renderer::new(64, 64);
    let mut buffer = FrameBuffer::new(64, 64);
    let expected = [(52, 32), (32, 52), (12, 32), (32, 12)];

    for (x, y) in expected {
        buffer.clear();
        renderer.render(&scene, orbit, &mut buffer).unwrap();
        assert_eq!(buffer.get_pixel(x, y), Some(Color::WHITE));
        scene.get_mut(orbit).unwrap().rotate(Angle::from_degrees(90.));
    }
}
