use criterion::{black_box, criterion_group, criterion_main, Criterion};
use math::{Angle, Color, Vec2D};
use render::{FrameBuffer, RegularPolygonSize, Renderer, Scene, Shape};

fn solar_system() -> (Scene, render::ShapeId) {
    let mut scene = Scene::new();
    let root = scene.insert(Shape::collection(Vec2D::ORIGIN).unwrap());

    for ring in 0..8 {
        let mut orbit = Shape::collection(Vec2D::ORIGIN).unwrap();
        orbit.set_pivot(32., 32.);
        orbit.rotate(Angle::from_degrees(ring as f32 * 40.));
        let orbit = scene.insert(orbit);
        scene.add_child(root, orbit).unwrap();

        let planet = Shape::circle(Vec2D::new(32. + ring as f32 * 3.5, 32.), 2.5)
            .unwrap()
            .with_color(Color::CYAN)
            .filled(true);
        let planet = scene.insert(planet);
        scene.add_child(orbit, planet).unwrap();
    }

    let sun = Shape::regular_polygon(Vec2D::new(32., 32.), 12, RegularPolygonSize::Radius(6.))
        .unwrap()
        .with_color(Color::YELLOW)
        .filled(true);
    let sun = scene.insert(sun);
    scene.add_child(root, sun).unwrap();

    (scene, root)
}

fn criterion_benchmark(c: &mut Criterion) {
    let renderer = Renderer::new(64, 64);
    let mut buffer = FrameBuffer::new(64, 64);
    let (scene, root) = solar_system();

    c.bench_function("render solar system 64x64", |b| {
        b.iter(|| {
            buffer.clear();
            renderer
                .render(black_box(&scene), root, &mut buffer)
                .unwrap();
            black_box(&buffer);
        })
    });

    let polygon = Shape::regular_polygon(Vec2D::new(256., 256.), 7, RegularPolygonSize::Radius(250.))
        .unwrap()
        .filled(true);
    let rasterizer = render::Rasterizer::new(512, 512);
    c.bench_function("fill heptagon 512x512", |b| {
        b.iter(|| {
            let mut covered = 0_usize;
            rasterizer.rasterize(
                black_box(&polygon),
                math::AffineTransform::identity(),
                |_, _, _| covered += 1,
            );
            black_box(covered);
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
