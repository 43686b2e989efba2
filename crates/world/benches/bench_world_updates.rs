use std::hint::black_box;
use std::time::Instant;

use collision_world::{Shape, ShapeRef, Transform, World};

fn make_world(object_count: usize, shapes_per_object: usize) -> (World, Vec<ShapeRef>) {
    let mut world = World::new();
    let shapes: Vec<ShapeRef> = (0..shapes_per_object)
        .map(|i| Shape::sphere(0.1 + i as f64 * 0.1))
        .collect();
    let poses: Vec<Transform> = (0..shapes_per_object)
        .map(|i| Transform::from_xyz(0.0, 0.0, i as f64))
        .collect();
    for i in 0..object_count {
        world
            .add_to_object_with_pose(
                &format!("obj{i}"),
                Transform::from_xyz(i as f64, 0.0, 0.0),
                &shapes,
                &poses,
            )
            .expect("equal lengths");
    }
    (world, shapes)
}

fn bench_move_shape(object_count: usize, shapes_per_object: usize, iterations: usize) {
    let (mut world, shapes) = make_world(object_count, shapes_per_object);
    let target = &shapes[shapes_per_object - 1];

    let start = Instant::now();
    for i in 0..iterations {
        let id = format!("obj{}", i % object_count);
        let pose = Transform::from_xyz(0.0, 0.0, (i % 7) as f64);
        black_box(world.move_shape_in_object(black_box(&id), target, pose));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  move shape ({object_count} objects x {shapes_per_object} shapes, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_move_object_with_observers(object_count: usize, observers: usize, iterations: usize) {
    let (mut world, _shapes) = make_world(object_count, 4);
    for _ in 0..observers {
        world.add_observer(|obj, action| {
            black_box((obj.shape_count(), action));
        });
    }

    let step = Transform::from_xyz(0.0, 0.0, 0.001);
    let start = Instant::now();
    for i in 0..iterations {
        let id = format!("obj{}", i % object_count);
        black_box(world.move_object(black_box(&id), step));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  move object ({object_count} objects, {observers} observers, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_get_transform(object_count: usize, iterations: usize) {
    let (mut world, _shapes) = make_world(object_count, 2);
    for i in 0..object_count {
        let mut subframes = collision_world::SubframeMap::new();
        subframes.insert("tip".into(), Transform::from_xyz(0.0, 0.0, 1.0));
        world.set_subframes_of_object(&format!("obj{i}"), subframes);
    }
    let paths: Vec<String> = (0..object_count).map(|i| format!("obj{i}/tip")).collect();

    let start = Instant::now();
    for i in 0..iterations {
        let _ = black_box(world.get_transform(black_box(&paths[i % object_count])));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  subframe lookup ({object_count} objects, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_clear(object_count: usize, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        let (mut world, _shapes) = make_world(object_count, 2);
        world.clear_objects();
        black_box(world.size());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  build + clear ({object_count} objects, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== World Update Benchmarks ===\n");

    println!("Shape move (copy-on-write):");
    bench_move_shape(100, 1, 10000);
    bench_move_shape(100, 16, 10000);
    bench_move_shape(1000, 64, 1000);

    println!("\nObject move with observers:");
    bench_move_object_with_observers(100, 0, 10000);
    bench_move_object_with_observers(100, 8, 10000);

    println!("\nTransform lookup:");
    bench_get_transform(1000, 100000);

    println!("\nClear:");
    bench_clear(100, 100);
    bench_clear(10000, 10);

    println!("\n=== Done ===");
}
