use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meshgraph::catmull_clark::{self, Options};
use meshgraph::examples::unit_cube_all_edges_creased;

fn subdivide_cube_once() {
    let cube = unit_cube_all_edges_creased();
    let options = Options {
        boundary_as_crease: true,
    };
    let (mesh, _vertex_map, _face_map) = catmull_clark::subdivide_once(&cube, &options).unwrap();
    black_box(mesh);
}

fn subdivide_cube_three_iterations() {
    let cube = unit_cube_all_edges_creased();
    let options = Options {
        boundary_as_crease: true,
    };
    let (mesh, vertex_map, face_map) = catmull_clark::subdivide(&cube, &options, 3).unwrap();
    black_box((mesh, vertex_map, face_map));
}

fn subdivide_benchmark(c: &mut Criterion) {
    c.bench_function("catmull-clark cube, one iteration", |b| {
        b.iter(subdivide_cube_once)
    });
    c.bench_function("catmull-clark cube, three iterations", |b| {
        b.iter(subdivide_cube_three_iterations)
    });
}

criterion_group!(benches, subdivide_benchmark);
criterion_main!(benches);
