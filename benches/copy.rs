use criterion::{Criterion, criterion_group, criterion_main};
use voxel_dense::{
    Coord, CoordBBox, CopyConfig, Dense, LayoutXyz, Tree, copy_from_dense, copy_to_dense,
};

/// Ramp over an `n`^3 grid with a third of the voxels at background.
fn make_dense(n: i32) -> Dense<f32> {
    let bbox = CoordBBox::from_dims(Coord::splat(n));
    let mut dense = Dense::<f32>::new(bbox).unwrap();
    for (i, v) in dense.data_mut().iter_mut().enumerate() {
        *v = if i % 3 == 0 { 0.0 } else { (i % 97) as f32 * 0.25 };
    }
    dense
}

/// Shell of active voxels between two radii, centred in an `n`^3 box.
fn make_tree(n: i32) -> Tree<f32> {
    let mut tree = Tree::new(0.0f32);
    let c = n / 2;
    let (r0, r1) = ((c - 8) * (c - 8), c * c);
    for xyz in CoordBBox::from_dims(Coord::splat(n)) {
        let d = xyz - Coord::splat(c);
        let r2 = d.x() * d.x() + d.y() * d.y() + d.z() * d.z();
        if (r0..r1).contains(&r2) {
            tree.set_value(xyz, r2 as f32);
        }
    }
    tree
}

fn bench_scatter(c: &mut Criterion) {
    // 2M voxels: exercises leaf staging and splice
    let dense = make_dense(128);

    c.bench_function("copy_from_dense_serial_128", |b| {
        b.iter(|| {
            let mut tree = Tree::new(0.0f32);
            copy_from_dense(&dense, &mut tree, 0.0, &CopyConfig::serial()).unwrap()
        });
    });

    c.bench_function("copy_from_dense_parallel_128", |b| {
        b.iter(|| {
            let mut tree = Tree::new(0.0f32);
            copy_from_dense(&dense, &mut tree, 0.0, &CopyConfig::parallel()).unwrap()
        });
    });
}

fn bench_gather(c: &mut Criterion) {
    let tree = make_tree(128);
    let bbox = CoordBBox::from_dims(Coord::splat(128));
    let mut zyx = Dense::<f32>::new(bbox).unwrap();
    let mut xyz = Dense::<f32, LayoutXyz>::new(bbox).unwrap();

    c.bench_function("copy_to_dense_serial_128", |b| {
        b.iter(|| copy_to_dense(&tree, &mut zyx, &CopyConfig::serial()).unwrap());
    });

    c.bench_function("copy_to_dense_parallel_128", |b| {
        b.iter(|| copy_to_dense(&tree, &mut zyx, &CopyConfig::parallel()).unwrap());
    });

    c.bench_function("copy_to_dense_parallel_xyz_128", |b| {
        b.iter(|| copy_to_dense(&tree, &mut xyz, &CopyConfig::parallel()).unwrap());
    });
}

criterion_group!(benches, bench_scatter, bench_gather);
criterion_main!(benches);
