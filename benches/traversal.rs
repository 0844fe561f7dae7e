//! Traversal throughput over a synthetic median-split hierarchy

use cgmath::Point3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use emberpoint::cloud::{PointSource, TreeSource};
use emberpoint::{
    collect_overview, collect_visible, init_camera, CameraData, ModelTransform, PointStore,
    SphereTree, TraversalConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const POINT_COUNT: usize = 100_000;
const LEAF_CAPACITY: usize = 8;

/// Write one subtree and return its word offset
fn write_subtree(
    words: &mut Vec<u32>,
    floats: &[f32],
    indices: &mut [u32],
    depth: u32,
    deepest: &mut u32,
) -> u32 {
    *deepest = (*deepest).max(depth);
    let at = words.len() as u32;

    if indices.len() <= LEAF_CAPACITY {
        words.push(0);
        words.push(indices.len() as u32);
        for &index in indices.iter() {
            words.push(index * 3);
        }
        return at;
    }

    let coordinate = |index: u32, axis: usize| floats[index as usize * 3 + axis];

    let mut centroid = [0.0f32; 3];
    for &index in indices.iter() {
        for (axis, component) in centroid.iter_mut().enumerate() {
            *component += coordinate(index, axis);
        }
    }
    for component in centroid.iter_mut() {
        *component /= indices.len() as f32;
    }

    let distance2 = |index: u32| -> f32 {
        let dx = coordinate(index, 0) - centroid[0];
        let dy = coordinate(index, 1) - centroid[1];
        let dz = coordinate(index, 2) - centroid[2];
        dx * dx + dy * dy + dz * dz
    };
    let center = *indices
        .iter()
        .min_by(|&&a, &&b| distance2(a).total_cmp(&distance2(b)))
        .expect("Failed to pick a center point");

    let mut radius2 = 0.0f32;
    for &index in indices.iter() {
        let dx = coordinate(index, 0) - coordinate(center, 0);
        let dy = coordinate(index, 1) - coordinate(center, 1);
        let dz = coordinate(index, 2) - coordinate(center, 2);
        radius2 = radius2.max(dx * dx + dy * dy + dz * dz);
    }
    // A zero radius would decode as a leaf sentinel
    let radius = radius2.sqrt().max(1e-6);

    words.push(radius.to_bits());
    words.push(center * 3);
    let patch = words.len();
    words.push(0);
    words.push(0);

    let axis = depth as usize % 3;
    indices.sort_unstable_by(|&a, &b| coordinate(a, axis).total_cmp(&coordinate(b, axis)));
    let mid = indices.len() / 2;
    let (left_half, right_half) = indices.split_at_mut(mid);
    let left = write_subtree(words, floats, left_half, depth + 1, deepest);
    let right = write_subtree(words, floats, right_half, depth + 1, deepest);
    words[patch] = left;
    words[patch + 1] = right;

    at
}

/// Random cloud in a unit-ish cube plus a camera that sees all of it
fn scene(count: usize) -> (SphereTree, PointStore, CameraData) {
    let mut rng = StdRng::seed_from_u64(7);
    let mut floats = Vec::with_capacity(count * 3);
    for _ in 0..count * 3 {
        floats.push(rng.gen_range(-1.0f32..1.0));
    }

    let mut indices: Vec<u32> = (0..count as u32).collect();
    let mut words = vec![0, count as u32, 0];
    let mut deepest = 0;
    write_subtree(&mut words, &floats, &mut indices, 0, &mut deepest);
    words[0] = deepest + 1;

    let tree = SphereTree::new(TreeSource::Owned(words)).expect("Failed to build hierarchy");
    let store = PointStore::new(PointSource::Owned(floats)).expect("Failed to build point store");
    let camera = init_camera(Point3::new(0.0, 0.0, 4.0), -90.0, 0.0);
    (tree, store, camera)
}

fn bench_collect_visible(c: &mut Criterion) {
    let (tree, store, camera) = scene(POINT_COUNT);
    let summary = tree.validate(&store).expect("Failed to validate hierarchy");
    let transform = ModelTransform::identity();
    let config = TraversalConfig::default();
    let mut out = Vec::with_capacity(summary.max_record_count as usize);

    c.bench_function("collect_visible_100k", |b| {
        b.iter(|| {
            out.clear();
            let written = collect_visible(
                black_box(&tree),
                &store,
                &camera,
                &transform,
                &config,
                tree.root(),
                0,
                &mut out,
            )
            .expect("Failed to collect records");
            black_box(written);
        })
    });
}

fn bench_collect_overview(c: &mut Criterion) {
    let (tree, store, _camera) = scene(POINT_COUNT);
    let summary = tree.validate(&store).expect("Failed to validate hierarchy");
    let transform = ModelTransform::identity();
    let mut out = Vec::with_capacity(summary.max_record_count as usize);

    c.bench_function("collect_overview_100k", |b| {
        b.iter(|| {
            out.clear();
            let written = collect_overview(black_box(&tree), &store, &transform, 14, &mut out)
                .expect("Failed to collect overview");
            black_box(written);
        })
    });
}

criterion_group!(benches, bench_collect_visible, bench_collect_overview);
criterion_main!(benches);
