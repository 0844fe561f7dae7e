//! Example walking the full streaming pipeline on a synthetic cloud
//!
//! Builds a small two-cluster cloud on disk, loads it through the viewer
//! configuration, and drives the stream worker through a few camera poses
//! to show how the visible record counts respond.

use cgmath::Point3;
use emberpoint::{
    collect_overview, create_stream_context, init_camera, init_camera_from_config, is_active,
    lock_view, open_cloud, start_stream_worker, stop_stream_worker, stream_stats, unlock_view,
    update_camera, with_visible_points, SharedStreamContext, ViewerConfig,
};
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Two point clusters around (-2, 0, 0) and (2, 0, 0), with representative
/// points for the root and both cluster spheres stored up front
fn cluster_positions() -> Vec<f32> {
    let mut floats = vec![
        0.0, 0.0, 0.0, // root representative
        -2.0, 0.0, 0.0, // left cluster representative
        2.0, 0.0, 0.0, // right cluster representative
    ];
    for side in [-2.0f32, 2.0] {
        for i in 0..6 {
            let angle = i as f32 * std::f32::consts::TAU / 6.0;
            floats.extend_from_slice(&[side + 0.3 * angle.cos(), 0.3 * angle.sin(), 0.0]);
        }
    }
    floats
}

/// Hierarchy over the cluster cloud: root, one sphere per cluster, and a
/// three-point leaf pair under each sphere
fn cluster_hierarchy() -> Vec<u32> {
    let mut words = vec![3, 15, 0];
    words.extend_from_slice(&[4.0f32.to_bits(), 0, 7, 11]); // root
    words.extend_from_slice(&[1.0f32.to_bits(), 3, 15, 20]); // left cluster
    words.extend_from_slice(&[1.0f32.to_bits(), 6, 25, 30]); // right cluster
    words.extend_from_slice(&[0, 3, 9, 12, 15]);
    words.extend_from_slice(&[0, 3, 18, 21, 24]);
    words.extend_from_slice(&[0, 3, 27, 30, 33]);
    words.extend_from_slice(&[0, 3, 36, 39, 42]);
    words
}

fn wait_for_passes(context: &SharedStreamContext, target: u64) {
    while stream_stats(context).passes < target && is_active(context) {
        thread::sleep(Duration::from_millis(1));
    }
}

fn main() {
    // Initialize logging
    env_logger::init();

    println!("Emberpoint Streaming Tour");
    println!("=========================");

    // Write the synthetic cloud where the configuration will find it
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tree_path = dir.path().join("clusters.tree");
    let points_path = dir.path().join("clusters.points");

    let mut tree_file = File::create(&tree_path).expect("Failed to create hierarchy file");
    for word in cluster_hierarchy() {
        tree_file
            .write_all(&word.to_le_bytes())
            .expect("Failed to write hierarchy");
    }
    drop(tree_file);

    let mut points_file = File::create(&points_path).expect("Failed to create position file");
    for float in cluster_positions() {
        points_file
            .write_all(&float.to_le_bytes())
            .expect("Failed to write positions");
    }
    drop(points_file);

    let config_path = dir.path().join("emberpoint.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
overview_depth = 1

[cloud]
tree = "{}"
points = "{}"

[camera]
initial_position = [0.0, 0.0, 6.0]
"#,
            tree_path.display(),
            points_path.display()
        ),
    )
    .expect("Failed to write configuration");

    let config = ViewerConfig::load(&config_path).expect("Failed to load configuration");
    let (tree, store, summary) =
        open_cloud(&config.cloud.tree, &config.cloud.points).expect("Failed to open cloud");
    println!("\nCloud validated:");
    println!("  Internal nodes: {}", summary.internal_nodes);
    println!("  Leaves: {}", summary.leaf_nodes);
    println!("  Leaf points: {}", summary.leaf_points);
    println!("  Worst-case pass: {} records", summary.max_record_count);

    // Coarse sketch before any streaming starts
    let transform = config.model_transform();
    let mut overview = Vec::new();
    let sketched =
        collect_overview(&tree, &store, &transform, config.overview_depth, &mut overview)
            .expect("Failed to collect overview");
    println!(
        "\nOverview at depth {}: {} positions",
        config.overview_depth, sketched
    );

    // Stream from the configured start pose; both clusters are in view
    let capacity = config
        .buffer_capacity
        .unwrap_or(summary.max_record_count as usize);
    let context = create_stream_context(
        init_camera_from_config(&config.camera),
        transform,
        config.traversal_config(),
        capacity,
    );
    let worker = start_stream_worker(&context, Arc::new(tree), Arc::new(store));

    wait_for_passes(&context, 2);
    let visible = with_visible_points(&context.buffers, |records| records.len());
    println!("\nBoth clusters in view: {} records", visible);

    // Move next to the left cluster; the right one leaves the frustum
    update_camera(&context, init_camera(Point3::new(-2.0, 0.0, 1.5), -90.0, 0.0));
    let at_update = stream_stats(&context).passes;
    wait_for_passes(&context, at_update + 3);
    let visible = with_visible_points(&context.buffers, |records| records.len());
    println!("Left cluster only: {} records", visible);

    // Freeze the view; consumers see a stable buffer while it holds
    lock_view(&context);
    let frozen = stream_stats(&context).passes;
    thread::sleep(Duration::from_millis(20));
    println!(
        "View locked: passes held at {} (was {})",
        stream_stats(&context).passes,
        frozen
    );
    unlock_view(&context);

    wait_for_passes(&context, frozen + 2);
    stop_stream_worker(&context, worker);

    let stats = stream_stats(&context);
    println!("\nFinal statistics:");
    println!("  Passes: {}", stats.passes);
    println!("  Last pass: {} records", stats.last_point_count);
    println!("  Largest pass: {} records", stats.max_point_count);
    println!("  Average pass time: {:.6}s", stats.avg_pass_seconds);
}
