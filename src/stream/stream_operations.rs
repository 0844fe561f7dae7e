//! Stream Operations - Pure functions for the streaming pipeline
//!
//! The worker thread continuously refills the double buffer from the
//! camera's current pose; consumers read whichever half is free. Every
//! function takes the context explicitly.

use super::stream_data::{
    PointBuffer, PointRecord, SharedStreamContext, StreamBuffers, StreamContext, StreamStats,
};
use crate::camera::CameraData;
use crate::cloud::{PointStore, SphereTree};
use crate::error::EngineResult;
use crate::traversal::{collect_visible, ModelTransform, TraversalConfig};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long a paused worker sleeps between flag checks
pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Build a shared context with both buffer halves preallocated
///
/// `capacity` should come from `TreeSummary::max_record_count` so that no
/// pass ever grows a buffer.
pub fn create_stream_context(
    camera: CameraData,
    transform: ModelTransform,
    config: TraversalConfig,
    capacity: usize,
) -> SharedStreamContext {
    Arc::new(StreamContext {
        camera: RwLock::new(camera),
        transform: RwLock::new(transform),
        buffers: StreamBuffers {
            front: Mutex::new(PointBuffer::with_capacity(capacity)),
            back: Mutex::new(PointBuffer::with_capacity(capacity)),
        },
        active: AtomicBool::new(true),
        paused: AtomicBool::new(false),
        config,
        stats: Mutex::new(StreamStats::default()),
    })
}

/// Start the background fill thread
///
/// The worker alternates front and back fills until `active` clears or a
/// pass fails. Shut it down through `stop_stream_worker`.
pub fn start_stream_worker(
    context: &SharedStreamContext,
    tree: Arc<SphereTree>,
    store: Arc<PointStore>,
) -> JoinHandle<()> {
    let worker_context = Arc::clone(context);
    thread::spawn(move || {
        worker_loop(worker_context, tree, store);
    })
}

/// Wind the worker down and wait out its in-flight pass
pub fn stop_stream_worker(context: &StreamContext, worker: JoinHandle<()>) {
    context.active.store(false, Ordering::Relaxed);
    if worker.join().is_err() {
        log::warn!("[Stream] worker thread panicked");
    }
}

/// Freeze the stream so consumers can inspect a stable view
pub fn lock_view(context: &StreamContext) {
    context.paused.store(true, Ordering::Relaxed);
    log::debug!("[Stream] view locked");
}

/// Resume filling after `lock_view`
pub fn unlock_view(context: &StreamContext) {
    context.paused.store(false, Ordering::Relaxed);
    log::debug!("[Stream] view unlocked");
}

/// Publish a camera pose for subsequent passes
pub fn update_camera(context: &StreamContext, camera: CameraData) {
    *context.camera.write() = camera;
}

/// Publish a model transform for subsequent passes
pub fn update_transform(context: &StreamContext, transform: ModelTransform) {
    *context.transform.write() = transform;
}

/// Whether the worker is still filling buffers
pub fn is_active(context: &StreamContext) -> bool {
    context.active.load(Ordering::Relaxed)
}

/// Snapshot of the rolling statistics
pub fn stream_stats(context: &StreamContext) -> StreamStats {
    *context.stats.lock()
}

/// Read the freshest available view
///
/// Tries the front half without blocking; when the worker holds it, takes
/// a blocking lock on the back half instead. The closure may observe the
/// previous pass, never a half-written buffer.
pub fn with_visible_points<R>(
    buffers: &StreamBuffers,
    consume: impl FnOnce(&[PointRecord]) -> R,
) -> R {
    if let Some(front) = buffers.front.try_lock() {
        consume(&front.records)
    } else {
        let back = buffers.back.lock();
        consume(&back.records)
    }
}

/// Background fill loop
fn worker_loop(context: SharedStreamContext, tree: Arc<SphereTree>, store: Arc<PointStore>) {
    log::info!("[Stream] worker running");
    'run: loop {
        for buffer in [&context.buffers.front, &context.buffers.back] {
            if !context.active.load(Ordering::Relaxed) {
                break 'run;
            }
            while context.paused.load(Ordering::Relaxed) {
                if !context.active.load(Ordering::Relaxed) {
                    break 'run;
                }
                thread::sleep(PAUSE_POLL_INTERVAL);
            }
            if let Err(error) = fill_pass(&context, &tree, &store, buffer) {
                log::error!("[Stream] pass failed, deactivating stream: {}", error);
                context.active.store(false, Ordering::Relaxed);
                break 'run;
            }
        }
    }
    log::info!("[Stream] worker exited");
}

/// Overwrite one buffer half from the current pose
fn fill_pass(
    context: &StreamContext,
    tree: &SphereTree,
    store: &PointStore,
    buffer: &Mutex<PointBuffer>,
) -> EngineResult<()> {
    // One pose per pass; updates land in later passes
    let camera = *context.camera.read();
    let transform = *context.transform.read();

    let started = Instant::now();
    let mut guard = buffer.lock();
    guard.records.clear();
    let written = collect_visible(
        tree,
        store,
        &camera,
        &transform,
        &context.config,
        tree.root(),
        0,
        &mut guard.records,
    )?;
    drop(guard);

    record_pass(context, written, started.elapsed().as_secs_f64());
    Ok(())
}

/// Fold one completed pass into the rolling statistics
fn record_pass(context: &StreamContext, written: usize, seconds: f64) {
    let mut stats = context.stats.lock();
    stats.passes += 1;
    stats.last_point_count = written;
    stats.max_point_count = stats.max_point_count.max(written);
    stats.last_pass_seconds = seconds;
    let completed = stats.passes as f64;
    stats.avg_pass_seconds = (stats.avg_pass_seconds * (completed - 1.0) + seconds) / completed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::init_camera;
    use crate::cloud::{PointSource, TreeSource};
    use cgmath::Point3;

    fn line_store(count: u32) -> PointStore {
        let mut floats = Vec::new();
        for i in 0..count {
            floats.extend_from_slice(&[i as f32, 0.0, 0.0]);
        }
        PointStore::new(PointSource::Owned(floats)).expect("Failed to build point store")
    }

    /// Root sphere at the origin with a two-point leaf per side
    fn two_leaf_tree() -> SphereTree {
        let mut words = vec![2, 5, 0];
        words.extend_from_slice(&[2.0f32.to_bits(), 0, 7, 11]);
        words.extend_from_slice(&[0, 2, 3, 6]);
        words.extend_from_slice(&[0, 2, 9, 12]);
        SphereTree::new(TreeSource::Owned(words)).expect("Failed to build tree")
    }

    fn facing_camera() -> CameraData {
        init_camera(Point3::new(0.0, 0.0, 5.0), -90.0, 0.0)
    }

    fn averted_camera() -> CameraData {
        init_camera(Point3::new(0.0, 0.0, -500.0), -90.0, 0.0)
    }

    fn wait_for(context: &StreamContext, ready: impl Fn(StreamStats) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !ready(stream_stats(context)) {
            assert!(Instant::now() < deadline, "stream made no progress");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_worker_fills_both_halves() {
        let context = create_stream_context(
            facing_camera(),
            ModelTransform::identity(),
            TraversalConfig::default(),
            5,
        );
        let initial_capacity = context.buffers.front.lock().records.capacity();
        let worker =
            start_stream_worker(&context, Arc::new(two_leaf_tree()), Arc::new(line_store(5)));

        wait_for(&context, |stats| stats.passes >= 4);
        stop_stream_worker(&context, worker);

        let front = context.buffers.front.lock();
        let back = context.buffers.back.lock();
        assert_eq!(front.records.len(), 5);
        assert_eq!(front.records, back.records);
        assert_eq!(front.records.capacity(), initial_capacity);

        let stats = stream_stats(&context);
        assert_eq!(stats.last_point_count, 5);
        assert_eq!(stats.max_point_count, 5);
        assert!(stats.avg_pass_seconds >= 0.0);
    }

    #[test]
    fn test_consumer_prefers_front_and_falls_back() {
        let context = create_stream_context(
            facing_camera(),
            ModelTransform::identity(),
            TraversalConfig::default(),
            4,
        );
        let front_record = PointRecord {
            position: [1.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
        };
        let back_record = PointRecord {
            position: [2.0, 0.0, 0.0],
            color: [0.0, 0.0, 0.0],
        };
        context.buffers.front.lock().records.push(front_record);
        context.buffers.back.lock().records.push(back_record);

        let seen = with_visible_points(&context.buffers, |records| records[0]);
        assert_eq!(seen, front_record);

        let _front_held = context.buffers.front.lock();
        let seen = with_visible_points(&context.buffers, |records| records[0]);
        assert_eq!(seen, back_record);
    }

    #[test]
    fn test_front_fills_while_back_is_held() {
        let context = create_stream_context(
            facing_camera(),
            ModelTransform::identity(),
            TraversalConfig::default(),
            5,
        );
        let back_guard = context.buffers.back.lock();
        let worker =
            start_stream_worker(&context, Arc::new(two_leaf_tree()), Arc::new(line_store(5)));

        // The front pass completes even though the back half is held; the
        // worker then blocks on the back guard, leaving the front free
        wait_for(&context, |stats| stats.passes >= 1);
        assert_eq!(context.buffers.front.lock().records.len(), 5);

        drop(back_guard);
        wait_for(&context, |stats| stats.passes >= 2);
        stop_stream_worker(&context, worker);
        assert_eq!(context.buffers.back.lock().records.len(), 5);
    }

    #[test]
    fn test_locked_view_freezes_passes() {
        let context = create_stream_context(
            facing_camera(),
            ModelTransform::identity(),
            TraversalConfig::default(),
            5,
        );
        let worker =
            start_stream_worker(&context, Arc::new(two_leaf_tree()), Arc::new(line_store(5)));
        wait_for(&context, |stats| stats.passes >= 1);

        lock_view(&context);
        // A pass already underway may still land; give it time to drain
        thread::sleep(Duration::from_millis(20));
        let frozen = stream_stats(&context).passes;
        thread::sleep(Duration::from_millis(30));
        assert_eq!(stream_stats(&context).passes, frozen);

        unlock_view(&context);
        wait_for(&context, |stats| stats.passes > frozen);
        stop_stream_worker(&context, worker);
    }

    #[test]
    fn test_failed_pass_deactivates_stream() {
        // Root whose left child offset points past the end of the words
        let words = vec![2, 5, 0, 2.0f32.to_bits(), 0, 900, 11];
        let tree = SphereTree::new(TreeSource::Owned(words)).expect("Failed to build tree");
        let context = create_stream_context(
            facing_camera(),
            ModelTransform::identity(),
            TraversalConfig::default(),
            5,
        );
        let worker = start_stream_worker(&context, Arc::new(tree), Arc::new(line_store(5)));

        let deadline = Instant::now() + Duration::from_secs(5);
        while is_active(&context) {
            assert!(Instant::now() < deadline, "stream never deactivated");
            thread::sleep(Duration::from_millis(1));
        }
        stop_stream_worker(&context, worker);
        assert_eq!(stream_stats(&context).passes, 0);
    }

    #[test]
    fn test_camera_updates_reach_later_passes() {
        let context = create_stream_context(
            facing_camera(),
            ModelTransform::identity(),
            TraversalConfig::default(),
            5,
        );
        let worker =
            start_stream_worker(&context, Arc::new(two_leaf_tree()), Arc::new(line_store(5)));
        wait_for(&context, |stats| stats.passes >= 2);

        update_camera(&context, averted_camera());
        let at_update = stream_stats(&context).passes;
        // A pass begun before the update may still use the old pose; the
        // two after it cover both halves with the new one
        wait_for(&context, |stats| stats.passes >= at_update + 3);
        stop_stream_worker(&context, worker);

        assert!(context.buffers.front.lock().records.is_empty());
        assert!(context.buffers.back.lock().records.is_empty());
        let stats = stream_stats(&context);
        assert_eq!(stats.last_point_count, 0);
        assert_eq!(stats.max_point_count, 5);
    }
}
