//! Double-buffered point streaming following DOP principles
//!
//! A background worker walks the hierarchy against the latest camera pose
//! and alternates between two record buffers; consumers take whichever
//! half is free. Data lives in `stream_data`, behavior in
//! `stream_operations`.

pub mod stream_data;
pub mod stream_operations;

// Shared state
pub use stream_data::{
    PointBuffer, PointRecord, SharedStreamContext, StreamBuffers, StreamContext, StreamStats,
};

// Worker lifecycle
pub use stream_operations::{
    create_stream_context, start_stream_worker, stop_stream_worker, PAUSE_POLL_INTERVAL,
};

// Consumer interface
pub use stream_operations::{
    is_active, lock_view, stream_stats, unlock_view, update_camera, update_transform,
    with_visible_points,
};
