//! Background Tasks Module
//!
//! Contains background tasks that run periodically while caches are alive.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
