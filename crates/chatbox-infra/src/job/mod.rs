//! In-process background job queue.

pub mod queue;
