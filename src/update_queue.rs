//! Update queue - serialized cursor mutation
//!
//! Every mutation of the cursor (ticks, resets, animation completions) is a
//! command on a single channel consumed by one worker task, so at most one
//! mutation of the cursor state is in flight at any time. Animation
//! completions arrive from the renderer's own thread and are funnelled through
//! the same channel instead of touching the cursor directly.

mod actor;
mod actor_handle;
mod commands;

pub use actor::UpdateQueue;
pub use actor_handle::UpdateQueueHandle;
pub use commands::{CursorCommand, SubscriberFn};
