//! Store-owning worker and the async handle used by the transport.

/// Event stream types emitted by the runtime.
pub mod events;
/// Handle and worker loop implementation.
pub mod handle;
