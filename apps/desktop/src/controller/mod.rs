//! Controller layer: UI events, transient feedback, and the load/submit/remove orchestration.

pub mod events;
pub mod feedback;
pub mod orchestration;
