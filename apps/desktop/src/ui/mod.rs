//! View layer: sanitizing, the node tree, roster rendering, and terminal layout.

pub mod render;
pub mod sanitize;
pub mod terminal;
pub mod view;
