pub mod bounds;
pub mod debounce;
pub mod watcher;

pub use bounds::{Bounds, BoundsFilter, Viewport};
pub use watcher::{MapUpdate, ViewportWatcher};
