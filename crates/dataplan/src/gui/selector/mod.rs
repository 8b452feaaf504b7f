pub mod model;
pub mod view;

pub use model::State;
pub use view::draw;

/// Frame interval of the settle animation.
pub const FRAME_INTERVAL_MS: u64 = 16;
