pub mod state;

pub use state::SessionTracker;
