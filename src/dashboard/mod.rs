//! Admin dashboard: fetched state, refresh cadence, admin actions and the
//! rendered view.

pub mod controller;
pub mod refresh;
pub mod render;
pub mod state;

pub use controller::{DashboardController, DashboardOptions};
pub use render::DashboardView;
pub use state::Selection;
