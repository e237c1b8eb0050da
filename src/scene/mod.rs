pub mod model;
pub mod play;
pub mod reconcile;
