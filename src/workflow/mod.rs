pub mod reconciler;
pub mod season_ctx;

pub use reconciler::{apply_carries, reconcile_row, Carry, OngoingMap, RowOutcome};
pub use season_ctx::SeasonContext;
