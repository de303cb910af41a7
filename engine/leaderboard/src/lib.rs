//! Leaderboard - per-group aggregation and ranked views
//!
//! Pure given its inputs: for each group member it splits stage points into
//! settled and live components, derives the all-time figure from settled
//! stage totals only, ranks the stage and overall views, and filters each
//! member's predictions through the visibility policy (own/admin always;
//! Final hidden until the reveal timestamp; otherwise open once the stage
//! has kicked off or everyone has submitted).

pub mod builder;
pub mod types;
pub mod visibility;

pub use builder::{build_leaderboard, LeaderboardInputs};
pub use types::{Leaderboard, LeaderboardEntry, Viewer};
pub use visibility::VisibilityPolicy;
