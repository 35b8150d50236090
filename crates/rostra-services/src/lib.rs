//! # rostra-services
//!
//! The business layer: debate lifecycle, participation, arguments,
//! voting, and the leaderboard. Everything here works against the
//! `DebateRepo` port, with no I/O of its own and no shared state.
//! Every decision is made from a fresh read inside the operation.

pub mod argument;
pub mod content;
pub mod leaderboard;
pub mod lifecycle;
pub mod participation;
pub mod voting;

pub use argument::Arguments;
pub use leaderboard::{Leaderboard, Window};
pub use lifecycle::{DebateView, Lifecycle};
pub use participation::Participation;
pub use voting::Voting;
