pub mod goal_manager;
pub mod time;
pub mod utils;

pub use goal_manager::{Applied, GoalManager};
pub use time::{Clock, FixedClock, SystemClock};
