pub mod clock;
pub mod services;
pub mod state;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use state::AppState;
