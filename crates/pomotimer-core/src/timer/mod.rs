pub mod clock;
pub mod cycle;
mod driver;
mod engine;
mod mode;
pub mod settings;

pub use cycle::{upcoming, PlannedInterval, MAX_PLAN_LEN};
pub use driver::{TimerDriver, TimerHandle};
pub use engine::{Command, TimerEngine, TimerSnapshot};
pub use mode::{ParseModeError, TimerMode};
pub use settings::Settings;
