//! Auto-rotating carousel engine.
//!
//! The engine cycles through an ordered [`SlideSet`], blending from the current
//! slide to the next one on a fixed interval. It is split into four parts:
//!
//! - **Sequencer** (`slides`): wraparound index arithmetic over an immutable slide list
//! - **Scheduler** (`scheduler`): one repeating timer per instance, restartable and idempotently stoppable
//! - **Transitions** (`transition`): a single epoch-tagged blend value per instance
//! - **Lifecycle** (`engine`): mount, input updates, visibility pause and teardown
//!
//! ## State Machine
//!
//! ```text
//! Uninitialized --mount(n > 1)--> Holding --tick--> Transitioning --complete--> Holding
//! Uninitialized --mount(n == 1)--> Static
//! Uninitialized --mount(n == 0)--> Empty
//! any --update_inputs(new set)--> remount from slide 0
//! Holding/Transitioning --hide--> Paused --show--> Holding
//! any --unmount--> TornDown
//! ```
//!
//! The engine never reads a clock. Hosts pass a monotonic `now` into every call
//! that schedules or samples, which keeps the engine deterministic under test
//! and under simulated time.

pub mod engine;
pub mod error;
pub mod scheduler;
pub mod slides;
pub mod state;
pub mod transition;

pub use engine::{Carousel, CarouselEvent};
pub use error::{CarouselError, validate_timing};
pub use scheduler::{RotationScheduler, TimerHandle, TimerId};
pub use slides::{Slide, SlideSet, advance, next_index};
pub use state::{Phase, Snapshot};
pub use transition::{BlendStyle, ProgressDriver, TransitionController, TransitionId};
