//! `fl-common` — Shared value types for the Framelane automation engine.
//!
//! This crate is the foundation the automation and timeline crates build on.
//! It defines the core abstractions:
//!
//! - **Intervals**: [`FrameInterval`], the half-open integer frame span all
//!   timeline geometry is expressed in
//! - **Rates**: [`FrameRate`], rational fps for frame/time conversion
//! - **Values**: [`AutomationValue`] and [`ParameterType`], the typed values
//!   animatable parameters carry and the declared ranges they clamp to

pub mod interval;
pub mod rate;
pub mod value;

// Re-export commonly used items at crate root
pub use interval::FrameInterval;
pub use rate::FrameRate;
pub use value::{AutomationValue, ParameterType};
