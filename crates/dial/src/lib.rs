//! Circular data-volume selector: the dial control, the plan store it drives, and the
//! country catalog that goes with a plan.

mod macros;

pub mod control;
pub mod countries;
pub mod format;
pub mod geometry;
pub mod plan;
pub mod render;
pub mod spring;
pub mod store;
pub mod tariff;
