//! Demo programs for labkit, shared by the `labkit` binary and its tests.

pub mod error;
pub mod gauss_fit;
pub mod gravity;
pub mod logging;
pub mod noise;
pub mod pi;
pub mod style;

pub use error::{CliError, CliResult};
pub use style::Style;
