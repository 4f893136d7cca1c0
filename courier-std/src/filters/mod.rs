//! Ready-made command filters.

pub mod logging;
