//! HTTP request handlers.

pub mod bottles;
pub mod brands;
pub mod common;
pub mod distilleries;
pub mod geography;
pub mod health;

pub use bottles::*;
pub use brands::*;
pub use distilleries::*;
pub use geography::*;
pub use health::*;
