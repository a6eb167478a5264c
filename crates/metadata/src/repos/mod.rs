//! Repository traits composing the metadata store.

pub mod bottles;
pub mod brands;
pub mod distilleries;
pub mod geography;

pub use bottles::BottleRepo;
pub use brands::BrandRepo;
pub use distilleries::DistilleryRepo;
pub use geography::GeographyRepo;
