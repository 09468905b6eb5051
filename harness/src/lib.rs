pub mod error;
pub mod frame;
pub mod glutils;
pub mod logging;
pub mod math;
pub mod render;
pub mod shaders;
pub mod system;

pub use error::HarnessError;
