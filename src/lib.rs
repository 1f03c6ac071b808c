pub use grove_core::*;
pub use grove_macros::*;
