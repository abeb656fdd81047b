/// Standalone approximate primitives
/// Streaming estimators kept as a library module; the query executor does
/// not drive them, they back future APPROX_* aggregate extensions
pub mod bloom;
pub mod count_min;
pub mod histogram;
pub mod hll;

pub use bloom::*;
pub use count_min::*;
pub use histogram::*;
pub use hll::*;
