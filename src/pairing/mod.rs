pub mod filters;
pub mod insights;
pub mod matcher;
pub mod profiles;
pub mod ranges;
pub mod result;
pub mod utils;

pub use insights::*;
pub use matcher::*;
pub use profiles::*;
pub use ranges::*;
pub use result::*;
