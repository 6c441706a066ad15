pub mod conference;
pub mod country;
pub mod normalize;

pub use conference::*;
pub use country::*;
pub use normalize::*;
