pub mod conferences;
pub mod home;

pub use conferences::*;
pub use home::*;
