pub mod conferences;
pub mod deadlines;
pub mod web;

pub use conferences::*;
pub use deadlines::*;
