pub mod conference;
pub mod deadline;

pub use conference::*;
pub use deadline::*;
