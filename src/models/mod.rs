pub mod event;
pub mod range;
pub mod term;
