pub mod fakes;
pub mod support;
