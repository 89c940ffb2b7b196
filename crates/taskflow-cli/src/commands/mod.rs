pub mod demo;
pub mod layout;
