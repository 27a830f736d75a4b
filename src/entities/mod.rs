pub mod ideas;
pub mod members;
pub mod reports;
