pub mod customization;
pub mod generation;
pub mod job;
