pub mod allocating;
pub mod reporting;
pub mod scheduling;
