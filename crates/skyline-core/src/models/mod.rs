pub mod attachment;
pub mod certification;
pub mod form;
pub mod guest;
pub mod submission;
