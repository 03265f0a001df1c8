//! # Quill Shared
//!
//! View models and form schemas shared between the server and any
//! front-end renderer.

pub mod forms;
pub mod response;
pub mod views;

pub use response::ErrorResponse;
