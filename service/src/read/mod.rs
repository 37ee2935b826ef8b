//! Read entities definitions.

pub mod message;
