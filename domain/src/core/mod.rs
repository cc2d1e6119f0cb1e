//! Core domain concepts shared across all subdomains.
//!
//! - [`input::UserInput`]: a classified line of user input

pub mod input;
