//! PokéBlog Library
//!
//! This module exposes the application modules to the binary and to
//! integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod favorites;
pub mod logging;
pub mod router;
pub mod ui;
