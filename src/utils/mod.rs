//! Utility modules for common functionality
//!
//! This module provides various utility functions and types used throughout the application.

pub mod logger;
pub(crate) mod progress;
pub(crate) mod write_utils;
pub(crate) mod string_utils;
pub(crate) mod tag_utils;
pub mod coordinate_utils;
