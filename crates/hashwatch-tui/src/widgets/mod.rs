//! Shared rendering helpers.

pub mod fmt;
