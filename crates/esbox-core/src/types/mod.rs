//! Core type definitions used across the ESBox workspace.

pub mod id;

pub use id::*;
