//! Utility functions for SparsePost Core

pub mod path;
