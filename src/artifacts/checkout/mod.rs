//! Checkout operations
//!
//! Materializing a stored tree into the working directory. Files present in
//! the tree are created or overwritten; anything else in the working
//! directory is left alone.

pub mod restore;
