//! Checkout operations
//!
//! Switching commits is planned in full before the working directory is changed:
//! all objects of the target are loaded and verified first, so a corrupt object
//! graph is reported without leaving a half-applied tree behind.

pub mod migration;
