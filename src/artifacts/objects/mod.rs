//! Object model
//!
//! Three kinds of write-once objects live in the object store:
//!
//! - **Blob**: raw file content, no name or mode
//! - **Tree**: a flat, path-sorted list of `<blob_hash> <path>` lines
//! - **Commit**: a tree hash, an optional single parent, optional author, and a message
//!
//! Objects are not self-describing: the serialized bytes carry no type header, and the
//! identity of an object is the SHA-1 of exactly those bytes. Callers always know which
//! kind they expect from the reference that led them to the hash.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_kind;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
