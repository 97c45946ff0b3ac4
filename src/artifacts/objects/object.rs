use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_id(&self) -> Result<ObjectId> {
        Ok(hash_content(&self.serialize()?))
    }
}

/// SHA-1 of the exact bytes, rendered as 40 lowercase hex characters.
pub fn hash_content(content: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(content);

    ObjectId::from_hex_unchecked(format!("{:x}", hasher.finalize()))
}
