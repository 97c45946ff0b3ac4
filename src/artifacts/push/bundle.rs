//! Object bundle sent along with a push: a gzip-compressed tar archive with one
//! entry per object, named by its hash and holding its raw (uncompressed) bytes.

use crate::areas::database::Database;
use crate::artifacts::push::walker::PushSet;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use tar::Header;

pub fn bundle_objects(database: &Database, push_set: &PushSet) -> anyhow::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());

    for object in push_set.objects() {
        let content = database.load(&object.oid)?;

        let mut header = Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_size(content.len() as u64);
        builder.append_data(&mut header, object.oid.as_ref(), content.as_ref())?;
    }

    builder.finish()?;
    let tar_bytes = builder.into_inner()?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes)?;
    let bundle = encoder.finish()?;
    tracing::debug!(objects = push_set.len(), bytes = bundle.len(), "bundled objects");

    Ok(bundle)
}
