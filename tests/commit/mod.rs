mod nothing_to_commit;
mod write_commit_object_successfully;
