use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub oneline: bool,
}

impl Repository {
    /// Print history from HEAD back to the root commit. An unborn HEAD prints nothing.
    pub fn log(&self, opts: &LogOptions) -> anyhow::Result<()> {
        let head = self.refs().read_head()?;

        for (position, entry) in RevList::new(self.database(), head).into_iter().enumerate() {
            let (commit_oid, commit) = entry?;

            if opts.oneline {
                self.show_commit_oneline(&commit_oid, &commit)?;
            } else {
                if position > 0 {
                    writeln!(self.writer())?;
                }
                self.show_commit_medium(&commit_oid, &commit)?;
            }
        }

        Ok(())
    }

    fn show_commit_medium(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", commit_oid).yellow()
        )?;
        if let Some(author) = commit.author() {
            writeln!(self.writer(), "Author: {}", author.name())?;
            writeln!(self.writer(), "Date:   {}", author.readable_timestamp())?;
        }
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }

        Ok(())
    }

    fn show_commit_oneline(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            commit_oid.to_short_oid().yellow(),
            commit.short_message()
        )?;

        Ok(())
    }
}
