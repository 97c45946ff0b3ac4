//! Commit object
//!
//! A commit records one tree, at most one parent (history is strictly linear), an
//! optional author line and a message.
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>          (absent on root commits)
//! author <name> <unix-ts>      (optional)
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io::BufRead;

pub const AUTHOR_NAME_ENV: &str = "MGIT_AUTHOR_NAME";
pub const AUTHOR_DATE_ENV: &str = "MGIT_AUTHOR_DATE";

/// Author name and the moment the commit was recorded (second precision).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    timestamp: DateTime<Utc>,
}

impl Author {
    pub fn new(name: String) -> Self {
        Author {
            name,
            timestamp: DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default(),
        }
    }

    pub fn new_with_timestamp(name: String, timestamp: DateTime<Utc>) -> Self {
        Author { name, timestamp }
    }

    /// Resolve the author from `MGIT_AUTHOR_NAME` (falling back to the configured
    /// username) and `MGIT_AUTHOR_DATE` (unix seconds or RFC 3339).
    ///
    /// Returns `None` when no name is available; the author line is then omitted.
    pub fn load_from_env(fallback_name: Option<&str>) -> anyhow::Result<Option<Self>> {
        Self::resolve(
            std::env::var(AUTHOR_NAME_ENV).ok(),
            fallback_name,
            std::env::var(AUTHOR_DATE_ENV).ok(),
        )
    }

    fn resolve(
        name: Option<String>,
        fallback_name: Option<&str>,
        date: Option<String>,
    ) -> anyhow::Result<Option<Self>> {
        let name = name
            .or_else(|| fallback_name.map(str::to_string))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let Some(name) = name else {
            return Ok(None);
        };
        Self::check_single_line(&name)?;

        match date {
            Some(date) => Ok(Some(Author::new_with_timestamp(
                name,
                Self::parse_date(&date)?,
            ))),
            None => Ok(Some(Author::new(name))),
        }
    }

    /// The name is written into a header line, so it must not break that line.
    fn check_single_line(name: &str) -> anyhow::Result<()> {
        if name.contains(['\n', '\r']) {
            anyhow::bail!("author name must be a single line: {name:?}");
        }

        Ok(())
    }

    fn parse_date(date: &str) -> anyhow::Result<DateTime<Utc>> {
        if let Ok(seconds) = date.trim().parse::<i64>() {
            return DateTime::from_timestamp(seconds, 0)
                .with_context(|| format!("{AUTHOR_DATE_ENV} out of range: {date}"));
        }

        DateTime::parse_from_rfc3339(date.trim())
            .map(|date| date.with_timezone(&Utc))
            .with_context(|| format!("invalid {AUTHOR_DATE_ENV}: {date}"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Serialized form: `<name> <unix-ts>`
    pub fn display(&self) -> String {
        format!("{} {}", self.name, self.timestamp.timestamp())
    }

    /// Like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // the name may contain spaces, the timestamp never does
        let (name, timestamp) = value
            .rsplit_once(' ')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format"))?;
        let timestamp = timestamp
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let timestamp = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?;

        Ok(Author::new_with_timestamp(name.to_string(), timestamp))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Option<Author>,
    message: String,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Option<Author>,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author,
            message,
        }
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];

        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        if let Some(author) = &self.author {
            lines.push(format!("author {}", author.display()));
        }

        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        if let Some(author) = &self.author {
            Author::check_single_line(author.name())?;
        }

        let mut object_content = self.header_lines();
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        Ok(Bytes::from(object_content.join("\n")))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content).context("Invalid commit object: not UTF-8")?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing blank line after headers")?;
        let mut headers = headers.lines();

        let tree_oid = headers
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .context("Invalid commit object: missing tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut parent = None;
        let mut author = None;
        for line in headers {
            if let Some(parent_oid) = line.strip_prefix("parent ") {
                if parent.is_some() {
                    anyhow::bail!("Invalid commit object: more than one parent");
                }
                parent = Some(ObjectId::try_parse(parent_oid.to_string())?);
            } else if let Some(author_line) = line.strip_prefix("author ") {
                author = Some(Author::try_from(author_line)?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected header {line:?}");
            }
        }

        Ok(Self::new(parent, tree_oid, author, message.to_string()))
    }
}

impl Object for Commit {}
