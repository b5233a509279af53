//! Commit object
//!
//! Commits tie a root tree to the history that produced it. On disk:
//!
//! ```text
//! commit <size>\0
//! tree <tree-digest>
//! parent <parent-digest>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Edges point from child to parent: the set of commits reachable through
//! parent lines from any reference is the commit graph. A commit with no
//! parent line is a root commit; more than one denotes a merge.

use crate::artifacts::core::CoreError;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::Timelike;
use std::io::{BufRead, Write};

/// Author or committer identity with timestamp
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    pub fn new(name: String, email: String) -> Self {
        Self::new_with_timestamp(name, email, chrono::Local::now().fixed_offset())
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        // the serialized form carries whole seconds only, so sub-second
        // precision is dropped up front
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);

        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Identity from `GIT_AUTHOR_NAME` / `GIT_AUTHOR_EMAIL`, with an
    /// optional `GIT_AUTHOR_DATE` override.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME").context("GIT_AUTHOR_NAME not set")?;
        let email = std::env::var("GIT_AUTHOR_EMAIL").context("GIT_AUTHOR_EMAIL not set")?;
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// `Name <email> <unix-seconds> <±hhmm>`, the serialized form
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Human-readable form used by `log`
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // "name <email> timestamp timezone"; split from the right so names
        // may contain spaces
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(CoreError::malformed("invalid author line").into());
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| CoreError::malformed("non-numeric author timestamp"))?;
        let name_email = parts[2];

        let email_start = name_email
            .find('<')
            .ok_or_else(|| CoreError::malformed("author line missing '<'"))?;
        let email_end = name_email
            .find('>')
            .ok_or_else(|| CoreError::malformed("author line missing '>'"))?;

        let name = name_email[..email_start].trim().to_string();
        let email = name_email[email_start + 1..email_end].to_string();

        let offset: chrono::FixedOffset = timezone
            .parse()
            .map_err(|_| CoreError::malformed("invalid author timezone"))?;
        let timestamp = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| CoreError::malformed("author timestamp out of range"))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Snapshot pointer: one tree, zero or more parents, identity and message
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs: empty for the root commit, several for a merge
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        // trailing newlines would not survive the line-oriented wire form
        let message = message.trim_end_matches('\n').to_string();

        Commit {
            parents,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    /// First line of the message, for one-line displays
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid));
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        let content_bytes = lines.join("\n").into_bytes();

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)
            .map_err(|_| CoreError::malformed("commit payload is not valid UTF-8"))?;
        let mut lines = content.lines();

        let tree_line = lines
            .next()
            .ok_or_else(|| CoreError::malformed("commit missing tree line"))?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .ok_or_else(|| CoreError::malformed("commit tree line has wrong prefix"))?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        // zero or more parent lines, then the author line
        let mut parents = Vec::new();
        let mut next_line = lines
            .next()
            .ok_or_else(|| CoreError::malformed("commit missing author line"))?;

        while let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent_oid.to_string())?);

            next_line = lines
                .next()
                .ok_or_else(|| CoreError::malformed("commit missing author line"))?;
        }

        let author = next_line
            .strip_prefix("author ")
            .ok_or_else(|| CoreError::malformed("commit author line has wrong prefix"))?;
        let author = Author::try_from(author)?;

        let committer_line = lines
            .next()
            .ok_or_else(|| CoreError::malformed("commit missing committer line"))?;
        let committer = committer_line
            .strip_prefix("committer ")
            .ok_or_else(|| CoreError::malformed("commit committer line has wrong prefix"))?;
        let committer = Author::try_from(committer)?;

        // skip the blank separator line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Commit {
            parents,
            tree_oid,
            author,
            committer,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> anyhow::Result<String> {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid));
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        Ok(lines.join("\n"))
    }
}
