use git2::Oid;
use std::fmt;

/// Whether a tag is its own object or a plain ref
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Annotated,
    Lightweight,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Annotated => write!(f, "ANNOTATED"),
            TagKind::Lightweight => write!(f, "LIGHTWEIGHT"),
        }
    }
}

/// A tag as read from the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    /// Short tag name, without `refs/tags/`
    pub name: String,
    /// Commit the tag resolves to
    pub target: Oid,
    /// Id of the tag object; present only for annotated tags
    pub peeled: Option<Oid>,
    /// Tagger time in seconds since the epoch, annotated tags only
    pub tagger_time: Option<i64>,
}

impl TagRef {
    /// Create a lightweight tag pointing at `target`
    pub fn lightweight(name: impl Into<String>, target: Oid) -> Self {
        TagRef {
            name: name.into(),
            target,
            peeled: None,
            tagger_time: None,
        }
    }

    /// Create an annotated tag whose object `tag_object` points at `target`
    pub fn annotated(
        name: impl Into<String>,
        target: Oid,
        tag_object: Oid,
        tagger_time: Option<i64>,
    ) -> Self {
        TagRef {
            name: name.into(),
            target,
            peeled: Some(tag_object),
            tagger_time,
        }
    }

    pub fn kind(&self) -> TagKind {
        if self.peeled.is_some() {
            TagKind::Annotated
        } else {
            TagKind::Lightweight
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.kind() == TagKind::Annotated
    }
}
