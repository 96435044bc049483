//! Structured issue locations.
//!
//! Validators build locations from typed segments and only render them to the
//! dotted/bracketed string form when an [`Issue`](crate::Issue) is created.

use std::fmt;

use crate::schema::Composition;

/// One step into the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A plain mapping key: `.key`
    Key(String),
    /// A URL template under `paths`: `./users/{id}`
    PathTemplate(String),
    /// A named schema property: `.properties.name`
    Property(String),
    /// Array element schema: `.items`
    Items,
    /// Position in a sequence: `[3]`
    Index(usize),
    /// Member of a composition: `.allOf[1]`
    Composition(Composition, usize),
}

/// A path into the document, rendered as e.g.
/// `paths./pets/{petId}.get.parameters[0]` or
/// `components.schemas.Pet.properties.tags.items`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    segments: Vec<Segment>,
}

impl Location {
    /// The document root. Renders as an empty string.
    pub fn root() -> Self {
        Self::default()
    }

    /// A location made of top-level keys, e.g. `Location::of(&["info", "version"])`.
    pub fn of(keys: &[&str]) -> Self {
        keys.iter().fold(Self::root(), |loc, key| loc.key(*key))
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(Segment::Key(key.into()))
    }

    pub fn path_template(&self, template: impl Into<String>) -> Self {
        self.with(Segment::PathTemplate(template.into()))
    }

    pub fn property(&self, name: impl Into<String>) -> Self {
        self.with(Segment::Property(name.into()))
    }

    pub fn items(&self) -> Self {
        self.with(Segment::Items)
    }

    pub fn index(&self, index: usize) -> Self {
        self.with(Segment::Index(index))
    }

    pub fn composition(&self, kind: Composition, index: usize) -> Self {
        self.with(Segment::Composition(kind, index))
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            let dot = if i == 0 { "" } else { "." };
            match segment {
                Segment::Key(key) | Segment::PathTemplate(key) => write!(f, "{dot}{key}")?,
                Segment::Property(name) => write!(f, "{dot}properties.{name}")?,
                Segment::Items => write!(f, "{dot}items")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Composition(kind, index) => {
                    write!(f, "{dot}{}[{index}]", kind.keyword())?
                }
            }
        }
        Ok(())
    }
}
