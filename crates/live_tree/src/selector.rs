//! A small, descendant-only subset of CSS selectors
//!
//! Markers, labels and host regions are all located through fixed structural
//! selectors such as `div.mapboxgl-marker.mapboxgl-marker-anchor-center` or
//! `filter-layer-component div.list-item-group`. Only type, class and id
//! simple selectors joined by the descendant combinator are supported, which is
//! enough to express every locator the overlay needs while staying trivially
//! matchable outside a browser.

use crate::{Result, TreeError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One compound selector: an optional tag, an optional id and any classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    /// Tag name this compound requires, lowercased
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Id this compound requires
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Classes this compound requires
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check whether an element with the given tag, id and classes matches.
    ///
    /// Tag comparison is case-insensitive, ids and classes are exact.
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(wanted) = &self.tag {
            if !wanted.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(wanted) = &self.id {
            if id != Some(wanted.as_str()) {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|class| classes.iter().any(|c| c == class))
    }

    fn parse(step: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let mut rest = step;

        let tag_len = ident_len(rest);
        if tag_len > 0 {
            compound.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        } else if let Some(after) = rest.strip_prefix('*') {
            rest = after;
        }

        while let Some(marker) = rest.chars().next() {
            if marker != '.' && marker != '#' {
                return None;
            }
            let body = &rest[1..];
            let len = ident_len(body);
            if len == 0 {
                return None;
            }
            let name = body[..len].to_string();
            if marker == '.' {
                compound.classes.push(name);
            } else if compound.id.replace(name).is_some() {
                return None;
            }
            rest = &body[len..];
        }

        Some(compound)
    }
}

fn ident_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len())
}

/// A parsed selector: one or more compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    source: String,
    steps: Vec<Compound>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// Fails on empty input and on anything outside the supported subset
    /// (attribute selectors, pseudo-classes, child/sibling combinators).
    pub fn parse(source: &str) -> Result<Self> {
        let steps = source
            .split_whitespace()
            .map(|step| {
                Compound::parse(step).ok_or_else(|| TreeError::InvalidSelector(source.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        if steps.is_empty() {
            return Err(TreeError::InvalidSelector(source.to_string()));
        }

        Ok(Self::from_steps(steps))
    }

    /// Selector matching elements with the given tag
    pub fn element(tag: &str) -> Self {
        Self::from_steps(vec![Compound {
            tag: Some(tag.to_ascii_lowercase()),
            ..Compound::default()
        }])
    }

    /// Selector matching every element
    pub fn any() -> Self {
        Self::from_steps(vec![Compound::default()])
    }

    /// Require a class on the subject compound
    pub fn with_class(mut self, class: &str) -> Self {
        if let Some(subject) = self.steps.last_mut() {
            subject.classes.push(class.to_string());
        }
        self.source = steps_to_css(&self.steps);
        self
    }

    /// Match `inner` only below elements matching `self`
    pub fn descendant(mut self, inner: Selector) -> Self {
        self.steps.extend(inner.steps);
        self.source = steps_to_css(&self.steps);
        self
    }

    fn from_steps(steps: Vec<Compound>) -> Self {
        Self {
            source: steps_to_css(&steps),
            steps,
        }
    }

    /// Normalized CSS text, suitable for `querySelectorAll`
    pub fn as_css(&self) -> &str {
        &self.source
    }

    /// The compounds, outermost first
    pub fn steps(&self) -> &[Compound] {
        &self.steps
    }

    /// The compound the selected element itself must match
    pub fn subject(&self) -> &Compound {
        // parse() rejects empty selectors
        &self.steps[self.steps.len() - 1]
    }

    /// The compounds that must match ancestors, innermost last
    pub fn ancestors(&self) -> &[Compound] {
        &self.steps[..self.steps.len() - 1]
    }
}

fn steps_to_css(steps: &[Compound]) -> String {
    steps
        .iter()
        .map(|step| {
            let mut css = step.tag.clone().unwrap_or_default();
            if let Some(id) = &step.id {
                css.push('#');
                css.push_str(id);
            }
            for class in &step.classes {
                css.push('.');
                css.push_str(class);
            }
            if css.is_empty() {
                css.push('*');
            }
            css
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::parse(&source).map_err(serde::de::Error::custom)
    }
}
