//! Course identity and meeting components.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subject + catalog number, e.g. `COEN 243`.
///
/// Always normalised: subject trimmed and upper-cased, catalog trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseKey {
    pub subject: String,
    pub catalog: String,
}

impl CourseKey {
    /// Build a normalised key. Returns `None` if either part is blank.
    pub fn new(subject: &str, catalog: &str) -> Option<Self> {
        let subject = subject.trim();
        let catalog = catalog.trim();
        if subject.is_empty() || catalog.is_empty() {
            return None;
        }
        Some(Self {
            subject: subject.to_uppercase(),
            catalog: catalog.to_string(),
        })
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.catalog)
    }
}

/// Meeting type of a course offering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Lecture,
    #[default]
    Lab,
    Tutorial,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Lecture => "lecture",
            Component::Lab => "lab",
            Component::Tutorial => "tutorial",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = String;

    /// Accepts the lowercase names as well as the registrar's component codes
    /// (`LEC`, `LAB`, `TUT`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lecture" | "lec" => Ok(Component::Lecture),
            "lab" | "laboratory" => Ok(Component::Lab),
            "tutorial" | "tut" => Ok(Component::Tutorial),
            other => Err(format!("Unknown component: {}", other)),
        }
    }
}
