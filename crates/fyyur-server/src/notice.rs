//! One-shot user notices attached to the page a write falls through to.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn listed(subject: &str) -> Self {
        Self::success(format!("{subject} was successfully listed!"))
    }

    pub fn listing_failed(subject: &str) -> Self {
        Self::error(format!("An error occurred. {subject} could not be listed."))
    }

    pub fn updated(subject: &str) -> Self {
        Self::success(format!("{subject} was successfully updated!"))
    }

    pub fn update_failed(subject: &str) -> Self {
        Self::error(format!("An error occurred. {subject} could not be updated."))
    }

    /// `entity` is the lowercase kind, e.g. `"venue"`.
    pub fn deleted(entity: &str) -> Self {
        Self::success(format!("The {entity} was successfully deleted!"))
    }

    pub fn delete_failed(entity: &str) -> Self {
        Self::error(format!("An error occurred. The {entity} could not be deleted."))
    }

    pub fn unavailable() -> Self {
        Self::error("An error occurred. The page could not be loaded.")
    }
}

/// "Venue The Musical Hop", or just "Venue" when no name was submitted.
pub fn subject(entity: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{entity} {name}"),
        None => entity.to_string(),
    }
}
