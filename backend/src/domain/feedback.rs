//! Feedback entry data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::Username;

/// Validation errors returned by the feedback newtype constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyContent,
}

impl fmt::Display for FeedbackValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
        }
    }
}

impl std::error::Error for FeedbackValidationError {}

/// Maximum allowed length for a feedback title.
pub const TITLE_MAX: usize = 100;

/// Database-assigned feedback identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(i32);

impl FeedbackId {
    /// Wrap a raw identifier, e.g. from a path segment or a database row.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short headline of a feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedbackTitle(String);

impl FeedbackTitle {
    /// Validate and construct a [`FeedbackTitle`] from owned input.
    pub fn new(title: impl Into<String>) -> Result<Self, FeedbackValidationError> {
        Self::from_owned(title.into())
    }

    fn from_owned(title: String) -> Result<Self, FeedbackValidationError> {
        if title.trim().is_empty() {
            return Err(FeedbackValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(FeedbackValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for FeedbackTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FeedbackTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FeedbackTitle> for String {
    fn from(value: FeedbackTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for FeedbackTitle {
    type Error = FeedbackValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Body of a feedback entry. Unbounded length, but never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedbackContent(String);

impl FeedbackContent {
    /// Validate and construct [`FeedbackContent`] from owned input.
    pub fn new(content: impl Into<String>) -> Result<Self, FeedbackValidationError> {
        Self::from_owned(content.into())
    }

    fn from_owned(content: String) -> Result<Self, FeedbackValidationError> {
        if content.trim().is_empty() {
            return Err(FeedbackValidationError::EmptyContent);
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for FeedbackContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FeedbackContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FeedbackContent> for String {
    fn from(value: FeedbackContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for FeedbackContent {
    type Error = FeedbackValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Persisted feedback entry.
///
/// ## Invariants
/// - `owner` references an existing user, enforced by referential integrity
///   in the persistence layer.
/// - `id` and `owner` never change after creation; only title and content
///   are mutable, and only through the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    id: FeedbackId,
    title: FeedbackTitle,
    content: FeedbackContent,
    owner: Username,
}

impl Feedback {
    /// Build a [`Feedback`] from validated components.
    pub fn new(
        id: FeedbackId,
        title: FeedbackTitle,
        content: FeedbackContent,
        owner: Username,
    ) -> Self {
        Self {
            id,
            title,
            content,
            owner,
        }
    }

    /// Database-assigned identifier.
    pub fn id(&self) -> FeedbackId {
        self.id
    }

    /// Headline.
    pub fn title(&self) -> &FeedbackTitle {
        &self.title
    }

    /// Body.
    pub fn content(&self) -> &FeedbackContent {
        &self.content
    }

    /// Identity of the single user permitted to modify this entry.
    pub fn owner(&self) -> &Username {
        &self.owner
    }
}

/// A feedback entry that has not been persisted yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub title: FeedbackTitle,
    pub content: FeedbackContent,
    pub owner: Username,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", FeedbackValidationError::EmptyTitle)]
    #[case("   ", FeedbackValidationError::EmptyTitle)]
    #[case("t".repeat(101), FeedbackValidationError::TitleTooLong { max: TITLE_MAX })]
    fn invalid_titles_are_rejected(
        #[case] title: impl Into<String>,
        #[case] expected: FeedbackValidationError,
    ) {
        let err = FeedbackTitle::new(title).expect_err("invalid title must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn blank_content_is_rejected() {
        let err = FeedbackContent::new("  ").expect_err("blank content must fail");
        assert_eq!(err, FeedbackValidationError::EmptyContent);
    }

    #[test]
    fn title_at_the_limit_is_accepted() {
        let title = FeedbackTitle::new("t".repeat(100)).expect("title of 100 chars is valid");
        assert_eq!(title.as_ref().len(), 100);
    }
}
