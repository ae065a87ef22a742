//! Listed items ("resources") and their catalog views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DisplayName, ResourceId, UserId};

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 120;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 2000;
/// Maximum category length in characters.
pub const CATEGORY_MAX: usize = 40;

const IMAGE_ROOT: &str = "/images";
const DEFAULT_IMAGE_STEM: &str = "default";

/// Validation errors for new listings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("category must be at most {max} characters")]
    CategoryTooLong { max: usize },
}

impl ResourceValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::DescriptionTooLong { .. } => "description",
            Self::EmptyCategory | Self::CategoryTooLong { .. } => "category",
        }
    }
}

/// Validated input for listing a new resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDraft {
    title: String,
    description: String,
    category: String,
}

impl ResourceDraft {
    /// Validate raw listing fields. Title and category are trimmed.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::ResourceDraft;
    ///
    /// let draft = ResourceDraft::new(" Sofa ", "Comfy", "Furniture").unwrap();
    /// assert_eq!(draft.title(), "Sofa");
    /// ```
    pub fn new(
        title: &str,
        description: &str,
        category: &str,
    ) -> Result<Self, ResourceValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ResourceValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ResourceValidationError::TitleTooLong { max: TITLE_MAX });
        }
        if description.chars().count() > DESCRIPTION_MAX {
            return Err(ResourceValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(ResourceValidationError::EmptyCategory);
        }
        if category.chars().count() > CATEGORY_MAX {
            return Err(ResourceValidationError::CategoryTooLong { max: CATEGORY_MAX });
        }
        Ok(Self {
            title: title.to_owned(),
            description: description.to_owned(),
            category: category.to_owned(),
        })
    }

    /// Trimmed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A listed item. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    /// Materialise a draft as a stored resource.
    pub fn from_draft(
        id: ResourceId,
        owner_id: UserId,
        draft: ResourceDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let ResourceDraft {
            title,
            description,
            category,
        } = draft;
        Self {
            id,
            owner_id,
            title,
            description,
            category,
            image_filename: None,
            created_at,
        }
    }

    /// Public URL of the listing image.
    ///
    /// Attached images are served from `/images/<file>`; otherwise a
    /// per-category placeholder `/images/<category>.svg` is used.
    pub fn image_url(&self) -> String {
        match self.image_filename.as_deref().map(str::trim) {
            Some(file) if !file.is_empty() => format!("{IMAGE_ROOT}/{file}"),
            _ => {
                let category = self.category.trim().to_lowercase();
                let stem = if category.is_empty() {
                    DEFAULT_IMAGE_STEM
                } else {
                    category.as_str()
                };
                format!("{IMAGE_ROOT}/{stem}.svg")
            }
        }
    }
}

/// Catalog view of a resource joined with its owner's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceListing {
    pub resource: Resource,
    pub owner_name: DisplayName,
}
