use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Weak reference to a book owned by the book service.
///
/// Holding a `BookRef` says nothing about whether the book exists; resolve it
/// through [`crate::book_client::BookServiceClient::resolve_book`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookRef(i64);

impl BookRef {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn id(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub book_id: BookRef,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
}

/// Body of `POST /reviews`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    #[serde(default)]
    #[validate(required(message = "bookId is required"))]
    pub book_id: Option<i64>,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "reviewerName is required"))]
    pub reviewer_name: String,
    #[serde(default)]
    #[validate(custom(function = "rating_in_range"))]
    pub rating: i32,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "comment must not be blank"))]
    pub comment: String,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("not_blank"))
    } else {
        Ok(())
    }
}

fn rating_in_range(rating: i32) -> std::result::Result<(), ValidationError> {
    let (code, message) = match rating {
        1..=5 => return Ok(()),
        r if r < 1 => ("min", "rating must be at least 1"),
        _ => ("max", "rating cannot be more than 5"),
    };
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    Err(error)
}

impl NewReview {
    /// Validate and turn into a stored review with `id`
    pub fn into_review(self, id: i64) -> Result<Review> {
        self.validate()?;
        let book_id = self
            .book_id
            .ok_or_else(|| AppError::Validation("bookId: bookId is required; ".to_string()))?;

        Ok(Review {
            id,
            book_id: BookRef::new(book_id),
            reviewer_name: self.reviewer_name,
            rating: self.rating,
            comment: self.comment,
        })
    }
}

/// Body of `PUT /reviews/{id}`. Only usable fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    pub book_id: Option<i64>,
    pub reviewer_name: Option<String>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

impl ReviewPatch {
    pub fn apply(self, review: &mut Review) {
        if let Some(book_id) = self.book_id {
            review.book_id = BookRef::new(book_id);
        }
        if let Some(name) = self.reviewer_name.filter(|n| !n.trim().is_empty()) {
            review.reviewer_name = name;
        }
        if let Some(rating) = self.rating.filter(|r| (1..=5).contains(r)) {
            review.rating = rating;
        }
        if let Some(comment) = self.comment {
            review.comment = comment;
        }
    }
}
