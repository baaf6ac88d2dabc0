use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Hardcoded patterns, always valid
static ISBN_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ISBN(?:-1[03])?:? ").expect("hardcoded ISBN prefix regex is invalid")
});
static ISBN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:97[89][- ]?)?[0-9]{1,5}[- ]?[0-9]+[- ]?[0-9]+[- ]?[0-9X]$")
        .expect("hardcoded ISBN shape regex is invalid")
});
static ISBN13_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^97[89][0-9]{10}$").expect("hardcoded ISBN-13 regex is invalid"));
static THREE_GROUPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]+[- ]){3}").expect("hardcoded group regex is invalid"));
static FOUR_GROUPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]+[- ]){4}").expect("hardcoded group regex is invalid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
}

/// Request body for create and update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: String,
    #[serde(default)]
    #[validate(custom(function = "validate_isbn", message = "Invalid ISBN format"))]
    pub isbn: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
}

fn validate_isbn(isbn: &str) -> std::result::Result<(), ValidationError> {
    if is_valid_isbn(isbn) {
        Ok(())
    } else {
        Err(ValidationError::new("isbn"))
    }
}

impl BookInput {
    pub fn check(&self) -> Result<()> {
        Ok(self.validate()?)
    }

    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            published_year: self.published_year,
        }
    }
}

/// `GET /books/search` parameters. Empty values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookSearch {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year: Option<i32>,
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(year) => year.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl BookSearch {
    pub fn matches(&self, book: &Book) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle.as_deref() {
                None | Some("") => true,
                Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
            }
        }

        contains(&book.title, &self.title)
            && contains(&book.author, &self.author)
            && self
                .year
                .map_or(true, |year| book.published_year == Some(year))
    }
}

/// ISBN-10 or ISBN-13, bare or separated by single dashes or spaces, with an
/// optional `ISBN`, `ISBN-10` or `ISBN-13` label.
pub fn is_valid_isbn(raw: &str) -> bool {
    let body = match ISBN_PREFIX.find(raw) {
        Some(prefix) => &raw[prefix.end()..],
        None => raw,
    };

    fn only(body: &str, extra: &[char]) -> bool {
        body.chars().all(|c| c.is_ascii_digit() || extra.contains(&c))
    }
    let len = body.chars().count();

    let plausible = (len == 10 && only(body, &['X']))
        || (len == 13 && only(body, &['X', '-', ' ']) && THREE_GROUPS.is_match(body))
        || ISBN13_DIGITS.is_match(body)
        || (len == 17 && only(body, &['-', ' ']) && FOUR_GROUPS.is_match(body));

    plausible && ISBN_SHAPE.is_match(body)
}
