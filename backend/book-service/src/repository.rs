use crate::error::{AppError, Result};
use crate::models::{Book, BookInput};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Book storage
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Book>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>>;
    async fn create(&self, input: BookInput) -> Result<Book>;
    /// `None` when no book has `id`
    async fn update(&self, id: i64, input: BookInput) -> Result<Option<Book>>;
    /// `false` when no book has `id`
    async fn delete(&self, id: i64) -> Result<bool>;
    /// Liveness check used by `/admin/healthcheck`
    async fn ping(&self) -> Result<()>;
}

/// Process-local store ordered by id
#[derive(Default)]
pub struct InMemoryBookRepository {
    books: RwLock<BTreeMap<i64, Book>>,
    next_id: AtomicI64,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn isbn_taken(books: &BTreeMap<i64, Book>, isbn: Option<&str>, except: Option<i64>) -> bool {
        let Some(isbn) = isbn else {
            return false;
        };
        books
            .values()
            .any(|b| Some(b.id) != except && b.isbn.as_deref() == Some(isbn))
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn create(&self, input: BookInput) -> Result<Book> {
        let mut books = self.books.write().await;
        if Self::isbn_taken(&books, input.isbn.as_deref(), None) {
            return Err(AppError::Conflict("A book with this ISBN already exists".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let book = input.into_book(id);
        books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i64, input: BookInput) -> Result<Option<Book>> {
        let mut books = self.books.write().await;
        if !books.contains_key(&id) {
            return Ok(None);
        }
        if Self::isbn_taken(&books, input.isbn.as_deref(), Some(id)) {
            return Err(AppError::Conflict("A book with this ISBN already exists".to_string()));
        }

        let book = input.into_book(id);
        books.insert(id, book.clone());
        Ok(Some(book))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.books.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        let _guard = self.books.read().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, isbn: Option<&str>) -> BookInput {
        BookInput {
            title: title.to_string(),
            author: "Author".to_string(),
            isbn: isbn.map(str::to_string),
            published_year: Some(2001),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryBookRepository::new();
        let a = repo.create(input("A", None)).await.unwrap();
        let b = repo.create(input("B", None)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_isbn_conflicts() {
        let repo = InMemoryBookRepository::new();
        repo.create(input("A", Some("9780306406157")))
            .await
            .unwrap();

        let err = repo
            .create(input("B", Some("9780306406157")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_own_isbn() {
        let repo = InMemoryBookRepository::new();
        let book = repo
            .create(input("A", Some("9780306406157")))
            .await
            .unwrap();

        let updated = repo
            .update(book.id, input("A2", Some("9780306406157")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.id, book.id);
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let repo = InMemoryBookRepository::new();
        assert!(repo.find_by_id(42).await.unwrap().is_none());
        assert!(repo.update(42, input("A", None)).await.unwrap().is_none());
        assert!(!repo.delete(42).await.unwrap());
    }
}
