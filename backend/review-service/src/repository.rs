use crate::error::Result;
use crate::models::{BookRef, NewReview, Review, ReviewPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Review>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Review>>;
    async fn find_by_book(&self, book: BookRef) -> Result<Vec<Review>>;
    /// Validates `input` before storing it
    async fn create(&self, input: NewReview) -> Result<Review>;
    async fn update(&self, id: i64, patch: ReviewPatch) -> Result<Option<Review>>;
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn ping(&self) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: RwLock<BTreeMap<i64, Review>>,
    next_id: AtomicI64,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_all(&self) -> Result<Vec<Review>> {
        Ok(self.reviews.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Review>> {
        Ok(self.reviews.read().await.get(&id).cloned())
    }

    async fn find_by_book(&self, book: BookRef) -> Result<Vec<Review>> {
        Ok(self
            .reviews
            .read()
            .await
            .values()
            .filter(|r| r.book_id == book)
            .cloned()
            .collect())
    }

    async fn create(&self, input: NewReview) -> Result<Review> {
        let mut reviews = self.reviews.write().await;
        // Ids are only taken by valid input
        let review = input.into_review(0)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let review = Review { id, ..review };
        reviews.insert(id, review.clone());
        Ok(review)
    }

    async fn update(&self, id: i64, patch: ReviewPatch) -> Result<Option<Review>> {
        let mut reviews = self.reviews.write().await;
        Ok(reviews.get_mut(&id).map(|review| {
            patch.apply(review);
            review.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.reviews.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        let _guard = self.reviews.read().await;
        Ok(())
    }
}
