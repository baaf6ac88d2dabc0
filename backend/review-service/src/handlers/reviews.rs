use crate::book_client::BookServiceClient;
use crate::error::{not_found, AppError, Result};
use crate::models::{BookRef, NewReview, ReviewPatch};
use crate::repository::ReviewRepository;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use auth_gateway::AuthContext;
use tracing::{info, warn};

/// GET /reviews
pub async fn list_reviews(repo: web::Data<dyn ReviewRepository>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(repo.find_all().await?))
}

/// GET /reviews/{id}
pub async fn get_review(
    repo: web::Data<dyn ReviewRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let review = repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok().json(review))
}

/// GET /reviews/book/{book_id}
pub async fn reviews_for_book(
    repo: web::Data<dyn ReviewRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let reviews = repo.find_by_book(BookRef::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// GET /reviews/books
///
/// Book listing from the book service, passed through as is.
pub async fn list_books(client: web::Data<BookServiceClient>) -> Result<HttpResponse> {
    let body = client.fetch_books_json().await.map_err(|e| {
        warn!(error = %e, "Book listing proxy failed");
        AppError::from(e)
    })?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

/// GET /reviews/{id}/book
pub async fn book_for_review(
    repo: web::Data<dyn ReviewRepository>,
    client: web::Data<BookServiceClient>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let review = repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

    let book = client.resolve_book(review.book_id).await.map_err(|e| {
        warn!(review_id = id, book_id = review.book_id.id(), error = %e, "Book lookup failed");
        AppError::from(e)
    })?;

    match book {
        Some(body) => Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(body)),
        None => Err(AppError::NotFound("Referenced book not found".to_string())),
    }
}

/// POST /reviews
pub async fn create_review(
    repo: web::Data<dyn ReviewRepository>,
    caller: AuthContext,
    body: web::Json<NewReview>,
) -> Result<HttpResponse> {
    let review = repo.create(body.into_inner()).await?;
    info!(
        review_id = review.id,
        book_id = review.book_id.id(),
        subject = %caller.subject,
        "Review created"
    );
    Ok(HttpResponse::Created().json(review))
}

/// PUT /reviews/{id}
pub async fn update_review(
    repo: web::Data<dyn ReviewRepository>,
    path: web::Path<i64>,
    body: web::Json<ReviewPatch>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let review = repo
        .update(id, body.into_inner())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /reviews/{id}
pub async fn delete_review(
    repo: web::Data<dyn ReviewRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if !repo.delete(id).await? {
        return Err(not_found(id));
    }
    info!(review_id = id, "Review deleted");
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(format!("Review with ID {} deleted successfully", id)))
}
