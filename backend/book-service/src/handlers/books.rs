use crate::error::{AppError, Result};
use crate::models::{BookInput, BookSearch};
use crate::repository::BookRepository;
use actix_web::{web, HttpResponse};
use tracing::info;

/// GET /books
pub async fn list_books(repo: web::Data<dyn BookRepository>) -> Result<HttpResponse> {
    let books = repo.find_all().await?;
    Ok(HttpResponse::Ok().json(books))
}

/// GET /books/search?title=&author=&year=
pub async fn search_books(
    repo: web::Data<dyn BookRepository>,
    query: web::Query<BookSearch>,
) -> Result<HttpResponse> {
    let books: Vec<_> = repo
        .find_all()
        .await?
        .into_iter()
        .filter(|book| query.matches(book))
        .collect();
    Ok(HttpResponse::Ok().json(books))
}

/// GET /books/{id}
pub async fn get_book(
    repo: web::Data<dyn BookRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let book = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with ID {} not found", id)))?;
    Ok(HttpResponse::Ok().json(book))
}

/// POST /books
pub async fn create_book(
    repo: web::Data<dyn BookRepository>,
    body: web::Json<BookInput>,
) -> Result<HttpResponse> {
    let input = body.into_inner();
    input.check()?;

    let book = repo.create(input).await?;
    info!(book_id = book.id, "Book created");
    Ok(HttpResponse::Created().json(book))
}

/// PUT /books/{id}
pub async fn update_book(
    repo: web::Data<dyn BookRepository>,
    path: web::Path<i64>,
    body: web::Json<BookInput>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let input = body.into_inner();
    input.check()?;

    let book = repo
        .update(id, input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with ID {} not found", id)))?;
    info!(book_id = id, "Book updated");
    Ok(HttpResponse::Ok().json(book))
}

/// DELETE /books/{id}
pub async fn delete_book(
    repo: web::Data<dyn BookRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("Book with ID {} not found", id)));
    }
    info!(book_id = id, "Book deleted");
    Ok(HttpResponse::NoContent().finish())
}
