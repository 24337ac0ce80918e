//! Catalog browsing and comment moderation commands.

#![allow(clippy::print_stdout)]

use bookstore_core::{Book, BookId, CategoryId, CommentId};
use bookstore_storefront::api::BookQuery;
use bookstore_storefront::{AppState, Result};

use super::money;

fn print_book_line(book: &Book) {
    println!(
        "{:>5}  {} - {}  ({})",
        book.id,
        book.display_title(),
        book.display_author(),
        money(book.price)
    );
}

pub async fn list_books(
    state: &AppState,
    category: Option<CategoryId>,
    search: Option<String>,
) -> Result<()> {
    let query = BookQuery {
        category,
        ids: Vec::new(),
        query: search,
    };
    let books = state.client().books(&query).await?;

    if books.is_empty() {
        println!("No books found.");
        return Ok(());
    }
    for book in &books {
        print_book_line(book);
    }
    Ok(())
}

pub async fn show_book(state: &AppState, id: BookId) -> Result<()> {
    let book = state.client().book(id).await?;

    println!("{}", book.display_title());
    println!("  Author:   {}", book.display_author());
    println!("  Price:    {}", money(book.price));
    if let Some(category) = &book.category {
        println!("  Category: {}", category.name);
    }
    if let Some(image) = &book.image {
        println!("  Cover:    {image}");
    }
    if let Some(description) = &book.description {
        println!();
        println!("{description}");
    }
    Ok(())
}

pub async fn list_categories(state: &AppState) -> Result<()> {
    for category in state.client().categories().await? {
        println!("{:>5}  {}", category.id, category.name);
    }
    Ok(())
}

pub async fn list_comments(state: &AppState, book: BookId) -> Result<()> {
    let comments = state.client().comments(book).await?;
    if comments.is_empty() {
        println!("No comments yet.");
        return Ok(());
    }

    for comment in comments {
        println!(
            "#{} {} ({}, {})",
            comment.id,
            comment.username,
            comment.created_at.format("%Y-%m-%d %H:%M"),
            comment.approved.label()
        );
        println!("    {}", comment.content);
    }
    Ok(())
}

pub async fn post_comment(state: &AppState, book: BookId, content: &str) -> Result<()> {
    let comment = state.client().post_comment(book, content).await?;
    println!("Comment #{} submitted for moderation.", comment.id);
    Ok(())
}

pub async fn moderate_comment(state: &AppState, id: CommentId, approve: bool) -> Result<()> {
    if approve {
        state.client().approve_comment(id).await?;
        println!("Comment #{id} approved.");
    } else {
        state.client().reject_comment(id).await?;
        println!("Comment #{id} rejected.");
    }
    Ok(())
}

pub async fn moderate_book(state: &AppState, id: BookId, approve: bool) -> Result<()> {
    if approve {
        state.client().approve_book(id).await?;
        println!("Book {id} approved.");
    } else {
        state.client().reject_book(id).await?;
        println!("Book {id} rejected.");
    }
    Ok(())
}
