//! Book catalogue fixture server shared by the integration tests.

#![allow(dead_code)]

use anyhow::Context as _;
use async_graphql::{Context, EmptySubscription, Error, ErrorExtensions, Object, Schema, SimpleObject};
use gqltest::SchemaServer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, Once};

pub const GET_BOOKS: &str = r#"query GetBooks($first: Int, $skip: Int) {
    books(first: $first, skip: $skip) {
      title
      author
    }
  }"#;

pub const CREATE_BOOK: &str = r#"mutation CreateBook($title: String!, $author: String!) {
    createBook(title: $title, author: $author) {
      title
      author
    }
  }"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct Book {
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
        }
    }
}

/// In-memory backing store, shared between the schema and the test.
#[derive(Debug, Clone, Default)]
pub struct Database {
    books: Arc<Mutex<Vec<Book>>>,
}

impl Database {
    pub fn seeded() -> Self {
        let database = Self::default();
        database.replace(vec![
            Book::new("The Awakening", "Kate Chopin"),
            Book::new("City of Glass", "Paul Auster"),
        ]);
        database
    }

    pub fn books(&self) -> Vec<Book> {
        self.books.lock().expect("database lock poisoned").clone()
    }

    pub fn replace(&self, books: Vec<Book>) {
        *self.books.lock().expect("database lock poisoned") = books;
    }

    fn push(&self, book: Book) -> Book {
        let mut books = self.books.lock().expect("database lock poisoned");
        books.push(book.clone());
        book
    }
}

/// Name of the user a request was made on behalf of.
pub struct Viewer(pub String);

pub struct Query;

#[Object]
impl Query {
    async fn books(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        skip: Option<i32>,
    ) -> async_graphql::Result<Vec<Book>> {
        let first = first.unwrap_or(10);
        let skip = skip.unwrap_or(0);

        if first < 0 {
            return Err(Error::new("`first` must be a positive integer")
                .extend_with(|_, e| e.set("code", "BAD_USER_INPUT")));
        }

        let database = ctx.data::<Database>()?;
        Ok(database
            .books()
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(first as usize)
            .collect())
    }

    async fn viewer(&self, ctx: &Context<'_>) -> Option<String> {
        ctx.data_opt::<Viewer>().map(|viewer| viewer.0.clone())
    }

    async fn request_path(&self, ctx: &Context<'_>) -> Option<String> {
        ctx.data_opt::<http::Request<String>>()
            .map(|request| request.uri().path().to_string())
    }

    async fn request_header(&self, ctx: &Context<'_>, name: String) -> Option<String> {
        ctx.data_opt::<http::Request<String>>()
            .and_then(|request| request.headers().get(name.as_str()))
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
    }
}

pub struct Mutation;

#[Object]
impl Mutation {
    async fn create_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
    ) -> async_graphql::Result<Book> {
        let database = ctx.data::<Database>()?;
        Ok(database.push(Book { title, author }))
    }
}

pub type BookServer = SchemaServer<Query, Mutation, EmptySubscription>;

/// Schema server over `database`.
///
/// A `user` request override must carry a `name`; it becomes the `viewer`.
pub fn book_server(database: Database) -> BookServer {
    let schema = Schema::build(Query, Mutation, EmptySubscription)
        .data(database)
        .finish();

    SchemaServer::new(schema).context(|request, response, data| {
        if let Some(user) = request.get("user") {
            let name = user
                .get("name")
                .and_then(Value::as_str)
                .context("user override is missing a name")?;
            data.insert(Viewer(name.to_string()));
        }
        response.insert_local("context_built", true);
        Ok(())
    })
}

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (`RUST_LOG=gqltest=debug`).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
