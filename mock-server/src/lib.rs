//! In-memory stand-in for the ICNDb joke API.
//!
//! Serves `/jokes/random`, `/jokes/random/{count}`, `/jokes/count` and
//! `/categories` from a fixed list of jokes. Selection is deterministic
//! (fixture order) so tests can assert exact output. Like the real API,
//! failures are reported inside a `200` body with a non-`success` tag.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const NO_SUCH_QUOTE: &str = "NoSuchQuoteException";

/// Filter used by the binary when `RUST_LOG` is unset. Every request is
/// logged at `info`.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Joke {
    pub id: u32,
    pub joke: String,
    pub categories: Vec<String>,
}

impl Joke {
    pub fn new(id: u32, joke: &str, categories: &[&str]) -> Self {
        Self {
            id,
            joke: joke.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The `{"type": ..., "value": ...}` wrapper every endpoint answers with.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JokeQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub escape: Option<String>,
    pub limit_to: Option<String>,
    pub exclude: Option<String>,
}

#[derive(Debug)]
pub struct JokeDb {
    jokes: Vec<Joke>,
    categories: Vec<String>,
}

impl JokeDb {
    pub fn new(jokes: Vec<Joke>) -> Self {
        let mut categories: Vec<String> = jokes
            .iter()
            .flat_map(|j| j.categories.iter().cloned())
            .collect();
        categories.sort();
        categories.dedup();
        Self { jokes, categories }
    }
}

pub type Db = Arc<JokeDb>;

pub fn fixture_jokes() -> Vec<Joke> {
    vec![
        Joke::new(1, "Chuck Norris can divide by zero.", &["nerdy"]),
        Joke::new(
            2,
            "Chuck Norris doesn't read books. He stares them down until he gets the information he wants.",
            &[],
        ),
        Joke::new(
            3,
            "Chuck Norris's keyboard doesn't have a Ctrl key because nothing controls Chuck Norris.",
            &["nerdy"],
        ),
        Joke::new(
            4,
            "Chuck Norris doesn't flush the toilet, he scares the sh*t out of it.",
            &["explicit"],
        ),
        Joke::new(5, "When Chuck Norris says \"jump\", <everyone> & everything jumps.", &[]),
        Joke::new(6, "Chuck Norris counted to infinity. Twice.", &["nerdy"]),
        Joke::new(7, "Chuck Norris's tears cure cancer. Too bad he has never cried.", &[]),
    ]
}

pub fn app() -> Router {
    app_with(fixture_jokes())
}

pub fn app_with(jokes: Vec<Joke>) -> Router {
    let db: Db = Arc::new(JokeDb::new(jokes));
    Router::new()
        .route("/jokes/random", get(random_joke))
        .route("/jokes/random/{count}", get(random_jokes))
        .route("/jokes/count", get(joke_count))
        .route("/categories", get(categories))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn success<T: Serialize>(value: T) -> Response {
    Json(Envelope {
        kind: "success".to_string(),
        value,
    })
    .into_response()
}

fn failure(kind: &str, message: String) -> Response {
    Json(Envelope {
        kind: kind.to_string(),
        value: message,
    })
    .into_response()
}

async fn categories(State(db): State<Db>) -> Response {
    tracing::info!("categories");
    success(&db.categories)
}

async fn joke_count(State(db): State<Db>) -> Response {
    tracing::info!("joke count");
    success(db.jokes.len())
}

async fn random_joke(State(db): State<Db>, Query(query): Query<JokeQuery>) -> Response {
    tracing::info!(?query, "random joke");
    match select(&db, 1, &query).pop() {
        Some(joke) => success(joke),
        None => failure(NO_SUCH_QUOTE, "No joke matches the given categories.".to_string()),
    }
}

async fn random_jokes(
    State(db): State<Db>,
    Path(count): Path<u32>,
    Query(query): Query<JokeQuery>,
) -> Response {
    tracing::info!(count, ?query, "random jokes");
    let jokes = select(&db, count as usize, &query);
    if count == 0 || jokes.len() < count as usize {
        return failure(
            NO_SUCH_QUOTE,
            format!("Only {} jokes match, {count} requested.", jokes.len()),
        );
    }
    success(jokes)
}

/// First `count` jokes passing the category filters, renamed and escaped.
fn select(db: &JokeDb, count: usize, query: &JokeQuery) -> Vec<Joke> {
    let limit_to = query.limit_to.as_deref().map(parse_category_list);
    let exclude = query.exclude.as_deref().map(parse_category_list);

    db.jokes
        .iter()
        .filter(|joke| match &limit_to {
            Some(limit) if !limit.is_empty() => joke.categories.iter().any(|c| limit.contains(c)),
            _ => true,
        })
        .filter(|joke| match &exclude {
            Some(excluded) => !joke.categories.iter().any(|c| excluded.contains(c)),
            None => true,
        })
        .take(count)
        .map(|joke| Joke {
            joke: escape(&rename(&joke.joke, query), query.escape.as_deref()),
            ..joke.clone()
        })
        .collect()
}

/// `[a,b]` (brackets optional) into its names.
pub fn parse_category_list(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn rename(text: &str, query: &JokeQuery) -> String {
    let mut text = text.to_string();
    if let Some(first) = query.first_name.as_deref().filter(|n| !n.is_empty()) {
        text = text.replace("Chuck", first);
    }
    if let Some(last) = query.last_name.as_deref().filter(|n| !n.is_empty()) {
        text = text.replace("Norris", last);
    }
    text
}

fn escape(text: &str, format: Option<&str>) -> String {
    match format {
        Some("html") => html_escape::encode_quoted_attribute(text).into_owned(),
        Some("javascript") => text
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\'', "\\'"),
        _ => text.to_string(),
    }
}
