//! Presentation-neutral view of a rendered block, plus a minimal HTML form.

use crate::normalize::NormalizedJokes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JokeBlock {
    /// Generic, user-facing failure message.
    Error(String),
    /// A single joke shown as a quotation.
    Quote(String),
    /// Several jokes in API order.
    OrderedList(Vec<String>),
}

/// Choose the presentation for a fetch of `quantity` jokes.
pub fn render(jokes: &NormalizedJokes, quantity: u32) -> JokeBlock {
    if let Some(reason) = jokes.failure_reason() {
        tracing::warn!(error = %reason, "rendering jokes block in error state");
        return JokeBlock::Error(reason.user_message().to_string());
    }
    match jokes.jokes() {
        [single] if quantity <= 1 => JokeBlock::Quote(single.clone()),
        many => JokeBlock::OrderedList(many.to_vec()),
    }
}

impl JokeBlock {
    /// Joke text is inserted as-is; escaping is requested from the API.
    pub fn to_html(&self) -> String {
        match self {
            JokeBlock::Error(message) => message.clone(),
            JokeBlock::Quote(joke) => format!("<blockquote>{joke}</blockquote>"),
            JokeBlock::OrderedList(jokes) => {
                let items: String = jokes.iter().map(|j| format!("<li>{j}</li>")).collect();
                format!("<ol>{items}</ol>")
            }
        }
    }
}
