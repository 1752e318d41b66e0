//! The random-jokes block: the whole render path behind one object.

use crate::client::ApiClient;
use crate::config::BlockConfiguration;
use crate::http::HttpTransport;
use crate::normalize::NormalizedJokes;
use crate::render::{render, JokeBlock};
use crate::request::build_random_jokes;

#[derive(Debug, Clone)]
pub struct RandomJokesBlock<T> {
    client: ApiClient<T>,
}

impl<T: HttpTransport> RandomJokesBlock<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    /// Build the request, perform it once, and normalize the body.
    pub fn fetch(&self, config: &BlockConfiguration) -> NormalizedJokes {
        let request = build_random_jokes(config);
        NormalizedJokes::from_api_result(self.client.send(&request), config.quantity)
    }

    pub fn build(&self, config: &BlockConfiguration) -> JokeBlock {
        render(&self.fetch(config), config.quantity)
    }
}
