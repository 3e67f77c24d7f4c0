use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::FetchError;

pub fn build_http_client(timeout: Duration, user_agent: &str) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent.to_string())
        .build()
        .map_err(FetchError::Client)
}
