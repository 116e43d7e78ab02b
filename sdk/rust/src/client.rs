//! Typed async client for the to-do service.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub pro: bool,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    /// RFC 3339, UTC.
    pub deadline: String,
    pub done: bool,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status and `{ "error": ... }`.
    #[error("service returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// Status code of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => Some(message.as_str()),
            ClientError::Transport(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct TodoClient {
    client: Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest` client (proxies, timeouts, ...).
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn create_user(&self, name: &str, username: &str) -> Result<User, ClientError> {
        let req = self
            .request(Method::POST, "/users", None)
            .json(&serde_json::json!({ "name": name, "username": username }));
        parse(req.send().await?).await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        let req = self.request(Method::GET, &format!("/users/{}", id), None);
        parse(req.send().await?).await
    }

    pub async fn upgrade_to_pro(&self, id: &str) -> Result<User, ClientError> {
        let req = self.request(Method::PATCH, &format!("/users/{}/pro", id), None);
        parse(req.send().await?).await
    }

    pub async fn list_todos(&self, username: &str) -> Result<Vec<Todo>, ClientError> {
        let req = self.request(Method::GET, "/todos", Some(username));
        parse(req.send().await?).await
    }

    pub async fn create_todo(
        &self,
        username: &str,
        title: &str,
        deadline: &str,
    ) -> Result<Todo, ClientError> {
        let req = self
            .request(Method::POST, "/todos", Some(username))
            .json(&serde_json::json!({ "title": title, "deadline": deadline }));
        parse(req.send().await?).await
    }

    pub async fn update_todo(
        &self,
        username: &str,
        id: &str,
        title: &str,
        deadline: &str,
    ) -> Result<Todo, ClientError> {
        let req = self
            .request(Method::PUT, &format!("/todos/{}", id), Some(username))
            .json(&serde_json::json!({ "title": title, "deadline": deadline }));
        parse(req.send().await?).await
    }

    pub async fn mark_done(&self, username: &str, id: &str) -> Result<Todo, ClientError> {
        let req = self.request(Method::PATCH, &format!("/todos/{}/done", id), Some(username));
        parse(req.send().await?).await
    }

    pub async fn delete_todo(&self, username: &str, id: &str) -> Result<(), ClientError> {
        let req = self.request(Method::DELETE, &format!("/todos/{}", id), Some(username));
        check(req.send().await?).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str, username: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match username {
            Some(username) => builder.header("username", username),
            None => builder,
        }
    }
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api { status, message })
}

async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    Ok(check(resp).await?.json().await?)
}
