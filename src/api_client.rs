use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::data::datatable::Todo;

/// Why the record list could not be obtained
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed todo list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Turn a response into records. Anything but a 200 carrying a JSON array of
/// todos is an error.
pub fn decode_todos(status: u16, body: &str) -> Result<Vec<Todo>, FetchError> {
    if status != 200 {
        return Err(FetchError::Status(status));
    }
    Ok(serde_json::from_str(body)?)
}

/// Read-only client for the todo endpoint
#[derive(Clone)]
pub struct ApiClient {
    url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One `GET` for the whole list; no paging, no retry
    pub async fn fetch_todos(&self) -> Result<Vec<Todo>, FetchError> {
        info!(target: "api", "Fetching todos from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let todos = decode_todos(status, &body)?;
        info!(target: "api", "Received {} todos", todos.len());
        Ok(todos)
    }

    /// Fetch once, logging any failure. `None` means the table stays empty.
    pub async fn load_initial_records(&self) -> Option<Vec<Todo>> {
        match self.fetch_todos().await {
            Ok(todos) => Some(todos),
            Err(e) => {
                error!(target: "api", "Error: {}", e);
                None
            }
        }
    }
}

/// Start the one-off initial fetch on `handle`.
///
/// The receiver resolves with the records on success. On failure the error is
/// logged and the sender dropped, so the receiver reports closed.
pub fn spawn_initial_fetch(handle: &Handle, client: ApiClient) -> oneshot::Receiver<Vec<Todo>> {
    let (tx, rx) = oneshot::channel();
    handle.spawn(async move {
        if let Some(todos) = client.load_initial_records().await {
            // the UI may already have exited
            let _ = tx.send(todos);
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_accepts_extra_fields() {
        let body = r#"[{"userId":1,"id":1,"title":"delectus aut autem","completed":false}]"#;
        let todos = decode_todos(200, body).unwrap();
        assert_eq!(todos, vec![Todo::new(1, 1, "delectus aut autem")]);
    }

    #[test]
    fn test_decode_rejects_non_200() {
        assert!(matches!(decode_todos(404, "[]"), Err(FetchError::Status(404))));
        assert!(matches!(decode_todos(201, "[]"), Err(FetchError::Status(201))));
    }

    #[test]
    fn test_decode_rejects_malformed_body() {
        assert!(matches!(decode_todos(200, "{\"id\": 1}"), Err(FetchError::Decode(_))));
        assert!(matches!(
            decode_todos(200, r#"[{"id": 1, "title": "no user"}]"#),
            Err(FetchError::Decode(_))
        ));
    }
}
