use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::network::*;

/// Canned responses by path. Unknown paths fail like a dropped connection.
#[derive(Default)]
pub struct MockApi {
    responses: Mutex<HashMap<String, HttpResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn with(self, path: &str, status: u16, body: &str) -> Self {
        self.set(path, status, body);
        self
    }

    /// Replace the response for a path, f.e. to serve a changed directory.
    pub fn set(&self, path: &str, status: u16, body: &str) {
        self.responses.lock().unwrap().insert(
            path.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetch for MockApi {
    async fn get(&self, path: &str) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(path.to_string());
        let response = self.responses.lock().unwrap().get(path).cloned();
        response.ok_or_else(|| {
            FetchError::network(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))
        })
    }
}
