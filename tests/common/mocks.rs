use async_trait::async_trait;
use damage_gateway::{
    Error, Result,
    vision::{ChatCompletionRequest, ChatCompletionResponse, VisionClient},
};
use serde_json::json;
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

/// Mock vision client for testing
#[derive(Debug)]
pub struct MockVisionClient {
    pub responses: Arc<Mutex<Vec<ChatCompletionResponse>>>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    pub error: Option<fn() -> Error>,
    /// Directory whose entries are recorded at the moment of each call.
    pub watch_dir: Option<PathBuf>,
    pub observed_files: Arc<Mutex<Vec<Vec<PathBuf>>>>,
}

impl MockVisionClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
            watch_dir: None,
            observed_files: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_content(self, content: &str) -> Self {
        self.add_response(content_response(content));
        self
    }

    pub fn with_error(mut self, error: fn() -> Error) -> Self {
        self.error = Some(error);
        self
    }

    pub fn watching(mut self, dir: PathBuf) -> Self {
        self.watch_dir = Some(dir);
        self
    }

    pub fn add_response(&self, response: ChatCompletionResponse) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn get_observed_files(&self) -> Vec<Vec<PathBuf>> {
        self.observed_files.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(dir) = &self.watch_dir {
            let files = std::fs::read_dir(dir)
                .unwrap()
                .map(|entry| entry.unwrap().path())
                .collect();
            self.observed_files.lock().unwrap().push(files);
        }

        if let Some(error) = self.error {
            return Err(error());
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::internal("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for MockVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn content_response(content: &str) -> ChatCompletionResponse {
    serde_json::from_value(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
    .unwrap()
}
