use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use damage_gateway::{
    config::{Config, LogsConfig, ServerConfig, UploadConfig, VisionConfig},
    server,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BOUNDARY: &str = "gateway-test-boundary";

/// Create a test configuration pointing at `api_url` with uploads under `temp_dir`
pub fn create_test_config(api_url: &str, temp_dir: &Path) -> Config {
    Config {
        vision: VisionConfig {
            api_url: api_url.to_string(),
            api_key: "test-api-key".to_string(),
            model: "meta/llama-3.2-90b-vision-instruct".to_string(),
            timeout_secs: 5,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        upload: UploadConfig {
            temp_dir: Some(temp_dir.to_path_buf()),
            max_image_bytes: None,
        },
    }
}

/// Create a temporary directory for transient uploads
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn create_test_app(config: &Config) -> Router {
    let state = server::app_state(config).expect("Failed to build app state");
    server::router(state)
}

/// Small fake PNG payload with non-UTF-8 bytes
pub fn sample_image() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    bytes.extend((0..=255u8).cycle().take(1024));
    bytes
}

/// Build a multipart body with a single `file` part
pub fn multipart_body(field_name: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn estimate_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn list_dir(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

pub fn chat_completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "meta/llama-3.2-90b-vision-instruct",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

/// Pull the base64 payload back out of a composed prompt
pub fn embedded_image(prompt: &str) -> &str {
    let start = prompt
        .find("data:image/png;base64,")
        .expect("prompt has no inline image")
        + "data:image/png;base64,".len();
    let end = prompt[start..].find('"').expect("unterminated image tag") + start;
    &prompt[start..end]
}
