use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn ok() -> Self { Self { status: "ok".into() } }
}

/// Response envelope shared by every HTTP endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: message.into(), data: Some(data) }
    }

    /// Success without payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), data: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None }
    }
}
