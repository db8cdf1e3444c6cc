// API 类型定义模块
// JSON 接口的响应类型

use serde::Serialize;

/// `{success, message}` payload
#[derive(Debug, Serialize)]
pub struct MessageResponse<'a> {
    pub success: bool,
    pub message: &'a str,
}

impl<'a> MessageResponse<'a> {
    pub const fn ok(message: &'a str) -> Self {
        Self {
            success: true,
            message,
        }
    }

    pub const fn failed(message: &'a str) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// `{success:true, data}` payload for content endpoints
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: &'static str,
    /// ISO 8601 UTC timestamp
    pub timestamp: String,
}
