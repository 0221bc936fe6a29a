//! 성공 응답 envelope.
//!
//! 모든 성공 응답은 `{success, data, message, timestamp}` 형식으로
//! 감쌉니다.

use serde::Serialize;
use utoipa::ToSchema;

/// API 성공 응답 envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// 성공 여부 (항상 true)
    pub success: bool,
    /// 응답 데이터
    pub data: T,
    /// 응답 메시지 (선택)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 응답 시간 (RFC 3339)
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// 데이터만 담은 성공 응답.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// 메시지가 포함된 성공 응답.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let response = ApiResponse::with_message(vec![1, 2, 3], "done");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["message"], "done");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_message_omitted_when_none() {
        let response = ApiResponse::ok(42);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("message").is_none());
    }
}
