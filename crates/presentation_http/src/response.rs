//! Success envelope

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{success: true, data, count?}`
///
/// `count` is present for list results.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            status: StatusCode::OK,
        }
    }

    /// A freshly created resource, answered with 201
    #[must_use]
    pub const fn created(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    #[must_use]
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data,
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_carries_count() {
        let json = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn single_omits_count() {
        let json = serde_json::to_value(ApiResponse::ok("x")).unwrap();
        assert!(json.get("count").is_none());
    }

    #[test]
    fn created_answers_201() {
        let response = ApiResponse::created("x").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
