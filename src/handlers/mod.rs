//! Request handlers module

use axum::http::{header, HeaderMap, HeaderValue};

use crate::error::AppError;

pub mod department;
pub mod image;
pub mod person;
pub mod search;
pub mod status;

/// Log a store failure with its operation context and convert it to the
/// generic database error. Raw store errors never cross the API boundary.
pub(crate) fn db_err(op: &str, err: sea_orm::DbErr) -> AppError {
    tracing::error!("database query failed in {}: {}", op, err);
    AppError::Database(err)
}

/// Content-Location header for a freshly created resource:
/// `{scheme}://{host}/api/{resource}/{id}`
pub(crate) fn content_location(scheme: &str, host: &str, resource: &str, id: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let location = format!("{}://{}/api/{}/{}", scheme, host, resource, id);
    if let Ok(value) = HeaderValue::from_str(&location) {
        headers.insert(header::CONTENT_LOCATION, value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_location() {
        let headers = content_location("http", "test.com", "department", 7);
        assert_eq!(
            headers.get(header::CONTENT_LOCATION).unwrap(),
            "http://test.com/api/department/7"
        );
    }
}
