//! The standard 404 response.

use lambda_http::http::StatusCode;
use serde_json::json;

use crate::exchange::Outgoing;

/// Send the standard "not found" document.
///
/// The dispatcher falls back to this when a function has no route for the
/// request method; it can also serve as the whole body of a dedicated 404
/// function.
pub fn not_found<R: Outgoing + ?Sized>(res: &mut R) {
    res.set_status(StatusCode::NOT_FOUND);
    res.send_json(&json!({
        "error": false,
        "message": "Not found",
    }));
}

/// Like [`not_found`], but also repeating the status in a `statusCode` member,
/// as older clients expect.
pub fn not_found_compat<R: Outgoing + ?Sized>(res: &mut R) {
    res.set_status(StatusCode::NOT_FOUND);
    res.send_json(&json!({
        "error": false,
        "message": "Not found",
        "statusCode": 404,
    }));
}
