use crate::errors::ServerError;
use crate::responses::ResultResp;
use crate::session::session_cookie;
use astra::{Body, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

/// 303 See Other, so a refreshed page does not resubmit the form. Sets the
/// browsing-session cookie when the session is new.
pub fn redirect(location: &str, new_session: Option<&str>) -> ResultResp {
    let mut builder = ResponseBuilder::new().status(303).header("Location", location);
    if let Some(token) = new_session {
        builder = builder.header("Set-Cookie", session_cookie(token));
    }

    builder
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

pub fn css_response(css: &'static str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/css; charset=utf-8")
        .body(Body::from(css))
        .map_err(|_| ServerError::InternalError)
}
