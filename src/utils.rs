use rocket::http::uri::Uri;
use rocket::response::{Flash, Redirect};

pub fn requires_login(message: &str, next: &str) -> Flash<Redirect> {
    Flash::error(
        Redirect::to(format!("/login?next={}", Uri::percent_encode(next))),
        message,
    )
}
