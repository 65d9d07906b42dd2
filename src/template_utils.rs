use yatube_models::{users::User, Connection, YatubeRocket};

use rocket::http::{Method, Status};
use rocket::request::Request;
use rocket::response::{self, content::Html as HtmlCt, Responder, Response};
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use validator::ValidationErrors;

pub type BaseContext<'a> = &'a (&'a Connection, Option<User>, Option<(String, String)>);

pub trait IntoContext {
    fn to_context(&self) -> (&Connection, Option<User>, Option<(String, String)>);
}

impl IntoContext for YatubeRocket {
    fn to_context(&self) -> (&Connection, Option<User>, Option<(String, String)>) {
        (&*self.conn, self.user.clone(), self.flash_msg.clone())
    }
}

#[derive(Debug)]
pub struct Ructe(pub Vec<u8>);

impl<'r> Responder<'r> for Ructe {
    fn respond_to(self, r: &Request<'_>) -> response::Result<'r> {
        //if method is not Get or page contains a form, no caching
        if r.method() != Method::Get || self.0.windows(6).any(|w| w == b"<form ") {
            return HtmlCt(self.0).respond_to(r);
        }
        let mut hasher = DefaultHasher::new();
        hasher.write(&self.0);
        let etag = format!("{:x}", hasher.finish());
        if r.headers()
            .get("If-None-Match")
            .any(|s| s[1..s.len() - 1] == etag)
        {
            Response::build()
                .status(Status::NotModified)
                .raw_header("ETag", etag)
                .ok()
        } else {
            Response::build()
                .merge(HtmlCt(self.0).respond_to(r)?)
                .raw_header("ETag", etag)
                .ok()
        }
    }
}

#[macro_export]
macro_rules! render {
    ($group:tt :: $page:tt ( $( $param:expr ),* ) ) => {
        {
            use crate::templates;

            let mut res = vec![];
            templates::$group::$page(
                &mut res,
                $(
                    $param
                ),*
            ).unwrap();
            $crate::template_utils::Ructe(res)
        }
    }
}

/// Flattens form validation errors into a list of displayable messages.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    for errs in errors.field_errors().values() {
        for err in errs.iter() {
            if let Some(msg) = err.message.as_ref() {
                messages.push(msg.to_string());
            }
        }
    }
    messages
}
