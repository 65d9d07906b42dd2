use crate::template_utils::Ructe;
use rocket::{
    http::RawStr,
    request::{FromFormValue, Request},
    response::{self, Flash, NamedFile, Redirect, Responder},
};
use std::path::{Path, PathBuf};
use yatube_models::ITEMS_PER_PAGE;

pub mod comments;
pub mod errors;
pub mod groups;
pub mod medias;
pub mod posts;
pub mod session;
pub mod user;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Page(pub i32);

// Pages past this point would overflow the offset computation in `limits`.
const MAX_PAGE: i32 = i32::MAX / ITEMS_PER_PAGE;

impl<'v> FromFormValue<'v> for Page {
    type Error = &'v RawStr;

    fn from_form_value(form_value: &'v RawStr) -> Result<Page, &'v RawStr> {
        match form_value.parse::<i32>() {
            Ok(page) if (1..=MAX_PAGE).contains(&page) => Ok(Page(page)),
            _ => Err(form_value),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

impl Page {
    /// Computes the total number of pages needed to display n_items
    pub fn total(n_items: i32) -> i32 {
        if n_items % ITEMS_PER_PAGE == 0 {
            n_items / ITEMS_PER_PAGE
        } else {
            (n_items / ITEMS_PER_PAGE) + 1
        }
    }

    pub fn limits(self) -> (i32, i32) {
        ((self.0 - 1) * ITEMS_PER_PAGE, self.0 * ITEMS_PER_PAGE)
    }
}

pub enum RespondOrRedirect {
    Response(Ructe),
    FlashResponse(Flash<Ructe>),
    Redirect(Redirect),
    FlashRedirect(Flash<Redirect>),
}

impl<'r> Responder<'r> for RespondOrRedirect {
    fn respond_to(self, request: &Request<'_>) -> response::Result<'r> {
        match self {
            RespondOrRedirect::Response(r) => r.respond_to(request),
            RespondOrRedirect::FlashResponse(r) => r.respond_to(request),
            RespondOrRedirect::Redirect(r) => r.respond_to(request),
            RespondOrRedirect::FlashRedirect(r) => r.respond_to(request),
        }
    }
}

impl From<Ructe> for RespondOrRedirect {
    fn from(response: Ructe) -> Self {
        RespondOrRedirect::Response(response)
    }
}

impl From<Flash<Ructe>> for RespondOrRedirect {
    fn from(response: Flash<Ructe>) -> Self {
        RespondOrRedirect::FlashResponse(response)
    }
}

impl From<Redirect> for RespondOrRedirect {
    fn from(redirect: Redirect) -> Self {
        RespondOrRedirect::Redirect(redirect)
    }
}

impl From<Flash<Redirect>> for RespondOrRedirect {
    fn from(redirect: Flash<Redirect>) -> Self {
        RespondOrRedirect::FlashRedirect(redirect)
    }
}

#[get("/static/<file..>", rank = 2)]
pub fn static_files(file: PathBuf) -> Option<NamedFile> {
    NamedFile::open(Path::new("static/").join(file)).ok()
}

#[cfg(test)]
mod tests {
    use super::{Page, MAX_PAGE};
    use rocket::{http::RawStr, request::FromFormValue};

    #[test]
    fn page_accepts_the_contract_range_only() {
        assert_eq!(Ok(Page(1)), Page::from_form_value(RawStr::from_str("1")));
        assert_eq!(Ok(Page(42)), Page::from_form_value(RawStr::from_str("42")));
        assert!(Page::from_form_value(RawStr::from_str("0")).is_err());
        assert!(Page::from_form_value(RawStr::from_str("-3")).is_err());
        assert!(Page::from_form_value(RawStr::from_str("nope")).is_err());
        assert!(Page::from_form_value(RawStr::from_str("300000000")).is_err());
    }

    #[test]
    fn limits_stay_in_range_for_the_largest_page() {
        let (min, max) = Page(MAX_PAGE).limits();
        assert!(min >= 0);
        assert!(max > min);
    }

    #[test]
    fn total_rounds_up() {
        assert_eq!(1, Page::total(10));
        assert_eq!(2, Page::total(11));
        assert_eq!(2, Page::total(13));
    }
}
