use crate::template_utils::Ructe;
use rocket::{
    http::Status,
    request::{FromRequest, Request},
    response::{self, Responder, Response},
};
use tracing::warn;
use yatube_models::{db_conn::DbConn, users::User, Error};

#[derive(Debug)]
pub struct ErrorPage(Error);

impl From<Error> for ErrorPage {
    fn from(err: Error) -> ErrorPage {
        ErrorPage(err)
    }
}

impl<'r> Responder<'r> for ErrorPage {
    fn respond_to(self, req: &Request<'_>) -> response::Result<'r> {
        warn!("Error while handling {}: {:?}", req.uri(), self.0);
        let conn = req
            .guard::<DbConn>()
            .succeeded()
            .ok_or(Status::InternalServerError)?;
        let user = User::from_request(req).succeeded();
        let ctx = (&*conn, user, None::<(String, String)>);
        match self.0 {
            Error::NotFound | Error::Unauthorized => {
                Response::build_from(render!(errors::not_found(&ctx)).respond_to(req)?)
                    .status(Status::NotFound)
                    .ok()
            }
            _ => Response::build_from(render!(errors::server_error(&ctx)).respond_to(req)?)
                .status(Status::InternalServerError)
                .ok(),
        }
    }
}

#[catch(404)]
pub fn not_found(req: &Request) -> Result<Ructe, Status> {
    let conn = req
        .guard::<DbConn>()
        .succeeded()
        .ok_or(Status::InternalServerError)?;
    let user = User::from_request(req).succeeded();
    Ok(render!(errors::not_found(&(
        &*conn,
        user,
        None::<(String, String)>
    ))))
}

#[catch(500)]
pub fn server_error(req: &Request) -> Result<Ructe, Status> {
    let conn = req
        .guard::<DbConn>()
        .succeeded()
        .ok_or(Status::InternalServerError)?;
    let user = User::from_request(req).succeeded();
    Ok(render!(errors::server_error(&(
        &*conn,
        user,
        None::<(String, String)>
    ))))
}
