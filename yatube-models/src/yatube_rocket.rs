use crate::{db_conn::DbConn, users::User};
use rocket::{
    request::{self, FlashMessage, FromRequest, Request},
    Outcome,
};

/// Common context needed by most routes: a database connection, the
/// logged-in user if any, and the flash message to display.
pub struct YatubeRocket {
    pub conn: DbConn,
    pub user: Option<User>,
    pub flash_msg: Option<(String, String)>,
}

impl<'a, 'r> FromRequest<'a, 'r> for YatubeRocket {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<Self, Self::Error> {
        let conn = request.guard::<DbConn>()?;
        let user = User::from_request(request).succeeded();
        let flash_msg = request.guard::<FlashMessage<'_, '_>>().succeeded();
        Outcome::Success(YatubeRocket {
            conn,
            user,
            flash_msg: flash_msg.map(|f| (f.name().into(), f.msg().into())),
        })
    }
}
