use crate::{db_conn::DbConn, schema::users, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::{
    outcome::IntoOutcome,
    request::{self, FromRequest, Request},
};

pub const AUTH_COOKIE: &str = "user_id";

#[derive(Clone, Debug, PartialEq, Queryable, Identifiable)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub hashed_password: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub hashed_password: String,
}

impl NewUser {
    pub fn new_local(
        conn: &Connection,
        username: String,
        display_name: String,
        email: String,
        password: &str,
    ) -> Result<User> {
        User::insert(
            conn,
            NewUser {
                username,
                display_name,
                email,
                hashed_password: User::hash_pass(password)?,
            },
        )
    }
}

impl User {
    insert!(users, NewUser);
    get!(users);
    find_by!(users, find_by_name, username as &str);
    find_by!(users, find_by_email, email as &str);

    pub fn name(&self) -> String {
        if self.display_name.is_empty() {
            self.username.clone()
        } else {
            self.display_name.clone()
        }
    }

    pub fn hash_pass(pass: &str) -> Result<String> {
        bcrypt::hash(pass, 10).map_err(Error::from)
    }

    pub fn login(conn: &Connection, ident: &str, password: &str) -> Result<User> {
        let user = User::find_by_email(conn, ident).or_else(|_| User::find_by_name(conn, ident));

        match user {
            Ok(user) => {
                if bcrypt::verify(password, &user.hashed_password).unwrap_or(false) {
                    Ok(user)
                } else {
                    Err(Error::NotFound)
                }
            }
            Err(e) => {
                // fake-verify a password, to avoid leaking the existence of
                // an account through response timing
                if let Ok(other) = User::last(conn) {
                    let _ = bcrypt::verify(password, &other.hashed_password);
                }
                Err(e)
            }
        }
    }

    pub fn is_following(&self, conn: &Connection, other_id: i32) -> Result<bool> {
        use crate::schema::follows;
        let count: i64 = follows::table
            .filter(follows::follower_id.eq(self.id))
            .filter(follows::following_id.eq(other_id))
            .count()
            .get_result(conn)?;
        Ok(count > 0)
    }

    pub fn count_followers(&self, conn: &Connection) -> Result<i64> {
        use crate::schema::follows;
        follows::table
            .filter(follows::following_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn count_following(&self, conn: &Connection) -> Result<i64> {
        use crate::schema::follows;
        follows::table
            .filter(follows::follower_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn get_followers(&self, conn: &Connection) -> Result<Vec<User>> {
        use crate::schema::follows;
        let ids = follows::table
            .filter(follows::following_id.eq(self.id))
            .select(follows::follower_id);
        users::table
            .filter(users::id.eq_any(ids))
            .load(conn)
            .map_err(Error::from)
    }
}

impl<'a, 'r> FromRequest<'a, 'r> for User {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<User, ()> {
        let conn = request.guard::<DbConn>()?;
        request
            .cookies()
            .get_private(AUTH_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
            .and_then(|id| User::get(&*conn, id).ok())
            .or_forward(())
    }
}
