use crate::{schema::comments, users::User, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Clone, Debug, PartialEq, Queryable, Identifiable)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub text: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub post_id: i32,
    pub author_id: i32,
    pub text: String,
}

impl Comment {
    insert!(comments, NewComment);
    get!(comments);

    pub fn list_for_post(conn: &Connection, post_id: i32) -> Result<Vec<Comment>> {
        comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::creation_date.desc())
            .then_order_by(comments::id.desc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count_for_post(conn: &Connection, post_id: i32) -> Result<i64> {
        comments::table
            .filter(comments::post_id.eq(post_id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{posts::tests as post_tests, tests::db};
    use diesel::Connection;

    #[test]
    fn list_for_post_is_newest_first() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, users, _) = post_tests::fill_database(&conn);
            let first = Comment::insert(
                &conn,
                NewComment {
                    post_id: posts[0].id,
                    author_id: users[1].id,
                    text: "First!".to_owned(),
                },
            )
            .unwrap();
            let second = Comment::insert(
                &conn,
                NewComment {
                    post_id: posts[0].id,
                    author_id: users[2].id,
                    text: "Well said".to_owned(),
                },
            )
            .unwrap();

            let listed = Comment::list_for_post(&conn, posts[0].id).unwrap();
            assert_eq!(
                vec![second.id, first.id],
                listed.iter().map(|c| c.id).collect::<Vec<_>>()
            );
            assert_eq!(2, Comment::count_for_post(&conn, posts[0].id).unwrap());
            assert!(Comment::list_for_post(&conn, posts[1].id).unwrap().is_empty());
            Ok(())
        });
    }

    #[test]
    fn author() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, users, _) = post_tests::fill_database(&conn);
            let comment = Comment::insert(
                &conn,
                NewComment {
                    post_id: posts[0].id,
                    author_id: users[1].id,
                    text: "It me".to_owned(),
                },
            )
            .unwrap();
            assert_eq!(users[1].id, comment.get_author(&conn).unwrap().id);
            Ok(())
        });
    }
}
