use crate::{schema::follows, users::User, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Clone, Debug, PartialEq, Queryable, Identifiable, Associations)]
#[belongs_to(User, foreign_key = "following_id")]
pub struct Follow {
    pub id: i32,
    pub follower_id: i32,
    pub following_id: i32,
}

#[derive(Insertable)]
#[table_name = "follows"]
pub struct NewFollow {
    pub follower_id: i32,
    pub following_id: i32,
}

impl Follow {
    insert!(follows, NewFollow);
    get!(follows);

    pub fn find(conn: &Connection, from: i32, to: i32) -> Result<Follow> {
        follows::table
            .filter(follows::follower_id.eq(from))
            .filter(follows::following_id.eq(to))
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests as user_tests};
    use diesel::Connection;

    #[test]
    fn find_and_delete() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            let follow = Follow::insert(
                &conn,
                NewFollow {
                    follower_id: users[0].id,
                    following_id: users[1].id,
                },
            )
            .unwrap();

            assert_eq!(
                follow.id,
                Follow::find(&conn, users[0].id, users[1].id).unwrap().id
            );
            // the relation is directed
            assert!(Follow::find(&conn, users[1].id, users[0].id).is_err());

            follow.delete(&conn).unwrap();
            assert!(Follow::find(&conn, users[0].id, users[1].id).is_err());
            Ok(())
        });
    }

    #[test]
    fn duplicate_follow_is_rejected() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            Follow::insert(
                &conn,
                NewFollow {
                    follower_id: users[0].id,
                    following_id: users[1].id,
                },
            )
            .unwrap();
            assert!(Follow::insert(
                &conn,
                NewFollow {
                    follower_id: users[0].id,
                    following_id: users[1].id,
                },
            )
            .is_err());
            Ok(())
        });
    }

    #[test]
    fn counts_follow_the_relation() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            for follower in &[&users[1], &users[2]] {
                Follow::insert(
                    &conn,
                    NewFollow {
                        follower_id: follower.id,
                        following_id: users[0].id,
                    },
                )
                .unwrap();
            }

            assert_eq!(2, users[0].count_followers(&conn).unwrap());
            assert_eq!(0, users[0].count_following(&conn).unwrap());
            assert_eq!(1, users[1].count_following(&conn).unwrap());
            assert!(users[1].is_following(&conn, users[0].id).unwrap());
            assert!(!users[0].is_following(&conn, users[1].id).unwrap());

            let followers = users[0].get_followers(&conn).unwrap();
            assert_eq!(2, followers.len());
            Ok(())
        });
    }
}
