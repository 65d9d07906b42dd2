use crate::{schema::medias, users::User, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use std::fs;

#[derive(Clone, Debug, PartialEq, Queryable, Identifiable)]
pub struct Media {
    pub id: i32,
    pub file_path: String,
    pub alt_text: String,
    pub owner_id: i32,
}

#[derive(Insertable)]
#[table_name = "medias"]
pub struct NewMedia {
    pub file_path: String,
    pub alt_text: String,
    pub owner_id: i32,
}

impl Media {
    insert!(medias, NewMedia);
    get!(medias);
    list_by!(medias, for_user, owner_id as i32);

    pub fn url(&self) -> String {
        format!("/{}", self.file_path)
    }

    pub fn is_owned_by(&self, user: &User) -> bool {
        self.owner_id == user.id
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        use crate::schema::posts;

        if let Err(err) = fs::remove_file(&self.file_path) {
            tracing::warn!("couldn't delete media file {}: {}", self.file_path, err);
        }
        diesel::update(posts::table.filter(posts::image_id.eq(self.id)))
            .set(posts::image_id.eq(None::<i32>))
            .execute(conn)?;
        diesel::delete(self).execute(conn).map_err(Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        posts::{Post, NewPost},
        tests::db,
        users::tests as user_tests,
    };
    use diesel::Connection;

    #[test]
    fn ownership() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            let media = Media::insert(
                &conn,
                NewMedia {
                    file_path: "static/media/test_ownership.png".to_owned(),
                    alt_text: "A test image".to_owned(),
                    owner_id: users[0].id,
                },
            )
            .unwrap();

            assert!(media.is_owned_by(&users[0]));
            assert!(!media.is_owned_by(&users[1]));
            assert_eq!(vec![media.clone()], Media::for_user(&conn, users[0].id).unwrap());
            assert!(Media::for_user(&conn, users[1].id).unwrap().is_empty());
            assert_eq!("/static/media/test_ownership.png", media.url());
            Ok(())
        });
    }

    #[test]
    fn delete_detaches_from_posts() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            let media = Media::insert(
                &conn,
                NewMedia {
                    file_path: "static/media/test_delete.png".to_owned(),
                    alt_text: String::new(),
                    owner_id: users[0].id,
                },
            )
            .unwrap();
            let post = Post::insert(
                &conn,
                NewPost {
                    author_id: users[0].id,
                    group_id: None,
                    text: "With an image".to_owned(),
                    image_id: Some(media.id),
                },
            )
            .unwrap();

            media.delete(&conn).unwrap();
            assert!(Media::get(&conn, media.id).is_err());
            assert_eq!(None, Post::get(&conn, post.id).unwrap().image_id);
            Ok(())
        });
    }
}
