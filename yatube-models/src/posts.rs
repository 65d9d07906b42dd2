use crate::{
    comments::Comment, groups::Group, medias::Media, schema::posts, users::User, Connection,
    Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// Length of the text preview used where a post stands in for a title.
pub const TEXT_LIMIT: usize = 15;

#[derive(Clone, Debug, PartialEq, Queryable, Identifiable, AsChangeset)]
#[changeset_options(treat_none_as_null = "true")]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub text: String,
    pub image_id: Option<i32>,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "posts"]
pub struct NewPost {
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub text: String,
    pub image_id: Option<i32>,
}

impl Post {
    insert!(posts, NewPost);
    get!(posts);

    pub fn update(&self, conn: &Connection) -> Result<Self> {
        diesel::update(self).set(self).execute(conn)?;
        Self::get(conn, self.id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        for comment in Comment::list_for_post(conn, self.id)? {
            comment.delete(conn)?;
        }
        diesel::delete(self).execute(conn)?;
        Ok(())
    }

    pub fn preview(&self) -> String {
        self.text.chars().take(TEXT_LIMIT).collect()
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        posts::table.count().get_result(conn).map_err(Error::from)
    }

    pub fn list_page(conn: &Connection, (min, max): (i32, i32)) -> Result<Vec<Post>> {
        posts::table
            .order(posts::creation_date.desc())
            .then_order_by(posts::id.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count_for_group(conn: &Connection, group: &Group) -> Result<i64> {
        posts::table
            .filter(posts::group_id.eq(group.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn list_for_group(
        conn: &Connection,
        group: &Group,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::group_id.eq(group.id))
            .order(posts::creation_date.desc())
            .then_order_by(posts::id.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count_for_author(conn: &Connection, author: &User) -> Result<i64> {
        posts::table
            .filter(posts::author_id.eq(author.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn list_for_author(
        conn: &Connection,
        author: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::author_id.eq(author.id))
            .order(posts::creation_date.desc())
            .then_order_by(posts::id.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    /// Posts written by the authors `user` follows, most recent first.
    pub fn user_feed_page(
        conn: &Connection,
        user: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        use crate::schema::follows;
        let followed = follows::table
            .filter(follows::follower_id.eq(user.id))
            .select(follows::following_id);
        posts::table
            .filter(posts::author_id.eq_any(followed))
            .order(posts::creation_date.desc())
            .then_order_by(posts::id.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count_for_user_feed(conn: &Connection, user: &User) -> Result<i64> {
        use crate::schema::follows;
        let followed = follows::table
            .filter(follows::follower_id.eq(user.id))
            .select(follows::following_id);
        posts::table
            .filter(posts::author_id.eq_any(followed))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_group(&self, conn: &Connection) -> Result<Option<Group>> {
        self.group_id.map(|id| Group::get(conn, id)).transpose()
    }

    pub fn get_image(&self, conn: &Connection) -> Result<Option<Media>> {
        self.image_id.map(|id| Media::get(conn, id)).transpose()
    }

    /// Loads the author and group of each post, for display in feeds.
    pub fn with_relations(
        conn: &Connection,
        posts: Vec<Post>,
    ) -> Result<Vec<(Post, User, Option<Group>)>> {
        posts
            .into_iter()
            .map(|post| {
                let author = post.get_author(conn)?;
                let group = post.get_group(conn)?;
                Ok((post, author, group))
            })
            .collect()
    }
}
