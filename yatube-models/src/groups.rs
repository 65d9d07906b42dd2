use crate::{schema::groups, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Clone, Debug, PartialEq, Queryable, Identifiable)]
pub struct Group {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: String,
}

#[derive(Insertable)]
#[table_name = "groups"]
pub struct NewGroup {
    pub slug: String,
    pub title: String,
    pub description: String,
}

impl Group {
    insert!(groups, NewGroup);
    get!(groups);
    find_by!(groups, find_by_slug, slug as &str);

    pub fn list(conn: &Connection) -> Result<Vec<Group>> {
        groups::table
            .order(groups::title.asc())
            .load(conn)
            .map_err(Error::from)
    }
}
