use crate::{Connection, Error, Result};

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
embed_migrations!("migrations/sqlite");

#[cfg(all(not(feature = "sqlite"), feature = "postgres"))]
embed_migrations!("migrations/postgres");

pub fn run(conn: &Connection) -> Result<()> {
    embedded_migrations::run(conn).map_err(Error::from)
}
