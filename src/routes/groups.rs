use crate::{
    routes::{errors::ErrorPage, Page},
    template_utils::{IntoContext, Ructe},
};
use yatube_models::{groups::Group, posts::Post, YatubeRocket};

#[get("/group/<slug>?<page>")]
pub fn details(slug: String, page: Option<Page>, rockets: YatubeRocket) -> Result<Ructe, ErrorPage> {
    let page = page.unwrap_or_default();
    let conn = &*rockets.conn;
    let group = Group::find_by_slug(conn, &slug)?;
    let posts = Post::list_for_group(conn, &group, page.limits())?;
    let entries = Post::with_relations(conn, posts)?;
    let n_pages = Page::total(Post::count_for_group(conn, &group)? as i32);
    Ok(render!(groups::details(
        &rockets.to_context(),
        group,
        entries,
        page.0,
        n_pages
    )))
}
