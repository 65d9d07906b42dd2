use crate::{routes::errors::ErrorPage, utils::requires_login};
use rocket::{
    request::LenientForm,
    response::{Flash, Redirect},
};
use yatube_models::{comments::*, posts::Post, users::User, YatubeRocket};

#[derive(Clone, Default, FromForm)]
pub struct NewCommentForm {
    pub text: String,
}

#[post("/posts/<id>/comment", data = "<form>")]
pub fn create(
    id: i32,
    form: LenientForm<NewCommentForm>,
    user: User,
    rockets: YatubeRocket,
) -> Result<Flash<Redirect>, ErrorPage> {
    let conn = &*rockets.conn;
    let post = Post::get(conn, id)?;
    if form.text.trim().is_empty() {
        return Ok(Flash::error(
            Redirect::to(format!("/posts/{}", post.id)),
            "Your comment can't be empty",
        ));
    }
    Comment::insert(
        conn,
        NewComment {
            post_id: post.id,
            author_id: user.id,
            text: form.text.clone(),
        },
    )?;
    Ok(Flash::success(
        Redirect::to(format!("/posts/{}", post.id)),
        "Your comment was published",
    ))
}

#[post("/posts/<id>/comment", rank = 2)]
pub fn create_auth(id: i32) -> Flash<Redirect> {
    requires_login(
        "You need to be logged in to post a comment",
        &format!("/posts/{}", id),
    )
}
