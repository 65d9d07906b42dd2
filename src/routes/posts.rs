use crate::{
    routes::{errors::ErrorPage, Page, RespondOrRedirect},
    template_utils::{validation_messages, IntoContext, Ructe},
    utils::requires_login,
};
use rocket::{
    request::LenientForm,
    response::{Flash, Redirect},
};
use validator::Validate;
use yatube_models::{
    comments::Comment, groups::Group, medias::Media, posts::*, users::User, Connection, Error,
    YatubeRocket,
};

#[get("/?<page>")]
pub fn index(page: Option<Page>, rockets: YatubeRocket) -> Result<Ructe, ErrorPage> {
    let page = page.unwrap_or_default();
    let conn = &*rockets.conn;
    let posts = Post::list_page(conn, page.limits())?;
    let entries = Post::with_relations(conn, posts)?;
    let n_pages = Page::total(Post::count(conn)? as i32);
    Ok(render!(posts::index(
        &rockets.to_context(),
        "Latest posts",
        entries,
        page.0,
        n_pages
    )))
}

#[get("/posts/<id>")]
pub fn details(id: i32, rockets: YatubeRocket) -> Result<Ructe, ErrorPage> {
    let conn = &*rockets.conn;
    let post = Post::get(conn, id)?;
    let author = post.get_author(conn)?;
    let group = post.get_group(conn)?;
    let image = post.get_image(conn)?;
    let comments = Comment::list_for_post(conn, post.id)?
        .into_iter()
        .map(|comment| {
            let comment_author = comment.get_author(conn)?;
            Ok((comment, comment_author))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let n_author_posts = Post::count_for_author(conn, &author)? as i32;
    Ok(render!(posts::details(
        &rockets.to_context(),
        post,
        author,
        group,
        image,
        comments,
        n_author_posts
    )))
}

#[derive(Clone, Default, FromForm, Validate)]
pub struct NewPostForm {
    #[validate(length(min = 1, message = "Your post can't be empty"))]
    pub text: String,
    pub group: Option<i32>,
    pub image: Option<i32>,
}

fn validate_form(conn: &Connection, form: &NewPostForm, user: &User) -> Vec<String> {
    let mut messages = match form.validate() {
        Ok(_) => Vec::new(),
        Err(errors) => validation_messages(&errors),
    };
    if let Some(group_id) = form.group {
        if Group::get(conn, group_id).is_err() {
            messages.push("This group doesn't exist".to_owned());
        }
    }
    if let Some(image_id) = form.image {
        match Media::get(conn, image_id) {
            Ok(media) if media.is_owned_by(user) => {}
            _ => messages.push("You can only illustrate posts with your own images".to_owned()),
        }
    }
    messages
}

#[get("/create")]
pub fn new(user: User, rockets: YatubeRocket) -> Result<Ructe, ErrorPage> {
    let conn = &*rockets.conn;
    let groups = Group::list(conn)?;
    let medias = Media::for_user(conn, user.id)?;
    Ok(render!(posts::new(
        &rockets.to_context(),
        "New post",
        &NewPostForm::default(),
        Vec::new(),
        groups,
        medias,
        "/create".to_string()
    )))
}

#[get("/create", rank = 2)]
pub fn new_auth() -> Flash<Redirect> {
    requires_login("You need to be logged in to publish a post", "/create")
}

#[post("/create", data = "<form>")]
pub fn create(
    form: LenientForm<NewPostForm>,
    user: User,
    rockets: YatubeRocket,
) -> Result<RespondOrRedirect, ErrorPage> {
    let conn = &*rockets.conn;
    let errors = validate_form(conn, &form, &user);
    if !errors.is_empty() {
        let groups = Group::list(conn)?;
        let medias = Media::for_user(conn, user.id)?;
        return Ok(render!(posts::new(
            &rockets.to_context(),
            "New post",
            &*form,
            errors,
            groups,
            medias,
            "/create".to_string()
        ))
        .into());
    }
    Post::insert(
        conn,
        NewPost {
            author_id: user.id,
            group_id: form.group,
            text: form.text.clone(),
            image_id: form.image,
        },
    )?;
    Ok(Flash::success(
        Redirect::to(format!("/profile/{}", user.username)),
        "Your post was published",
    )
    .into())
}

#[post("/create", rank = 2)]
pub fn create_auth() -> Flash<Redirect> {
    requires_login("You need to be logged in to publish a post", "/create")
}

#[get("/posts/<id>/edit")]
pub fn edit(id: i32, user: User, rockets: YatubeRocket) -> Result<RespondOrRedirect, ErrorPage> {
    let conn = &*rockets.conn;
    let post = Post::get(conn, id)?;
    if post.author_id != user.id {
        return Ok(Redirect::to(format!("/posts/{}", post.id)).into());
    }
    let groups = Group::list(conn)?;
    let medias = Media::for_user(conn, user.id)?;
    let form = NewPostForm {
        text: post.text.clone(),
        group: post.group_id,
        image: post.image_id,
    };
    Ok(render!(posts::new(
        &rockets.to_context(),
        "Edit post",
        &form,
        Vec::new(),
        groups,
        medias,
        format!("/posts/{}/edit", post.id)
    ))
    .into())
}

#[get("/posts/<id>/edit", rank = 2)]
pub fn edit_auth(id: i32) -> Flash<Redirect> {
    requires_login(
        "You need to be logged in to edit a post",
        &format!("/posts/{}/edit", id),
    )
}

#[post("/posts/<id>/edit", data = "<form>")]
pub fn update(
    id: i32,
    form: LenientForm<NewPostForm>,
    user: User,
    rockets: YatubeRocket,
) -> Result<RespondOrRedirect, ErrorPage> {
    let conn = &*rockets.conn;
    let mut post = Post::get(conn, id)?;
    if post.author_id != user.id {
        return Ok(Redirect::to(format!("/posts/{}", post.id)).into());
    }
    let errors = validate_form(conn, &form, &user);
    if !errors.is_empty() {
        let groups = Group::list(conn)?;
        let medias = Media::for_user(conn, user.id)?;
        return Ok(render!(posts::new(
            &rockets.to_context(),
            "Edit post",
            &*form,
            errors,
            groups,
            medias,
            format!("/posts/{}/edit", post.id)
        ))
        .into());
    }
    post.text = form.text.clone();
    post.group_id = form.group;
    post.image_id = form.image;
    let post = post.update(conn)?;
    Ok(Flash::success(
        Redirect::to(format!("/posts/{}", post.id)),
        "Your post was updated",
    )
    .into())
}

#[post("/posts/<id>/edit", rank = 2)]
pub fn update_auth(id: i32) -> Flash<Redirect> {
    requires_login(
        "You need to be logged in to edit a post",
        &format!("/posts/{}/edit", id),
    )
}

#[post("/posts/<id>/delete")]
pub fn delete(id: i32, user: User, rockets: YatubeRocket) -> Result<Redirect, ErrorPage> {
    let conn = &*rockets.conn;
    let post = Post::get(conn, id)?;
    if post.author_id != user.id {
        return Ok(Redirect::to(format!("/posts/{}", post.id)));
    }
    post.delete(conn)?;
    Ok(Redirect::to(format!("/profile/{}", user.username)))
}

#[post("/posts/<id>/delete", rank = 2)]
pub fn delete_auth(id: i32) -> Flash<Redirect> {
    requires_login(
        "You need to be logged in to delete a post",
        &format!("/posts/{}", id),
    )
}
