use crate::{
    routes::{errors::ErrorPage, Page, RespondOrRedirect},
    template_utils::{IntoContext, Ructe},
    utils::requires_login,
};
use rocket::{
    http::{Cookie, Cookies, SameSite},
    request::LenientForm,
    response::{Flash, Redirect},
};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};
use yatube_models::{
    follows::{Follow, NewFollow},
    posts::Post,
    users::{User, AUTH_COOKIE, NewUser},
    YatubeRocket,
};

#[get("/profile/<name>?<page>")]
pub fn details(
    name: String,
    page: Option<Page>,
    rockets: YatubeRocket,
) -> Result<Ructe, ErrorPage> {
    let page = page.unwrap_or_default();
    let conn = &*rockets.conn;
    let author = User::find_by_name(conn, &name)?;
    let posts = Post::list_for_author(conn, &author, page.limits())?;
    let entries = Post::with_relations(conn, posts)?;
    let n_posts = Post::count_for_author(conn, &author)? as i32;
    let n_followers = author.count_followers(conn)? as i32;
    let n_following = author.count_following(conn)? as i32;
    let is_following = rockets
        .user
        .as_ref()
        .map(|user| user.is_following(conn, author.id))
        .transpose()?
        .unwrap_or(false);
    Ok(render!(users::details(
        &rockets.to_context(),
        author,
        entries,
        n_posts,
        n_followers,
        n_following,
        is_following,
        page.0,
        Page::total(n_posts)
    )))
}

#[post("/profile/<name>/follow")]
pub fn follow(name: String, user: User, rockets: YatubeRocket) -> Result<Redirect, ErrorPage> {
    let conn = &*rockets.conn;
    let target = User::find_by_name(conn, &name)?;
    // following yourself or someone you already follow is a no-op
    if target.id != user.id && Follow::find(conn, user.id, target.id).is_err() {
        Follow::insert(
            conn,
            NewFollow {
                follower_id: user.id,
                following_id: target.id,
            },
        )?;
    }
    Ok(Redirect::to(format!("/profile/{}", target.username)))
}

#[post("/profile/<name>/follow", rank = 2)]
pub fn follow_auth(name: String) -> Flash<Redirect> {
    requires_login(
        "You need to be logged in to follow someone",
        &format!("/profile/{}", name),
    )
}

#[post("/profile/<name>/unfollow")]
pub fn unfollow(name: String, user: User, rockets: YatubeRocket) -> Result<Redirect, ErrorPage> {
    let conn = &*rockets.conn;
    let target = User::find_by_name(conn, &name)?;
    if let Ok(follow) = Follow::find(conn, user.id, target.id) {
        follow.delete(conn)?;
    }
    Ok(Redirect::to(format!("/profile/{}", target.username)))
}

#[post("/profile/<name>/unfollow", rank = 2)]
pub fn unfollow_auth(name: String) -> Flash<Redirect> {
    requires_login(
        "You need to be logged in to unfollow someone",
        &format!("/profile/{}", name),
    )
}

#[get("/follow?<page>")]
pub fn feed(page: Option<Page>, user: User, rockets: YatubeRocket) -> Result<Ructe, ErrorPage> {
    let page = page.unwrap_or_default();
    let conn = &*rockets.conn;
    let posts = Post::user_feed_page(conn, &user, page.limits())?;
    let entries = Post::with_relations(conn, posts)?;
    let n_pages = Page::total(Post::count_for_user_feed(conn, &user)? as i32);
    Ok(render!(posts::index(
        &rockets.to_context(),
        "Favorite authors",
        entries,
        page.0,
        n_pages
    )))
}

#[get("/follow", rank = 2)]
pub fn feed_auth() -> Flash<Redirect> {
    requires_login("You need to be logged in to see your feed", "/follow")
}

#[derive(Clone, Default, FromForm, Validate)]
#[validate(schema(
    function = "passwords_match",
    skip_on_field_errors = false,
    message = "Passwords are not matching"
))]
pub struct NewUserForm {
    #[validate(length(min = 1, message = "Username can't be empty"))]
    pub username: String,
    pub display_name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters long"))]
    pub password_confirmation: String,
}

pub fn passwords_match(form: &NewUserForm) -> Result<(), ValidationError> {
    if form.password != form.password_confirmation {
        Err(ValidationError::new("password_match"))
    } else {
        Ok(())
    }
}

#[get("/users/new")]
pub fn new(rockets: YatubeRocket) -> Ructe {
    render!(users::new(
        &rockets.to_context(),
        &NewUserForm::default(),
        ValidationErrors::new()
    ))
}

#[post("/users/new", data = "<form>")]
pub fn create(
    form: LenientForm<NewUserForm>,
    mut cookies: Cookies<'_>,
    rockets: YatubeRocket,
) -> RespondOrRedirect {
    let conn = &*rockets.conn;
    let mut errors = match form.validate() {
        Ok(_) => ValidationErrors::new(),
        Err(e) => e,
    };
    if User::find_by_name(conn, &form.username).is_ok() {
        let mut err = ValidationError::new("username_taken");
        err.message = Some(Cow::from("This username is already taken"));
        errors.add("username", err);
    }
    if User::find_by_email(conn, &form.email).is_ok() {
        let mut err = ValidationError::new("email_taken");
        err.message = Some(Cow::from("An account already exists for this email"));
        errors.add("email", err);
    }
    if !errors.is_empty() {
        return render!(users::new(&rockets.to_context(), &*form, errors)).into();
    }

    match NewUser::new_local(
        conn,
        form.username.clone(),
        form.display_name.clone(),
        form.email.clone(),
        &form.password,
    ) {
        Ok(user) => {
            cookies.add_private(
                Cookie::build(AUTH_COOKIE, user.id.to_string())
                    .same_site(SameSite::Lax)
                    .finish(),
            );
            Flash::success(Redirect::to("/"), "Welcome!").into()
        }
        Err(_) => {
            let mut err = ValidationError::new("db_error");
            err.message = Some(Cow::from("Couldn't create your account"));
            errors.add("username", err);
            render!(users::new(&rockets.to_context(), &*form, errors)).into()
        }
    }
}
