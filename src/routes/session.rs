use crate::{
    routes::RespondOrRedirect,
    template_utils::{IntoContext, Ructe},
};
use rocket::{
    http::{Cookie, Cookies, SameSite},
    request::LenientForm,
    response::Redirect,
};
use yatube_models::{
    users::{User, AUTH_COOKIE},
    YatubeRocket,
};

#[derive(Clone, Default, FromForm)]
pub struct LoginForm {
    pub email_or_name: String,
    pub password: String,
    pub next: Option<String>,
}

#[get("/login?<next>")]
pub fn new(next: Option<String>, rockets: YatubeRocket) -> Ructe {
    render!(session::login(
        &rockets.to_context(),
        &LoginForm {
            next,
            ..LoginForm::default()
        },
        Vec::new()
    ))
}

#[post("/login", data = "<form>")]
pub fn create(
    form: LenientForm<LoginForm>,
    mut cookies: Cookies<'_>,
    rockets: YatubeRocket,
) -> RespondOrRedirect {
    match User::login(&rockets.conn, &form.email_or_name, &form.password) {
        Ok(user) => {
            cookies.add_private(
                Cookie::build(AUTH_COOKIE, user.id.to_string())
                    .same_site(SameSite::Lax)
                    .finish(),
            );
            // only follow local redirection targets
            let destination = form
                .next
                .as_deref()
                .filter(|next| next.starts_with('/'))
                .unwrap_or("/")
                .to_owned();
            Redirect::to(destination).into()
        }
        Err(_) => render!(session::login(
            &rockets.to_context(),
            &*form,
            vec!["Invalid username, or email, or password".to_owned()]
        ))
        .into(),
    }
}

#[get("/logout")]
pub fn delete(mut cookies: Cookies<'_>) -> Redirect {
    if let Some(cookie) = cookies.get_private(AUTH_COOKIE) {
        cookies.remove_private(cookie);
    }
    Redirect::to("/")
}
