#![feature(proc_macro_hygiene, decl_macro)]

#[macro_use]
extern crate rocket;

use diesel::r2d2::ConnectionManager;
use dotenv::dotenv;
use rocket::Rocket;
use tracing::info;
use yatube_models::{db_conn::DbPool, migrations, Connection, CONFIG};

include!(concat!(env!("OUT_DIR"), "/templates.rs"));

#[macro_use]
mod template_utils;
mod routes;
mod utils;

fn init_pool() -> Option<DbPool> {
    let manager = ConnectionManager::<Connection>::new(CONFIG.database_url.as_str());
    DbPool::builder().build(manager).ok()
}

pub fn init_rocket(pool: DbPool) -> Rocket {
    rocket::custom(
        CONFIG
            .rocket
            .clone()
            .expect("Invalid Rocket configuration, please check your .env"),
    )
    .mount(
        "/",
        routes![
            routes::posts::index,
            routes::posts::details,
            routes::posts::new,
            routes::posts::new_auth,
            routes::posts::create,
            routes::posts::create_auth,
            routes::posts::edit,
            routes::posts::edit_auth,
            routes::posts::update,
            routes::posts::update_auth,
            routes::posts::delete,
            routes::posts::delete_auth,
            routes::groups::details,
            routes::user::details,
            routes::user::follow,
            routes::user::follow_auth,
            routes::user::unfollow,
            routes::user::unfollow_auth,
            routes::user::feed,
            routes::user::feed_auth,
            routes::user::new,
            routes::user::create,
            routes::comments::create,
            routes::comments::create_auth,
            routes::medias::list,
            routes::medias::list_auth,
            routes::medias::new,
            routes::medias::new_auth,
            routes::medias::upload,
            routes::medias::upload_auth,
            routes::medias::delete,
            routes::medias::delete_auth,
            routes::session::new,
            routes::session::create,
            routes::session::delete,
            routes::static_files,
        ],
    )
    .register(catchers![
        routes::errors::not_found,
        routes::errors::server_error
    ])
    .manage(pool)
}

fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let pool = init_pool().expect("main: database pool initialization error");
    let conn = pool.get().expect("main: couldn't open a database connection");
    migrations::run(&conn).expect("main: database migration error");
    drop(conn);

    info!("Starting {}", CONFIG.base_url.as_str());
    init_rocket(pool).launch();
}

#[cfg(test)]
mod tests {
    use super::init_rocket;
    use diesel::r2d2::ConnectionManager;
    use rocket::{
        http::{ContentType, Cookie, Status},
        local::{Client, LocalResponse},
    };
    use std::fs;
    use yatube_models::{
        db_conn::DbPool,
        groups::{Group, NewGroup},
        migrations,
        posts::{NewPost, Post},
        users::NewUser,
        Connection,
    };

    fn client(db_name: &str) -> Client {
        let db_path = std::env::temp_dir().join(db_name);
        let _ = fs::remove_file(&db_path);
        let manager = ConnectionManager::<Connection>::new(db_path.to_str().unwrap());
        let pool = DbPool::builder().build(manager).unwrap();
        let conn = pool.get().unwrap();
        migrations::run(&conn).unwrap();
        fill_database(&conn);
        drop(conn);
        Client::new(init_rocket(pool)).unwrap()
    }

    fn fill_database(conn: &Connection) {
        let leo = NewUser::new_local(
            conn,
            "leo".into(),
            "Leo".into(),
            "leo@example.com".into(),
            "hunter2boogaloo",
        )
        .unwrap();
        NewUser::new_local(
            conn,
            "mia".into(),
            String::new(),
            "mia@example.com".into(),
            "hunter2boogaloo",
        )
        .unwrap();
        let group = Group::insert(
            conn,
            NewGroup {
                title: "Rustaceans".into(),
                slug: "rustaceans".into(),
                description: "Crab talk".into(),
            },
        )
        .unwrap();
        for i in 0..13 {
            Post::insert(
                conn,
                NewPost {
                    author_id: leo.id,
                    group_id: if i == 0 { Some(group.id) } else { None },
                    text: format!("Post number {}", i),
                    image_id: None,
                },
            )
            .unwrap();
        }
    }

    fn login(client: &Client) -> Cookie<'static> {
        let response = client
            .post("/login")
            .header(ContentType::Form)
            .body("email_or_name=leo&password=hunter2boogaloo")
            .dispatch();
        response
            .cookies()
            .into_iter()
            .find(|cookie| cookie.name() == "user_id")
            .expect("no session cookie")
            .into_owned()
    }

    fn body(mut response: LocalResponse<'_>) -> String {
        response.body_string().unwrap_or_default()
    }

    #[test]
    fn index_is_paginated() {
        let client = client("index_is_paginated.sqlite");

        let response = client.get("/").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let page_one = body(response);
        assert_eq!(page_one.matches("class=\"post-card\"").count(), 10);

        let page_two = body(client.get("/?page=2").dispatch());
        assert_eq!(page_two.matches("class=\"post-card\"").count(), 3);

        // Out-of-range page numbers fall back to the first page.
        let huge = body(client.get("/?page=300000000").dispatch());
        assert_eq!(huge.matches("class=\"post-card\"").count(), 10);
    }

    #[test]
    fn group_page_only_shows_group_posts() {
        let client = client("group_page_only_shows_group_posts.sqlite");

        let page = body(client.get("/group/rustaceans").dispatch());
        assert_eq!(page.matches("class=\"post-card\"").count(), 1);
        assert!(page.contains("Rustaceans"));

        let response = client.get("/group/nope").dispatch();
        assert_eq!(response.status(), Status::NotFound);
    }

    #[test]
    fn profile_shows_author_posts() {
        let client = client("profile_shows_author_posts.sqlite");

        let page = body(client.get("/profile/mia").dispatch());
        assert_eq!(page.matches("class=\"post-card\"").count(), 0);

        let page = body(client.get("/profile/leo?page=2").dispatch());
        assert_eq!(page.matches("class=\"post-card\"").count(), 3);
    }

    #[test]
    fn guest_is_redirected_to_login() {
        let client = client("guest_is_redirected_to_login.sqlite");

        let response = client.get("/create").dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        let location = response.headers().get_one("Location").unwrap();
        assert!(location.starts_with("/login?next="));

        let response = client
            .post("/posts/1/comment")
            .header(ContentType::Form)
            .body("text=hello")
            .dispatch();
        assert_eq!(response.status(), Status::SeeOther);

        let response = client.post("/posts/1/delete").dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        let location = response.headers().get_one("Location").unwrap();
        assert!(location.starts_with("/login?next="));

        let response = client.post("/medias/1/delete").dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        let location = response.headers().get_one("Location").unwrap();
        assert!(location.starts_with("/login?next="));
    }

    #[test]
    fn create_post_redirects_to_profile() {
        let client = client("create_post_redirects_to_profile.sqlite");
        let session = login(&client);

        let response = client
            .post("/create")
            .header(ContentType::Form)
            .cookie(session)
            .body("text=Fresh+out+of+the+oven&group=&image=")
            .dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(
            response.headers().get_one("Location"),
            Some("/profile/leo")
        );

        let page = body(client.get("/posts/14").dispatch());
        assert!(page.contains("Fresh out of the oven"));
    }

    #[test]
    fn empty_post_is_rejected() {
        let client = client("empty_post_is_rejected.sqlite");
        let session = login(&client);

        let response = client
            .post("/create")
            .header(ContentType::Form)
            .cookie(session)
            .body("text=")
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert!(body(response).contains("be empty"));
    }

    #[test]
    fn only_the_author_can_edit() {
        let client = client("only_the_author_can_edit.sqlite");

        let response = client
            .post("/login")
            .header(ContentType::Form)
            .body("email_or_name=mia&password=hunter2boogaloo")
            .dispatch();
        let session = response
            .cookies()
            .into_iter()
            .find(|cookie| cookie.name() == "user_id")
            .unwrap()
            .into_owned();

        let response = client.get("/posts/1/edit").cookie(session).dispatch();
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(response.headers().get_one("Location"), Some("/posts/1"));
    }

    #[test]
    fn comment_appears_on_post_page() {
        let client = client("comment_appears_on_post_page.sqlite");
        let session = login(&client);

        let response = client
            .post("/posts/1/comment")
            .header(ContentType::Form)
            .cookie(session)
            .body("text=Nice+one")
            .dispatch();
        assert_eq!(response.status(), Status::SeeOther);

        let page = body(client.get("/posts/1").dispatch());
        assert!(page.contains("Nice one"));
    }

    #[test]
    fn follow_then_feed() {
        let client = client("follow_then_feed.sqlite");

        let response = client
            .post("/login")
            .header(ContentType::Form)
            .body("email_or_name=mia&password=hunter2boogaloo")
            .dispatch();
        let session = response
            .cookies()
            .into_iter()
            .find(|cookie| cookie.name() == "user_id")
            .unwrap()
            .into_owned();

        let response = client
            .post("/profile/leo/follow")
            .cookie(session.clone())
            .dispatch();
        assert_eq!(response.status(), Status::SeeOther);

        let feed = body(client.get("/follow").cookie(session).dispatch());
        assert_eq!(feed.matches("class=\"post-card\"").count(), 10);
    }

    #[test]
    fn signup_checks_password_confirmation() {
        let client = client("signup_checks_password_confirmation.sqlite");

        let response = client
            .post("/users/new")
            .header(ContentType::Form)
            .body("username=nina&display_name=&email=nina%40example.com&password=12345678&password_confirmation=87654321")
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert!(body(response).contains("Passwords are not matching"));

        let response = client
            .post("/users/new")
            .header(ContentType::Form)
            .body("username=nina&display_name=&email=nina%40example.com&password=12345678&password_confirmation=12345678")
            .dispatch();
        assert_eq!(response.status(), Status::SeeOther);

        let page = body(client.get("/profile/nina").dispatch());
        assert!(page.contains("nina"));
    }

    #[test]
    fn unknown_page_is_a_not_found() {
        let client = client("unknown_page_is_a_not_found.sqlite");
        let response = client.get("/posts/999").dispatch();
        assert_eq!(response.status(), Status::NotFound);
    }
}
