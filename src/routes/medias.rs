use crate::{
    routes::errors::ErrorPage,
    template_utils::{IntoContext, Ructe},
    utils::requires_login,
};
use guid_create::GUID;
use multipart::server::{
    save::{SavedData, SaveResult},
    Multipart,
};
use rocket::{
    http::ContentType,
    response::{status, Flash, Redirect},
    Data,
};
use std::fs;
use yatube_models::{db_conn::DbConn, medias::*, users::User, Error, YatubeRocket, CONFIG};

#[get("/medias")]
pub fn list(user: User, rockets: YatubeRocket) -> Result<Ructe, ErrorPage> {
    let medias = Media::for_user(&rockets.conn, user.id)?;
    Ok(render!(medias::index(&rockets.to_context(), medias)))
}

#[get("/medias", rank = 2)]
pub fn list_auth() -> Flash<Redirect> {
    requires_login("You need to be logged in to access your gallery", "/medias")
}

#[get("/medias/new")]
pub fn new(_user: User, rockets: YatubeRocket) -> Ructe {
    render!(medias::new(&rockets.to_context()))
}

#[get("/medias/new", rank = 2)]
pub fn new_auth() -> Flash<Redirect> {
    requires_login(
        "You need to be logged in to upload an image",
        "/medias/new",
    )
}

#[post("/medias/new", data = "<data>")]
pub fn upload(
    user: User,
    data: Data,
    ct: &ContentType,
    conn: DbConn,
) -> Result<Redirect, status::BadRequest<&'static str>> {
    if !ct.is_form_data() {
        return Ok(Redirect::to(uri!(new)));
    }
    let (_, boundary) = ct
        .params()
        .find(|&(k, _)| k == "boundary")
        .ok_or_else(|| status::BadRequest(Some("No boundary")))?;

    match Multipart::with_body(data.open(), boundary).save().temp() {
        SaveResult::Full(entries) => {
            let fields = entries.fields;

            let filename = fields
                .get("file")
                .and_then(|v| v.iter().next())
                .ok_or_else(|| status::BadRequest(Some("No file uploaded")))?
                .headers
                .filename
                .clone();
            let ext = filename
                .and_then(|f| f.rsplit('.').next().map(|ext| ext.to_owned()))
                .unwrap_or_else(|| "png".to_owned());
            let dest = format!("{}/{}.{}", CONFIG.media_directory, GUID::rand(), ext);

            match fields["file"][0].data {
                SavedData::Bytes(ref bytes) => fs::write(&dest, bytes)
                    .map_err(|_| status::BadRequest(Some("Couldn't save upload")))?,
                SavedData::File(ref path, _) => {
                    fs::copy(path, &dest)
                        .map_err(|_| status::BadRequest(Some("Couldn't copy upload")))?;
                }
                _ => {
                    return Ok(Redirect::to(uri!(new)));
                }
            }

            let alt_text = fields
                .get("alt")
                .and_then(|v| v.iter().next())
                .and_then(|field| match field.data {
                    SavedData::Text(ref s) => Some(s.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            Media::insert(
                &*conn,
                NewMedia {
                    file_path: dest,
                    alt_text,
                    owner_id: user.id,
                },
            )
            .map_err(|_| status::BadRequest(Some("Error while saving media")))?;
            Ok(Redirect::to(uri!(list)))
        }
        SaveResult::Partial(_, _) | SaveResult::Error(_) => Ok(Redirect::to(uri!(new))),
    }
}

#[post("/medias/new", rank = 2)]
pub fn upload_auth() -> Flash<Redirect> {
    requires_login(
        "You need to be logged in to upload an image",
        "/medias/new",
    )
}

#[post("/medias/<id>/delete")]
pub fn delete(id: i32, user: User, rockets: YatubeRocket) -> Result<Redirect, ErrorPage> {
    let media = Media::get(&rockets.conn, id)?;
    if !media.is_owned_by(&user) {
        return Err(Error::Unauthorized.into());
    }
    media.delete(&rockets.conn)?;
    Ok(Redirect::to(uri!(list)))
}

#[post("/medias/<_id>/delete", rank = 2)]
pub fn delete_auth(_id: i32) -> Flash<Redirect> {
    requires_login("You need to be logged in to delete an image", "/medias")
}
