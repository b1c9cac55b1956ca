use std::fs;
use std::path::Path;

use actix_web::web::{Bytes, Data, Query};
use actix_web::{post, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::services::auth::{log_activity, staff_from_request};
use crate::services::db_utils::AppState;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

fn image_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// The stored-name prefix comes from the query string, so it is stripped
/// down to a plain slug before it can reach a filesystem path.
fn kind_prefix(raw: Option<&str>) -> String {
    let slug: String = raw
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if slug.is_empty() {
        "upload".to_owned()
    } else {
        slug
    }
}

#[derive(Deserialize)]
pub struct UploadParams {
    pub filename: String,
    /// Used as the stored file's prefix, e.g. "dish" or "footer".
    pub kind: Option<String>,
}

#[post("")]
pub async fn upload_image(
    req: HttpRequest,
    state: Data<AppState>,
    params: Query<UploadParams>,
    body: Bytes,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let Some(extension) = image_extension(&params.filename) else {
        return HttpResponse::BadRequest()
            .json("Unsupported file type. Allowed: jpg, jpeg, png, webp");
    };
    if body.is_empty() {
        return HttpResponse::BadRequest().json("File is empty");
    }
    if body.len() > MAX_UPLOAD_BYTES {
        return HttpResponse::BadRequest().json("File exceeds the 5 MB limit");
    }

    let prefix = kind_prefix(params.kind.as_deref());
    let stored_name = format!("{prefix}-{}.{extension}", Utc::now().timestamp_millis());

    if let Err(err) = fs::create_dir_all(&state.settings.upload_dir) {
        return HttpResponse::InternalServerError()
            .json(format!("Failed to prepare upload directory: {err}"));
    }
    let target = Path::new(&state.settings.upload_dir).join(&stored_name);
    if let Err(err) = fs::write(&target, &body) {
        return HttpResponse::InternalServerError().json(format!("Failed to store file: {err}"));
    }

    log_activity(
        &state,
        Some(&staff),
        "upload_image",
        "file",
        None,
        json!({ "filename": stored_name, "size": body.len() }),
    )
    .await;

    HttpResponse::Ok().json(json!({
        "success": true,
        "url": format!("/uploads/{stored_name}"),
        "filename": stored_name,
        "size": body.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allow_list() {
        assert_eq!(image_extension("dish.JPG").as_deref(), Some("jpg"));
        assert_eq!(image_extension("photo.webp").as_deref(), Some("webp"));
        assert_eq!(image_extension("archive.zip"), None);
        assert_eq!(image_extension("noextension"), None);
        assert_eq!(image_extension("script.png.exe"), None);
    }

    #[test]
    fn kind_prefix_cannot_escape_the_upload_dir() {
        assert_eq!(kind_prefix(Some("dish")), "dish");
        assert_eq!(kind_prefix(Some("Footer Logo")), "footerlogo");
        assert_eq!(kind_prefix(Some("../../tmp/evil")), "tmpevil");
        assert_eq!(kind_prefix(Some("../..")), "upload");
        assert_eq!(kind_prefix(None), "upload");
    }
}
