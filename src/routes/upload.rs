use axum::extract::{Multipart, multipart::Field};

use crate::{
    error::{AppError, AppResult},
    services::product_service::UploadedFile,
};

pub const FILE_FIELD: &str = "file";

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}

pub async fn read_file(field: Field<'_>) -> AppResult<UploadedFile> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(UploadedFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

pub async fn read_text(field: Field<'_>) -> AppResult<String> {
    field.text().await.map_err(multipart_error)
}

pub async fn next_field(multipart: &mut Multipart) -> AppResult<Option<Field<'_>>> {
    multipart.next_field().await.map_err(multipart_error)
}

/// The first part named `file`; other parts are ignored.
pub async fn single_file(mut multipart: Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some(FILE_FIELD) {
            return read_file(field).await;
        }
    }
    Err(AppError::BadRequest("file is required".into()))
}
