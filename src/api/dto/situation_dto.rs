//! Situation form extractor for `POST /situations`.
//!
//! Browsers submit the form as `multipart/form-data` when an image is
//! attached and as `application/x-www-form-urlencoded` otherwise; both are
//! accepted. Any other content type yields an empty form.

use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::BoardError;
use crate::service::ImageUpload;

/// Decoded `POST /situations` form.
#[derive(Debug, Default, ToSchema)]
pub struct SituationForm {
    /// Situation text. Defaults to empty.
    pub text: String,
    /// Parent situation id. Unparseable values are treated as absent.
    pub reply_to: Option<i64>,
    /// Optional image part (`png`, `jpg`, `jpeg`, `gif`, `webp`).
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Deserialize)]
struct UrlEncodedFields {
    #[serde(default)]
    text: String,
    #[serde(default)]
    reply_to: Option<String>,
}

fn parse_reply_to(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

impl SituationForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, BoardError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("text") => form.text = field.text().await?,
                Some("reply_to") => form.reply_to = parse_reply_to(&field.text().await?),
                Some("image") if form.image.is_none() => {
                    let filename = field.file_name().unwrap_or_default().to_owned();
                    let bytes = field.bytes().await?;
                    if !filename.is_empty() {
                        form.image = Some(ImageUpload { filename, bytes });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

impl From<UrlEncodedFields> for SituationForm {
    fn from(fields: UrlEncodedFields) -> Self {
        Self {
            text: fields.text,
            reply_to: fields.reply_to.as_deref().and_then(parse_reply_to),
            image: None,
        }
    }
}

impl<S> FromRequest<S> for SituationForm
where
    S: Send + Sync,
{
    type Rejection = BoardError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<UrlEncodedFields>::from_request(req, state).await?;
            Ok(fields.into())
        } else {
            Ok(Self::default())
        }
    }
}
