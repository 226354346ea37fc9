use reqwest::multipart::{Form, Part};
use tracing::{info, instrument, warn};

use crate::{
    api::{ApiResponse, Auth, Payload},
    error::{fallback, ClientError, ClientResult, FieldError},
    images::ImageAsset,
    meals::{
        dto::{CreatedMeal, Meal, MealsPayload, NewMeal},
        validation::validate_new_meal,
    },
    state::ClientContext,
};

/// Lists the user's meals. Fails with `NotAuthenticated` before any request
/// when no token is stored.
#[instrument(skip(ctx))]
pub async fn get_meals(ctx: &ClientContext) -> ClientResult<Vec<Meal>> {
    ctx.session.require_token().await?;

    let res = ctx
        .api
        .get("/meals", Auth::Bearer, fallback::LIST_MEALS)
        .await;
    let res = drop_rejected_session(ctx, res).await?;

    let meals = serde_json::from_value::<MealsPayload>(res.body)
        .map_err(|e| {
            warn!(error = %e, "unexpected meals payload");
            ClientError::MalformedResponse(fallback::LIST_MEALS.to_string())
        })?
        .into_meals();
    info!(count = meals.len(), "meals fetched");
    Ok(meals)
}

/// Creates a meal, as multipart when a photo is attached and JSON otherwise.
/// Fields and photo are checked locally before anything is sent.
#[instrument(skip(ctx, titulo, descricao, image), fields(with_image = image.is_some()))]
pub async fn create_meal(
    ctx: &ClientContext,
    titulo: &str,
    descricao: &str,
    image: Option<&ImageAsset>,
) -> ClientResult<CreatedMeal> {
    ctx.session.require_token().await?;

    let titulo = titulo.trim();
    let descricao = descricao.trim();
    let mut errors = validate_new_meal(titulo, descricao);
    if let Some(image) = image {
        errors.extend(image.validate());
    }
    if !errors.is_empty() {
        warn!(fields = errors.len(), "meal form rejected");
        return Err(ClientError::Validation(errors));
    }

    let payload = match image {
        Some(image) => Payload::Multipart(meal_form(titulo, descricao, image).await?),
        None => Payload::json(&NewMeal {
            titulo: titulo.to_string(),
            descricao: descricao.to_string(),
        })?,
    };

    let res = ctx
        .api
        .post("/meals", payload, Auth::Bearer, fallback::CREATE_MEAL)
        .await;
    let res = drop_rejected_session(ctx, res).await?;

    info!(status = res.status, "meal created");
    Ok(CreatedMeal {
        status: res.status,
        body: res.body,
    })
}

async fn meal_form(titulo: &str, descricao: &str, image: &ImageAsset) -> ClientResult<Form> {
    let data = image.read().await?;
    let len = data.len() as u64;
    let part = Part::stream_with_length(data, len)
        .file_name(image.file_name.clone())
        .mime_str(&image.mime)
        .map_err(|_| {
            ClientError::Validation(vec![FieldError::new(
                "image",
                "A imagem deve ser JPEG ou PNG",
            )])
        })?;
    Ok(Form::new()
        .text("titulo", titulo.to_string())
        .text("descricao", descricao.to_string())
        .part("image", part))
}

/// A 401 on an authenticated call ends the session.
async fn drop_rejected_session(
    ctx: &ClientContext,
    res: ClientResult<ApiResponse>,
) -> ClientResult<ApiResponse> {
    if let Err(ClientError::Unauthorized { .. }) = &res {
        ctx.session.invalidate().await;
    }
    res
}
