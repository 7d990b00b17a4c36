//! Saving a finished list: validation, the insert, and the best-effort
//! share artifacts.

use top5_core::share::{escape_html, share_page_html};
use top5_core::{ListSubmission, Selection, Theme};
use top5_render::data_url;
use top5_supabase::{SupabaseClient, SupabaseError};

use crate::config::AppConfig;

/// Pre-submission checks, mirrored to the user verbatim. No state is
/// touched here.
pub fn validate_submission(
    selection: &Selection,
    username: &str,
    theme: Option<&Theme>,
) -> Result<(), String> {
    if !selection.is_complete() {
        return Err("Please complete your top 5!".to_string());
    }
    if username.is_empty() {
        return Err("Please enter a username!".to_string());
    }
    if theme.is_none() {
        return Err("Please select a theme!".to_string());
    }
    Ok(())
}

/// Persist a submission. The row insert is the one hard failure; the card
/// image and share page uploads are best-effort extras on top of it.
/// Returns the new list id.
pub async fn save_list(
    store: &SupabaseClient,
    config: &AppConfig,
    submission: &ListSubmission,
) -> Result<i64, SupabaseError> {
    // The stored row carries the escaped username; the share page is
    // handed the raw one, since the template escapes everything itself.
    let mut row = submission.clone();
    row.username = escape_html(&submission.username);

    let list_id = store.insert_list(&row).await?;

    if let Some(encoded) = &submission.generated_image {
        if let Err(e) = upload_share_artifacts(store, config, submission, list_id, encoded).await {
            tracing::warn!(list_id, error = %e, "Share artifact upload failed, list saved anyway");
        }
    }

    Ok(list_id)
}

async fn upload_share_artifacts(
    store: &SupabaseClient,
    config: &AppConfig,
    submission: &ListSubmission,
    list_id: i64,
    encoded: &str,
) -> Result<(), String> {
    let bucket = &config.storage_bucket;
    let (_, png_bytes) = data_url::decode(encoded)
        .ok_or_else(|| "generated image is not a valid data URL".to_string())?;
    store
        .upload_object(bucket, &format!("{list_id}.png"), png_bytes, "image/png")
        .await
        .map_err(|e| e.to_string())?;

    let image_url = store.public_url(bucket, &format!("{list_id}.png"));
    let html = share_page_html(
        &submission.username,
        &submission.games,
        &image_url,
        list_id,
        &config.site_url,
    );
    store
        .upload_object(
            bucket,
            &format!("{list_id}.html"),
            html.into_bytes(),
            "text/html",
        )
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

/// Where a saved list's share page lives.
pub fn share_url(store: &SupabaseClient, config: &AppConfig, list_id: i64) -> String {
    store.public_url(&config.storage_bucket, &format!("{list_id}.html"))
}
