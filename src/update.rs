use crate::{cli::UpdateOptions, extract, player_response, playlist, util};

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("could not fetch page: {0}")]
    FetchError(#[from] util::FetchError),
    #[error("could not extract manifest URL: {0}")]
    ExtractError(#[from] extract::ExtractError),
    #[error("could not patch playlist: {0}")]
    PlaylistError(#[from] playlist::PlaylistError),
}

/// One fetch-extract-patch pass. Any failure aborts before the playlist
/// is touched; a stale or empty URL is never written.
pub async fn run(
    client: &util::HttpClient,
    opts: &UpdateOptions,
) -> Result<playlist::PatchOutcome, UpdateError> {
    info!("Fetching {}", opts.url);
    let body = client.fetch_text(&opts.url).await?;

    let mut manifest_url = extract_manifest_url(&body, opts.preferred_domain.as_deref())?;

    if opts.strip_parameters {
        let stripped = extract::strip_url_parameters(&manifest_url)?;
        if stripped != manifest_url {
            info!("Stripped parameters from URL: {}", stripped);
            manifest_url = stripped;
        }
    }

    let outcome = playlist::patch_entry(&opts.file, &opts.entry_name, &manifest_url)?;
    match &outcome {
        playlist::PatchOutcome::Updated { old, new } => {
            info!("Updated {} URL", opts.entry_name);
            info!("  Old: {}", old);
            info!("  New: {}", new);
        }
        playlist::PatchOutcome::Unchanged => info!("URL unchanged: {}", manifest_url),
    }

    Ok(outcome)
}

/// The player response is authoritative when the page carries one; other
/// pages fall back to a generic `.m3u8` scan.
fn extract_manifest_url(
    body: &str,
    preferred_domain: Option<&str>,
) -> Result<String, extract::ExtractError> {
    if let Ok(ipr) = player_response::InitialPlayerResponse::from_html(body) {
        match ipr.hls_manifest_url() {
            Ok(url) => return Ok(url.to_string()),
            Err(e) => {
                if let Some(start) = ipr.scheduled_start() {
                    warn!("Stream is offline, scheduled for {}", start);
                }
                debug!("Player response has no usable manifest: {}", e);
            }
        }
    }

    extract::select_manifest_url(body, preferred_domain)
}
