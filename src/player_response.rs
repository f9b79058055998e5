use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_aux::prelude::*;

// Field names mirror the watch-page JSON; unknown keys are ignored.

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialPlayerResponse {
    pub playability_status: PlayabilityStatus,
    pub streaming_data: Option<StreamingData>,
    pub video_details: Option<VideoDetails>,
    pub microformat: Option<Microformat>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayabilityStatus {
    pub status: Status,
    pub reason: Option<String>,
    pub live_streamability: Option<LiveStreamability>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    LiveStreamOffline,
    Unplayable,
    LoginRequired,
    Error,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamability {
    pub live_streamability_renderer: LiveStreamabilityRenderer,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamabilityRenderer {
    pub video_id: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub poll_delay_ms: Option<i64>,
    pub offline_slate: Option<OfflineSlate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineSlate {
    pub live_stream_offline_slate_renderer: LiveStreamOfflineSlateRenderer,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamOfflineSlateRenderer {
    #[serde(deserialize_with = "deserialize_datetime_utc_from_seconds")]
    pub scheduled_start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingData {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub expires_in_seconds: i64,
    pub hls_manifest_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub length_seconds: i64,
    #[serde(default)]
    pub is_live: bool,
    pub channel_id: String,
    pub author: String,
    pub is_live_content: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Microformat {
    pub player_microformat_renderer: PlayerMicroformatRenderer,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMicroformatRenderer {
    pub live_broadcast_details: Option<LiveBroadcastDetails>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastDetails {
    pub is_live_now: bool,
    pub start_timestamp: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum PlayerResponseError {
    #[error("could not find initial player response")]
    NoInitialPlayerResponse,
    #[error("could not parse initial player response")]
    ParseInitialPlayerResponse(#[from] serde_json::Error),
    #[error("no HLS manifest URL in player response")]
    NoHlsManifestUrl,
}

const IPR_STR: &str = "var ytInitialPlayerResponse =";

fn get_ipr_str(html: &str) -> Option<&str> {
    // Find the start of the initial player response
    let idx_ipr = html.find(IPR_STR)? + IPR_STR.len();

    // Find the start and end of the JSON object
    let idx_start = html[idx_ipr..].find("{")? + idx_ipr;
    let idx_end = html[idx_start..].find("};")? + idx_start + 1;

    // Bounds check
    if idx_start >= idx_end || idx_start >= html.len() || idx_end >= html.len() {
        return None;
    }

    Some(&html[idx_start..idx_end])
}

impl InitialPlayerResponse {
    pub fn from_html(html: &str) -> Result<Self, PlayerResponseError> {
        // Find the initial player response
        let ipr_str = get_ipr_str(html).ok_or(PlayerResponseError::NoInitialPlayerResponse)?;

        // Parse the JSON
        serde_json::from_str(ipr_str).map_err(PlayerResponseError::ParseInitialPlayerResponse)
    }

    pub fn is_live_now(&self) -> bool {
        self.playability_status.status == Status::Ok
            && self
                .microformat
                .as_ref()
                .and_then(|mf| {
                    mf.player_microformat_renderer
                        .live_broadcast_details
                        .as_ref()
                })
                .map(|lbd| lbd.is_live_now)
                .unwrap_or_else(|| {
                    self.video_details
                        .as_ref()
                        .map(|vd| vd.is_live)
                        .unwrap_or(false)
                })
    }

    /// Scheduled start of an offline stream, when the page carries an
    /// offline slate.
    pub fn scheduled_start(&self) -> Option<DateTime<Utc>> {
        Some(
            self.playability_status
                .live_streamability
                .as_ref()?
                .live_streamability_renderer
                .offline_slate
                .as_ref()?
                .live_stream_offline_slate_renderer
                .scheduled_start_time,
        )
    }

    pub fn hls_manifest_url(&self) -> Result<&str, PlayerResponseError> {
        self.streaming_data
            .as_ref()
            .and_then(|sd| sd.hls_manifest_url.as_deref())
            .ok_or(PlayerResponseError::NoHlsManifestUrl)
    }
}
