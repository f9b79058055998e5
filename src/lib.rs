//! # msu-rs
//!
//! This crate keeps live-stream manifest URLs inside an M3U playlist fresh.
//! It fetches a channel's web page, extracts the HLS manifest URL (`.m3u8`),
//! patches the matching playlist entry, and can commit and push the playlist
//! when its content changed.
//!
//! ## Usage
//!
//! The `update` module performs a single fetch-extract-patch pass; the
//! `commit` module wraps it with the git pipeline.
//!
//! ```rust,no_run
//! use msu_rs::{cli::UpdateOptions, playlist::PatchOutcome, update, util};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create HttpClient, a wrapper around reqwest::Client with a cookie
//!     // store, a browser User-Agent and a request timeout
//!     let client = util::HttpClient::new().unwrap();
//!
//!     let opts = UpdateOptions {
//!         url: "https://www.youtube.com/watch?v=...".to_string(),
//!         file: "playlist.m3u".into(),
//!         entry_name: "My Channel".to_string(),
//!         preferred_domain: None,
//!         strip_parameters: false,
//!     };
//!
//!     // Fetch the page, extract the manifest URL and patch the playlist
//!     match update::run(&client, &opts).await.unwrap() {
//!         PatchOutcome::Updated { old, new } => println!("{} -> {}", old, new),
//!         PatchOutcome::Unchanged => println!("Up to date"),
//!     }
//! }
//! ```
//!
//! The `commit` module provides a `run` function that performs the same
//! update and then stages, commits and pushes the playlist file if it
//! differs from its last committed state.

#[forbid(unsafe_code)]
#[macro_use]
extern crate log;

pub mod cli;
pub mod commit;
pub mod extract;
pub mod git;
pub mod player_response;
pub mod playlist;
pub mod update;
pub mod util;
