use regex::Regex;

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("no .m3u8 manifest URL found in page")]
    NoManifestUrl,
    #[error("invalid candidate pattern: {0}")]
    BadPattern(#[from] regex::Error),
    #[error("could not parse manifest URL: {0}")]
    BadUrl(#[from] url::ParseError),
}

// Pages embed manifest URLs bare, double-quoted or single-quoted, often
// with JSON-escaped slashes.
const CANDIDATE_PATTERNS: &[&str] = &[
    r#"(?i)https?://[^\s"'<>]+\.m3u8[^\s"'<>]*"#,
    r#"(?i)"(https?://[^"]+\.m3u8[^"]*)""#,
    r#"(?i)'(https?://[^']+\.m3u8[^']*)'"#,
];

/// Collects every `.m3u8` URL candidate in the page body, de-duplicated
/// in first-seen order.
pub fn find_candidates(body: &str) -> Result<Vec<String>, ExtractError> {
    let trailing = Regex::new(r#"["',;)\]}]+$"#)?;
    let mut candidates: Vec<String> = Vec::new();

    // Unescape JSON-escaped slashes up front so the URL patterns can match
    let body = body.replace(r"\/", "/");

    for pattern in CANDIDATE_PATTERNS {
        let re = Regex::new(pattern)?;
        for caps in re.captures_iter(&body) {
            let raw = caps
                .get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str())
                .unwrap_or_default();
            let url = trailing.replace(raw, "").into_owned();
            if !candidates.contains(&url) {
                candidates.push(url);
            }
        }
    }

    Ok(candidates)
}

/// Picks the manifest URL from a page body: the first candidate matching
/// `preferred_domain` when one is given, otherwise the first candidate.
/// No candidate at all is an error.
pub fn select_manifest_url(
    body: &str,
    preferred_domain: Option<&str>,
) -> Result<String, ExtractError> {
    let candidates = find_candidates(body)?;

    if let Some(domain) = preferred_domain {
        if let Some(url) = candidates.iter().find(|u| u.contains(domain)) {
            return Ok(url.clone());
        }
    }

    candidates
        .into_iter()
        .next()
        .ok_or(ExtractError::NoManifestUrl)
}

/// Drops the query string and fragment from a URL.
pub fn strip_url_parameters(raw: &str) -> Result<String, ExtractError> {
    let mut url = url::Url::parse(raw)?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.into())
}
