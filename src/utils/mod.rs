use anyhow::{anyhow, Result};
use regex::Regex;
use url::Url;

pub mod logging;

const HEX_COLOR_PATTERN: &str = r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$";

lazy_static::lazy_static! {
    static ref HEX_COLOR: Option<Regex> = Regex::new(HEX_COLOR_PATTERN).ok();
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR
        .as_ref()
        .map_or(false, |regex| regex.is_match(value.trim()))
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_string()
}

/// Validates the hosted backend URL.
///
/// HTTPS is required except for loopback hosts, which a locally running
/// backend serves over plain HTTP.
pub fn validate_gateway_url(gateway_url: &str) -> Result<Url> {
    if gateway_url.trim().is_empty() {
        return Err(anyhow!("Gateway URL cannot be empty."));
    }

    let parsed_url = Url::parse(gateway_url.trim()).map_err(|e| {
        anyhow!(
            "Invalid gateway URL format: {}. Expected something like https://project.example.co",
            e
        )
    })?;

    let host = parsed_url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow!("Gateway URL '{}' does not contain a valid host.", gateway_url))?;

    let is_loopback = host == "localhost" || host.starts_with("127.") || host == "[::1]";

    match parsed_url.scheme() {
        "https" => {}
        "http" if is_loopback => {
            log::warn!("Using plain HTTP for local gateway at {}", host);
        }
        scheme => {
            return Err(anyhow!(
                "Gateway URL must use HTTPS. Your URL starts with '{}://'.",
                scheme
            ));
        }
    }

    if parsed_url.path() != "/" && !parsed_url.path().is_empty() {
        log::warn!(
            "Gateway URL has a path component ({}); REST paths are appended to it",
            parsed_url.path()
        );
    }

    Ok(parsed_url)
}
