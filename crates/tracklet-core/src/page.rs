//! Hosting page environment and activation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackletError};

/// Query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "api_key";

/// What the host knows about the page the collector runs in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvironment {
    /// Full page URL, query string included.
    pub url: String,
    pub user_agent: String,
    pub screen_width: u32,
    pub screen_height: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl PageEnvironment {
    /// API key from the page URL. Absent or empty keys refuse activation.
    pub fn api_key(&self) -> Result<String> {
        query_param(&self.url, API_KEY_PARAM)
            .filter(|k| !k.is_empty())
            .ok_or(TrackletError::MissingApiKey)
    }
}

/// First value of `name` in the query string of `url`, percent-decoded.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let query = url.split_once('?').map(|(_, q)| q)?;
    let query = query.split_once('#').map_or(query, |(q, _)| q);

    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if decode(k) == name {
            Some(decode(v))
        } else {
            None
        }
    })
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    match urlencoding::decode(&s) {
        Ok(v) => v.into_owned(),
        Err(_) => s,
    }
}
