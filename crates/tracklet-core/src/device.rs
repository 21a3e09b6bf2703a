//! Device and browser fingerprinting from the page environment.
//!
//! User-agent matching is substring based and first match wins, so the
//! ordering of the rule tables below is part of the contract.

use serde::{Deserialize, Serialize};

use crate::page::PageEnvironment;

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetails {
    pub browser: String,
    pub os: String,
    pub screen_resolution: String,
    pub language: Option<String>,
    pub timezone: Option<String>,
}

impl DeviceDetails {
    pub fn detect(env: &PageEnvironment) -> Self {
        Self {
            browser: browser_name(&env.user_agent).to_string(),
            os: os_name(&env.user_agent).to_string(),
            screen_resolution: format!("{}x{}", env.screen_width, env.screen_height),
            language: env.language.clone(),
            timezone: env.timezone.clone(),
        }
    }
}

/// First-match-wins rules: any needle selects the name.
type Rules = &'static [(&'static [&'static str], &'static str)];

const OS_RULES: Rules = &[
    (&["windows"], "Windows"),
    (&["mac"], "MacOS"),
    (&["linux"], "Linux"),
    (&["android"], "Android"),
    (&["iphone", "ipad"], "iOS"),
];

// "Safari" only reaches its rule once "Chrome" has been ruled out.
const BROWSER_RULES: Rules = &[
    (&["Chrome"], "Chrome"),
    (&["Firefox"], "Firefox"),
    (&["Safari"], "Safari"),
    (&["Edge"], "Edge"),
    (&["Opera", "OPR"], "Opera"),
    (&["MSIE", "Trident"], "Internet Explorer"),
];

fn first_match(haystack: &str, rules: Rules) -> &'static str {
    rules
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| haystack.contains(n)))
        .map_or(UNKNOWN, |&(_, name)| name)
}

/// OS family, matched against the lower-cased user agent.
pub fn os_name(user_agent: &str) -> &'static str {
    first_match(&user_agent.to_lowercase(), OS_RULES)
}

/// Browser family, matched case-sensitively.
pub fn browser_name(user_agent: &str) -> &'static str {
    first_match(user_agent, BROWSER_RULES)
}
