use crate::log::LogLevel;
use crate::mail::{MailSettings, EMAILJS_ENDPOINT};

const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";
const DEFAULT_REVEAL_STAGGER_MS: u32 = 100;
const DEFAULT_NAV_ACTIVATION_OFFSET_PX: u32 = 200;
const DEFAULT_NAV_HEIGHT_PX: u32 = 70;
const DEFAULT_NAV_SOLID_AFTER_PX: u32 = 100;

const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);
const REVEAL_STAGGER_MS_BOUNDS: (u32, u32) = (0, 2_000);
const NAV_ACTIVATION_OFFSET_PX_BOUNDS: (u32, u32) = (0, 2_000);
const NAV_HEIGHT_PX_BOUNDS: (u32, u32) = (0, 400);
const NAV_SOLID_AFTER_PX_BOUNDS: (u32, u32) = (0, 2_000);

/// Keys read by [`PageConfig::from_build_env`]. Values are captured when the
/// wasm bundle is compiled, so changing them needs a rebuild.
const BUILD_KEYS: [&str; 12] = [
    "PORTFOLIO_LOG_LEVEL",
    "PORTFOLIO_REVEAL_THRESHOLD",
    "PORTFOLIO_REVEAL_ROOT_MARGIN",
    "PORTFOLIO_REVEAL_STAGGER_MS",
    "PORTFOLIO_NAV_ACTIVATION_OFFSET_PX",
    "PORTFOLIO_NAV_HEIGHT_PX",
    "PORTFOLIO_NAV_SOLID_AFTER_PX",
    "PORTFOLIO_MAIL_ENDPOINT",
    "PORTFOLIO_MAIL_SERVICE_ID",
    "PORTFOLIO_MAIL_TEMPLATE_ID",
    "PORTFOLIO_MAIL_PUBLIC_KEY",
    "PORTFOLIO_MAIL_TO",
];

#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub log_level: LogLevel,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_stagger_ms: u32,
    pub nav_activation_offset_px: f64,
    pub nav_height_px: f64,
    pub nav_solid_after_px: f64,
    pub mail: Option<MailSettings>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl PageConfig {
    pub fn from_build_env() -> Self {
        Self::from_lookup(build_env_value)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = non_empty("PORTFOLIO_LOG_LEVEL")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);
        let reveal_threshold = parse_f64_with_bounds(
            non_empty("PORTFOLIO_REVEAL_THRESHOLD"),
            DEFAULT_REVEAL_THRESHOLD,
            REVEAL_THRESHOLD_BOUNDS,
        );
        let reveal_root_margin = non_empty("PORTFOLIO_REVEAL_ROOT_MARGIN")
            .unwrap_or_else(|| DEFAULT_REVEAL_ROOT_MARGIN.to_string());
        let reveal_stagger_ms = parse_u32_with_bounds(
            non_empty("PORTFOLIO_REVEAL_STAGGER_MS"),
            DEFAULT_REVEAL_STAGGER_MS,
            REVEAL_STAGGER_MS_BOUNDS,
        );
        let nav_activation_offset_px = parse_u32_with_bounds(
            non_empty("PORTFOLIO_NAV_ACTIVATION_OFFSET_PX"),
            DEFAULT_NAV_ACTIVATION_OFFSET_PX,
            NAV_ACTIVATION_OFFSET_PX_BOUNDS,
        );
        let nav_height_px = parse_u32_with_bounds(
            non_empty("PORTFOLIO_NAV_HEIGHT_PX"),
            DEFAULT_NAV_HEIGHT_PX,
            NAV_HEIGHT_PX_BOUNDS,
        );
        let nav_solid_after_px = parse_u32_with_bounds(
            non_empty("PORTFOLIO_NAV_SOLID_AFTER_PX"),
            DEFAULT_NAV_SOLID_AFTER_PX,
            NAV_SOLID_AFTER_PX_BOUNDS,
        );

        let endpoint = non_empty("PORTFOLIO_MAIL_ENDPOINT")
            .filter(|value| is_http_url(value))
            .unwrap_or_else(|| EMAILJS_ENDPOINT.to_string());
        let mail = match (
            non_empty("PORTFOLIO_MAIL_SERVICE_ID"),
            non_empty("PORTFOLIO_MAIL_TEMPLATE_ID"),
            non_empty("PORTFOLIO_MAIL_PUBLIC_KEY"),
            non_empty("PORTFOLIO_MAIL_TO"),
        ) {
            (Some(service_id), Some(template_id), Some(public_key), Some(recipient)) => {
                Some(MailSettings {
                    endpoint,
                    service_id,
                    template_id,
                    public_key,
                    recipient,
                })
            }
            _ => None,
        };

        Self {
            log_level,
            reveal_threshold,
            reveal_root_margin,
            reveal_stagger_ms,
            nav_activation_offset_px: f64::from(nav_activation_offset_px),
            nav_height_px: f64::from(nav_height_px),
            nav_solid_after_px: f64::from(nav_solid_after_px),
            mail,
        }
    }

    /// Recipient placed in `to_email`; empty when mail is unconfigured.
    pub fn mail_recipient(&self) -> &str {
        self.mail
            .as_ref()
            .map(|settings| settings.recipient.as_str())
            .unwrap_or_default()
    }

    /// Names of the build keys that were set, for the startup log line.
    pub fn configured_keys(lookup: impl Fn(&str) -> Option<String>) -> Vec<&'static str> {
        BUILD_KEYS
            .iter()
            .copied()
            .filter(|key| lookup(key).is_some())
            .collect()
    }
}

pub fn build_env_value(name: &str) -> Option<String> {
    let value = match name {
        "PORTFOLIO_LOG_LEVEL" => option_env!("PORTFOLIO_LOG_LEVEL"),
        "PORTFOLIO_REVEAL_THRESHOLD" => option_env!("PORTFOLIO_REVEAL_THRESHOLD"),
        "PORTFOLIO_REVEAL_ROOT_MARGIN" => option_env!("PORTFOLIO_REVEAL_ROOT_MARGIN"),
        "PORTFOLIO_REVEAL_STAGGER_MS" => option_env!("PORTFOLIO_REVEAL_STAGGER_MS"),
        "PORTFOLIO_NAV_ACTIVATION_OFFSET_PX" => option_env!("PORTFOLIO_NAV_ACTIVATION_OFFSET_PX"),
        "PORTFOLIO_NAV_HEIGHT_PX" => option_env!("PORTFOLIO_NAV_HEIGHT_PX"),
        "PORTFOLIO_NAV_SOLID_AFTER_PX" => option_env!("PORTFOLIO_NAV_SOLID_AFTER_PX"),
        "PORTFOLIO_MAIL_ENDPOINT" => option_env!("PORTFOLIO_MAIL_ENDPOINT"),
        "PORTFOLIO_MAIL_SERVICE_ID" => option_env!("PORTFOLIO_MAIL_SERVICE_ID"),
        "PORTFOLIO_MAIL_TEMPLATE_ID" => option_env!("PORTFOLIO_MAIL_TEMPLATE_ID"),
        "PORTFOLIO_MAIL_PUBLIC_KEY" => option_env!("PORTFOLIO_MAIL_PUBLIC_KEY"),
        "PORTFOLIO_MAIL_TO" => option_env!("PORTFOLIO_MAIL_TO"),
        _ => None,
    };

    value.map(str::to_string)
}

fn parse_u32_with_bounds(value: Option<String>, default: u32, bounds: (u32, u32)) -> u32 {
    value
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_f64_with_bounds(value: Option<String>, default: f64, bounds: (f64, f64)) -> f64 {
    value
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| values.get(name).cloned()
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = PageConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.reveal_threshold, 0.1);
        assert_eq!(config.reveal_root_margin, "0px 0px -100px 0px");
        assert_eq!(config.reveal_stagger_ms, 100);
        assert_eq!(config.nav_activation_offset_px, 200.0);
        assert_eq!(config.nav_height_px, 70.0);
        assert_eq!(config.nav_solid_after_px, 100.0);
        assert!(config.mail.is_none());
        assert_eq!(config.mail_recipient(), "");
    }

    #[test]
    fn out_of_range_and_malformed_values_fall_back() {
        let config = PageConfig::from_lookup(lookup_from(&[
            ("PORTFOLIO_REVEAL_THRESHOLD", "1.5"),
            ("PORTFOLIO_REVEAL_STAGGER_MS", "soon"),
            ("PORTFOLIO_NAV_HEIGHT_PX", "9000"),
            ("PORTFOLIO_LOG_LEVEL", "verbose"),
            ("PORTFOLIO_REVEAL_ROOT_MARGIN", "   "),
        ]));

        assert_eq!(config.reveal_threshold, 0.1);
        assert_eq!(config.reveal_stagger_ms, 100);
        assert_eq!(config.nav_height_px, 70.0);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.reveal_root_margin, "0px 0px -100px 0px");
    }

    #[test]
    fn in_range_values_are_used() {
        let config = PageConfig::from_lookup(lookup_from(&[
            ("PORTFOLIO_REVEAL_THRESHOLD", " 0.25 "),
            ("PORTFOLIO_REVEAL_STAGGER_MS", "0"),
            ("PORTFOLIO_NAV_ACTIVATION_OFFSET_PX", "150"),
            ("PORTFOLIO_LOG_LEVEL", "DEBUG"),
        ]));

        assert_eq!(config.reveal_threshold, 0.25);
        assert_eq!(config.reveal_stagger_ms, 0);
        assert_eq!(config.nav_activation_offset_px, 150.0);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn mail_requires_every_identifier() {
        let partial = PageConfig::from_lookup(lookup_from(&[
            ("PORTFOLIO_MAIL_SERVICE_ID", "service_x"),
            ("PORTFOLIO_MAIL_TEMPLATE_ID", "template_y"),
            ("PORTFOLIO_MAIL_PUBLIC_KEY", "pk"),
        ]));
        assert!(partial.mail.is_none());

        let complete = PageConfig::from_lookup(lookup_from(&[
            ("PORTFOLIO_MAIL_SERVICE_ID", "service_x"),
            ("PORTFOLIO_MAIL_TEMPLATE_ID", "template_y"),
            ("PORTFOLIO_MAIL_PUBLIC_KEY", "pk"),
            ("PORTFOLIO_MAIL_TO", "owner@example.com"),
            ("PORTFOLIO_MAIL_ENDPOINT", "ftp://mail.example.com"),
        ]));
        let settings = complete.mail.as_ref().expect("mail should be configured");
        assert_eq!(settings.endpoint, EMAILJS_ENDPOINT);
        assert_eq!(settings.service_id, "service_x");
        assert_eq!(complete.mail_recipient(), "owner@example.com");
    }

    #[test]
    fn configured_keys_lists_only_present_keys() {
        let keys = PageConfig::configured_keys(lookup_from(&[
            ("PORTFOLIO_MAIL_TO", "owner@example.com"),
            ("UNRELATED", "x"),
        ]));

        assert_eq!(keys, vec!["PORTFOLIO_MAIL_TO"]);
    }
}
