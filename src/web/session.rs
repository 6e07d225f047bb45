// file: src/web/session.rs
// description: per-session display preferences kept in cookies
// reference: https://docs.rs/tower-cookies

use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

pub const SHOW_SETTINGS_COOKIE: &str = "show_search_settings";
pub const SINGLE_LINE_COOKIE: &str = "single_line_mode";

const COOKIE_MAX_AGE_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub show_search_settings: bool,
    pub single_line: bool,
}

/// Partial update posted by the settings toggles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub show_search_settings: Option<bool>,
    pub single_line: Option<bool>,
}

impl DisplaySettings {
    pub fn from_cookies(cookies: &Cookies) -> Self {
        Self {
            show_search_settings: read_flag(cookies, SHOW_SETTINGS_COOKIE),
            single_line: read_flag(cookies, SINGLE_LINE_COOKIE),
        }
    }

    pub fn apply(self, update: &SettingsUpdate) -> Self {
        Self {
            show_search_settings: update
                .show_search_settings
                .unwrap_or(self.show_search_settings),
            single_line: update.single_line.unwrap_or(self.single_line),
        }
    }

    pub fn store(&self, cookies: &Cookies) {
        cookies.add(flag_cookie(SHOW_SETTINGS_COOKIE, self.show_search_settings));
        cookies.add(flag_cookie(SINGLE_LINE_COOKIE, self.single_line));
    }
}

fn read_flag(cookies: &Cookies, name: &str) -> bool {
    cookies
        .get(name)
        .map(|c| matches!(c.value(), "1" | "true"))
        .unwrap_or(false)
}

fn flag_cookie(name: &'static str, value: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, if value { "1" } else { "0" });
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_max_age(Duration::days(COOKIE_MAX_AGE_DAYS));
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_partial_update() {
        let settings = DisplaySettings {
            show_search_settings: true,
            single_line: false,
        };
        let update = SettingsUpdate {
            single_line: Some(true),
            ..Default::default()
        };

        assert_eq!(
            settings.apply(&update),
            DisplaySettings {
                show_search_settings: true,
                single_line: true,
            }
        );
    }
}
