//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions and color detection for the text output
//! format. JSON output never goes through this module.

use opsimnav_lib::ComplianceRating;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bright bold white for headings and ship class names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for labels and units.
    pub const GRAY: &str = "\x1b[90m";

    // Rating badges (bold reverse video)
    /// Rating A.
    pub const TAG_A: &str = "\x1b[1;7;32m";
    /// Rating B.
    pub const TAG_B: &str = "\x1b[1;7;36m";
    /// Rating C.
    pub const TAG_C: &str = "\x1b[1;7;33m";
    /// Rating D.
    pub const TAG_D: &str = "\x1b[1;7;31m";

    /// Green for a successful round-trip check.
    pub const GREEN: &str = "\x1b[32m";
    /// Red for a failed round-trip check.
    pub const RED: &str = "\x1b[31m";
}

/// A collection of resolved color codes, either actual ANSI sequences
/// or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub tag_a: &'static str,
    pub tag_b: &'static str,
    pub tag_c: &'static str,
    pub tag_d: &'static str,
    pub green: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            tag_a: colors::TAG_A,
            tag_b: colors::TAG_B,
            tag_c: colors::TAG_C,
            tag_d: colors::TAG_D,
            green: colors::GREEN,
            red: colors::RED,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            tag_a: "",
            tag_b: "",
            tag_c: "",
            tag_d: "",
            green: "",
            red: "",
        }
    }

    /// Create a palette based on terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Badge color for a compliance rating.
    #[must_use]
    pub fn rating(&self, rating: ComplianceRating) -> &'static str {
        match rating {
            ComplianceRating::A => self.tag_a,
            ComplianceRating::B => self.tag_b,
            ComplianceRating::C => self.tag_c,
            ComplianceRating::D => self.tag_d,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    /// Environment variables are process-global, so tests modifying them must not run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();
        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        result
    }

    #[test]
    fn test_color_palette_colored() {
        let p = ColorPalette::colored();
        assert!(!p.reset.is_empty());
        assert_eq!(p.rating(ComplianceRating::A), colors::TAG_A);
        assert_eq!(p.rating(ComplianceRating::D), colors::TAG_D);
    }

    #[test]
    fn test_color_palette_plain() {
        let p = ColorPalette::plain();
        assert!(p.reset.is_empty());
        for rating in ComplianceRating::ALL {
            assert!(p.rating(rating).is_empty());
        }
    }

    #[test]
    fn test_supports_color_no_color_set() {
        with_env_vars(&[("NO_COLOR", Some("1")), ("TERM", None)], || {
            assert!(!supports_color(), "NO_COLOR=1 should disable colors");
        });
    }

    #[test]
    fn test_supports_color_term_dumb() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("dumb"))], || {
            assert!(!supports_color(), "TERM=dumb should disable colors");
        });
    }

    #[test]
    fn test_supports_color_default() {
        with_env_vars(
            &[("NO_COLOR", None), ("TERM", Some("xterm-256color"))],
            || {
                assert!(supports_color(), "Normal terminal should support colors");
            },
        );
    }
}
