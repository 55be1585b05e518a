use tracing::warn;

/// Switch the locale used for user-facing labels, keeping the current one if unknown
pub fn set_locale(locale: &str) {
    if rust_i18n::available_locales!().iter().any(|l| *l == locale) {
        rust_i18n::set_locale(locale);
    } else {
        warn!("Locale '{}' is not available, keeping '{}'", locale, current_locale());
    }
}

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}
