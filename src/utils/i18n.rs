use tracing::info;

/// Switch the process-wide locale used for labels, notes and placeholders
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
    info!("Locale set to {locale}");
}
