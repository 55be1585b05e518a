pub mod i18n;
pub mod subscription;
pub mod time;
