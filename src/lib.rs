//! BrightFlow marketing site.
//!
//! A small server-rendered, localized site: locale-prefixed routes with
//! translated slugs, per-route document metadata with hreflang/canonical
//! annotations, and a contact endpoint that relays submissions to an
//! email API after bot verification.

pub mod config;
pub mod contact;
pub mod head;
pub mod html;
pub mod i18n;
pub mod pages;
pub mod server;
