//! Site-level settings recorded by the archiver.
//!
//! The settings table is a small key/value set with a closed key space:
//! `https`, `non-www`, and `domain`. Values follow the archiver's loose
//! convention where anything non-empty other than "0" means enabled.

use super::connection::StructureDb;
use crate::Error;

/// Typed view over the settings table.
#[derive(Debug, Clone, Default)]
pub struct SiteSettings {
    /// Redirect plain-HTTP requests to HTTPS.
    pub force_https: bool,
    /// Redirect `www.` hosts to the bare domain.
    pub strip_www: bool,
    /// Canonical archive-time domain used to key structure lookups.
    pub original_domain: Option<String>,
}

fn truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

impl StructureDb {
    /// Read the settings table into a typed view.
    ///
    /// Unknown keys are ignored so newer exports stay loadable.
    pub async fn site_settings(&self) -> Result<SiteSettings, Error> {
        self.conn
            .call(|conn| -> Result<SiteSettings, Error> {
                let mut stmt = conn.prepare("SELECT param, value FROM settings")?;
                let mut rows = stmt.query([])?;

                let mut settings = SiteSettings::default();
                while let Some(row) = rows.next()? {
                    let param: String = row.get(0)?;
                    let value: String = row.get(1)?;
                    match param.as_str() {
                        "https" => settings.force_https = truthy(&value),
                        "non-www" => settings.strip_www = truthy(&value),
                        "domain" if !value.is_empty() => settings.original_domain = Some(value),
                        _ => {}
                    }
                }

                Ok(settings)
            })
            .await
            .map_err(Error::from)
    }
}
