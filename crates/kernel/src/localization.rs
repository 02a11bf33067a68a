//! Key → display text lookup backed by bundled JSON documents.

use std::collections::BTreeMap;

use anyhow::Context;

/// A named set of translations, one JSON object per culture.
pub struct LocalizationResource {
    pub name: &'static str,
    pub default_culture: &'static str,
    pub cultures: &'static [(&'static str, &'static str)],
}

impl LocalizationResource {
    /// Builds a localizer for `culture`, falling back to the default culture
    /// when no translation is bundled for it.
    pub fn localizer(&self, culture: &str) -> anyhow::Result<Localizer> {
        let (culture, json) = match self.cultures.iter().find(|(c, _)| *c == culture) {
            Some(entry) => *entry,
            None => {
                tracing::warn!(
                    resource = self.name,
                    requested = culture,
                    fallback = self.default_culture,
                    "culture not available, using default"
                );
                self.cultures
                    .iter()
                    .find(|(c, _)| *c == self.default_culture)
                    .copied()
                    .with_context(|| {
                        format!("resource '{}' has no default culture", self.name)
                    })?
            }
        };

        Localizer::from_json(culture, json)
            .with_context(|| format!("invalid '{culture}' texts for resource '{}'", self.name))
    }
}

#[derive(Debug, Clone)]
pub struct Localizer {
    culture: String,
    texts: BTreeMap<String, String>,
}

impl Localizer {
    pub fn from_json(culture: &str, json: &str) -> anyhow::Result<Self> {
        let texts: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self {
            culture: culture.to_string(),
            texts,
        })
    }

    pub fn culture(&self) -> &str {
        &self.culture
    }

    /// Returns the text for `key`, or the key itself when untranslated.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.texts.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn texts(&self) -> &BTreeMap<String, String> {
        &self.texts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCE: LocalizationResource = LocalizationResource {
        name: "Test",
        default_culture: "en",
        cultures: &[
            ("en", r#"{"Title": "Title"}"#),
            ("tr", r#"{"Title": "Başlık"}"#),
        ],
    };

    #[test]
    fn picks_requested_culture() {
        let l = RESOURCE.localizer("tr").unwrap();
        assert_eq!(l.culture(), "tr");
        assert_eq!(l.get("Title"), "Başlık");
    }

    #[test]
    fn unknown_culture_falls_back_to_default() {
        let l = RESOURCE.localizer("fr").unwrap();
        assert_eq!(l.culture(), "en");
        assert_eq!(l.get("Title"), "Title");
    }

    #[test]
    fn missing_key_returns_key() {
        let l = RESOURCE.localizer("en").unwrap();
        assert_eq!(l.get("Year"), "Year");
    }

    #[test]
    fn malformed_texts_are_an_error() {
        let broken = LocalizationResource {
            name: "Broken",
            default_culture: "en",
            cultures: &[("en", "[1, 2]")],
        };
        assert!(broken.localizer("en").is_err());
    }
}
