//! Recognition of generator and effect kinds.
//!
//! The engines never hardcode a host's plugin naming scheme; they ask an
//! injected [`Classifier`] whether a clip's generator produces text and
//! whether an effect is a picture-in-picture or a tracking source. The
//! shipped [`NameClassifier`] replicates the identifiers observed in the
//! field; hosts with different naming plug in their own.

use crate::project::{Effect, Generator};

/// Opaque boolean oracle over generator and effect identity.
pub trait Classifier {
    /// Whether a clip's generator produces text media (titles, captions).
    fn is_text_generator(&self, generator: &Generator) -> bool;

    /// Whether an effect is a recognized picture-in-picture effect.
    fn is_pip_effect(&self, effect: &Effect) -> bool;

    /// Whether an effect is a recognized planar-tracking source.
    fn is_tracking_source(&self, effect: &Effect) -> bool;
}

/// Case-insensitive UID/name substring matching against known identifiers.
#[derive(Debug, Clone)]
pub struct NameClassifier {
    /// Exact (case-insensitive) picture-in-picture plugin UIDs.
    pub pip_uids: Vec<String>,
    /// Name fragments identifying a picture-in-picture effect.
    pub pip_name_fragments: Vec<String>,
    /// UID/name fragments identifying a tracking source.
    pub tracking_fragments: Vec<String>,
    /// Name fragments identifying a text generator.
    pub text_generator_fragments: Vec<String>,
}

impl Default for NameClassifier {
    fn default() -> Self {
        Self {
            pip_uids: vec![
                "{Svfx:com.vegascreativesoftware:pictureinpicture}".to_string(),
                "{Svfx:com.sonycreativesoftware:pictureinpicture}".to_string(),
            ],
            pip_name_fragments: vec!["Picture in Picture".to_string()],
            tracking_fragments: vec!["mocha".to_string()],
            text_generator_fragments: vec![
                "Titles & Text".to_string(),
                "titlesandtext".to_string(),
                "Text".to_string(),
            ],
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Classifier for NameClassifier {
    fn is_text_generator(&self, generator: &Generator) -> bool {
        self.text_generator_fragments.iter().any(|frag| {
            contains_ignore_case(&generator.plugin_name, frag)
                || contains_ignore_case(&generator.plugin_uid, frag)
        })
    }

    fn is_pip_effect(&self, effect: &Effect) -> bool {
        self.pip_uids
            .iter()
            .any(|uid| effect.plugin_uid.eq_ignore_ascii_case(uid))
            || self
                .pip_name_fragments
                .iter()
                .any(|frag| contains_ignore_case(&effect.plugin_name, frag))
    }

    fn is_tracking_source(&self, effect: &Effect) -> bool {
        self.tracking_fragments.iter().any(|frag| {
            contains_ignore_case(&effect.plugin_uid, frag)
                || contains_ignore_case(&effect.plugin_name, frag)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(uid: &str, name: &str) -> Effect {
        Effect {
            plugin_uid: uid.to_string(),
            plugin_name: name.to_string(),
            params: vec![],
        }
    }

    fn generator(uid: &str, name: &str) -> Generator {
        Generator {
            plugin_uid: uid.to_string(),
            plugin_name: name.to_string(),
            params: vec![],
        }
    }

    #[test]
    fn test_pip_by_uid_any_case() {
        let c = NameClassifier::default();
        assert!(c.is_pip_effect(&effect(
            "{SVFX:COM.VEGASCREATIVESOFTWARE:PICTUREINPICTURE}",
            "whatever"
        )));
    }

    #[test]
    fn test_pip_by_name_fragment() {
        let c = NameClassifier::default();
        assert!(c.is_pip_effect(&effect("{unknown}", "VEGAS Picture In Picture")));
        assert!(!c.is_pip_effect(&effect("{unknown}", "Gaussian Blur")));
    }

    #[test]
    fn test_tracking_source_by_uid_or_name() {
        let c = NameClassifier::default();
        assert!(c.is_tracking_source(&effect("{Svfx:mocha.pro}", "anything")));
        assert!(c.is_tracking_source(&effect("{x}", "Mocha VEGAS")));
        assert!(!c.is_tracking_source(&effect("{x}", "Lens Flare")));
    }

    #[test]
    fn test_text_generator_fragments() {
        let c = NameClassifier::default();
        assert!(c.is_text_generator(&generator("{g}", "VEGAS Titles & Text")));
        assert!(c.is_text_generator(&generator("{com.host:titlesandtext}", "")));
        assert!(!c.is_text_generator(&generator("{g}", "Solid Color")));
    }
}
