use serde::Deserialize;

/// One entry as returned by dictionaryapi.dev.
///
/// The upstream omits arrays and nested objects freely, so everything but
/// `word` defaults to empty/`None` instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionEntry {
    pub word: String,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub source_urls: Vec<String>,
    pub license: Option<License>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Definition {
    pub definition: String,
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct License {
    pub name: Option<String>,
}

impl DefinitionEntry {
    /// URL of the first phonetic entry carrying pronunciation audio.
    pub fn first_audio(&self) -> Option<&str> {
        self.phonetics
            .iter()
            .find_map(|p| p.audio.as_deref().filter(|a| !a.is_empty()))
    }

    /// Phonetic transcription to display: the first entry with non-empty
    /// text, else the first entry's text field regardless.
    pub fn first_phonetic_text(&self) -> Option<&str> {
        self.phonetics
            .iter()
            .find_map(|p| p.text.as_deref().filter(|t| !t.is_empty()))
            .or_else(|| self.phonetics.first().and_then(|p| p.text.as_deref()))
    }

    /// Definition count summed across all meanings.
    pub fn total_definition_count(&self) -> usize {
        self.meanings.iter().map(|m| m.definitions.len()).sum()
    }
}
