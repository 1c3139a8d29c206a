use crate::lookup::LookupReport;
use crate::theme::Theme;

/// Synonym/antonym lists are cut off after this many entries.
const RELATED_WORD_LIMIT: usize = 10;

struct Palette {
    heading: &'static str,
    accent: &'static str,
    dim: &'static str,
    reset: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            // Regular ANSI colours read better on light backgrounds,
            // bright variants on dark ones.
            Theme::Light => Palette {
                heading: "\x1b[1;34m",
                accent: "\x1b[35m",
                dim: "\x1b[2m",
                reset: "\x1b[0m",
            },
            Theme::Dark => Palette {
                heading: "\x1b[1;94m",
                accent: "\x1b[95m",
                dim: "\x1b[90m",
                reset: "\x1b[0m",
            },
        }
    }
}

/// Render one lookup as the two-pane report: definition card first, image
/// gallery second.
pub fn format_report(report: &LookupReport, theme: Theme) -> String {
    let palette = Palette::for_theme(theme);
    let entry = &report.entry;
    let mut output = String::new();

    output.push_str(&format!("{}{}{}", palette.heading, entry.word, palette.reset));
    if let Some(text) = entry.first_phonetic_text()
        && !text.is_empty()
    {
        output.push_str(&format!("  {}{text}{}", palette.accent, palette.reset));
    }
    let total = entry.total_definition_count();
    if total > 0 {
        output.push_str(&format!(
            "  {}[{total} definition{}]{}",
            palette.dim,
            if total == 1 { "" } else { "s" },
            palette.reset
        ));
    }
    output.push('\n');

    if let Some(audio) = entry.first_audio() {
        output.push_str(&format!("Audio: {audio}\n"));
    }

    for meaning in &entry.meanings {
        output.push('\n');
        if let Some(pos) = &meaning.part_of_speech {
            output.push_str(&format!("{}{pos}{}\n", palette.accent, palette.reset));
        }
        for (i, definition) in meaning.definitions.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, definition.definition));
            if let Some(example) = &definition.example {
                output.push_str(&format!(
                    "     {}\u{201c}{example}\u{201d}{}\n",
                    palette.dim, palette.reset
                ));
            }
            if !definition.synonyms.is_empty() {
                output.push_str(&format!(
                    "     Synonyms: {}\n",
                    truncate_list(&definition.synonyms)
                ));
            }
            if !definition.antonyms.is_empty() {
                output.push_str(&format!(
                    "     Antonyms: {}\n",
                    truncate_list(&definition.antonyms)
                ));
            }
        }
    }

    if !entry.source_urls.is_empty() {
        output.push_str("\nSources:\n");
        for url in &entry.source_urls {
            output.push_str(&format!("  - {url}\n"));
        }
    }
    if let Some(name) = entry.license.as_ref().and_then(|l| l.name.as_deref()) {
        output.push_str(&format!("License: {name}\n"));
    }

    output.push_str("\nImages\n");
    if report.images.is_empty() {
        output.push_str(&format!(
            "  {}No images for this word.{}\n",
            palette.dim, palette.reset
        ));
    } else {
        for image in &report.images {
            output.push_str(&format!("  {}\n", image.url));
        }
    }
    if report.images_failed {
        output.push_str("  Some images failed to load.\n");
    }

    output
}

fn truncate_list(words: &[String]) -> String {
    let shown = words
        .iter()
        .take(RELATED_WORD_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if words.len() > RELATED_WORD_LIMIT {
        format!("{shown} \u{2026}")
    } else {
        shown
    }
}
