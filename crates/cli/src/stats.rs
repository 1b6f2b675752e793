//! `textstat stats` -- offline metrics for a file or stdin.

use std::io::Read;
use std::path::Path;
use std::process;

use textstat_core::TextMetrics;

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_stats(file: Option<&Path>, output: OutputFormat, quiet: bool) {
    let text = match read_input(file) {
        Ok(text) => text,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let metrics = TextMetrics::compute(&text);
    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&metrics)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization error: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", render_text(&metrics)),
    }
}

fn read_input(file: Option<&Path>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("error reading file '{}': {}", path.display(), e)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("error reading stdin: {}", e))?;
            Ok(text)
        }
    }
}

fn render_text(metrics: &TextMetrics) -> String {
    format!(
        "words:      {}\ncharacters: {}\nsentences:  {}\nparagraphs: {}\nlongest:    {}\n",
        metrics.number_of_words,
        metrics.number_of_characters,
        metrics.number_of_sentences,
        metrics.number_of_paragraphs,
        metrics.longest_words_in_paragraphs.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rendering_lists_every_metric() {
        let rendered = render_text(&TextMetrics::compute("One two.\n\nThree fourteen."));
        assert!(rendered.contains("words:      4"));
        assert!(rendered.contains("sentences:  2"));
        assert!(rendered.contains("paragraphs: 2"));
        assert!(rendered.contains("longest:    one, fourteen"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_input(Some(Path::new("/nonexistent/textstat/input.txt"))).unwrap_err();
        assert!(err.contains("error reading file"));
    }
}
