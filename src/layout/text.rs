use crate::font::Font;
use crate::units::Pt;

const TABSIZE: usize = 4;

/// Wraps text into lines no wider than `max_width`, breaking only at whitespace.
///
/// Explicit newlines start a new line (blank lines are kept as empty strings),
/// runs of whitespace collapse into a single space, and tabs count as
/// [TABSIZE] spaces. A word is never split: a single word that is wider than
/// `max_width` is placed on a line of its own and allowed to overflow.
///
/// Text that is empty or only whitespace produces no lines at all.
///
/// ```
/// use stride_report::{Font, StandardFont, Pt};
/// use stride_report::layout::wrap_lines;
///
/// let font = Font::standard(StandardFont::Helvetica);
/// let lines = wrap_lines("the quick brown fox", &font, Pt(10.0), Pt(50.0));
/// assert_eq!(lines, vec!["the quick", "brown fox"]);
/// ```
pub fn wrap_lines(text: &str, font: &Font, size: Pt, max_width: Pt) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let text = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', &" ".repeat(TABSIZE));
    let space_width = font.width_of_text(" ", size);

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = Pt(0.0);

        for word in paragraph.split_whitespace() {
            let word_width = font.width_of_text(word, size);
            if line.is_empty() {
                line.push_str(word);
                line_width = word_width;
            } else if line_width + space_width + word_width <= max_width {
                line.push(' ');
                line.push_str(word);
                line_width += space_width + word_width;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_width = word_width;
            }
        }

        lines.push(line);
    }

    // trailing newlines shouldn't turn into trailing blank lines
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
}

/// Calculate the width of a given string of text given the font and font size
pub fn width_of_text(text: &str, font: &Font, size: Pt) -> Pt {
    font.width_of_text(text, size)
}

/// Shortens `text` so it fits within `max_width`, ending it with `...` when
/// anything had to be removed
pub fn truncate_to_width(text: &str, font: &Font, size: Pt, max_width: Pt) -> String {
    if font.width_of_text(text, size) <= max_width {
        return text.to_string();
    }

    const ELLIPSIS: &str = "...";
    let mut truncated = String::new();
    for ch in text.chars() {
        truncated.push(ch);
        let candidate = format!("{}{ELLIPSIS}", truncated.trim_end());
        if font.width_of_text(&candidate, size) > max_width {
            truncated.pop();
            break;
        }
    }
    format!("{}{ELLIPSIS}", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;

    fn helvetica() -> Font {
        Font::standard(StandardFont::Helvetica)
    }

    #[test]
    fn lines_never_exceed_the_width() {
        let font = helvetica();
        let text = lipsum::lipsum(120);
        let max = Pt(200.0);
        let lines = wrap_lines(&text, &font, Pt(11.0), max);
        assert!(lines.len() > 5);
        for line in lines.iter() {
            assert!(font.width_of_text(line, Pt(11.0)) <= max, "{line} is too wide");
        }
    }

    #[test]
    fn words_are_never_split() {
        let font = helvetica();
        let text = lipsum::lipsum(80);
        let lines = wrap_lines(&text, &font, Pt(11.0), Pt(120.0));
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn overlong_words_get_their_own_line() {
        let font = helvetica();
        let lines = wrap_lines(
            "a supercalifragilisticexpialidocious b",
            &font,
            Pt(10.0),
            Pt(40.0),
        );
        assert_eq!(lines, vec!["a", "supercalifragilisticexpialidocious", "b"]);
    }

    #[test]
    fn newlines_are_respected() {
        let font = helvetica();
        let lines = wrap_lines("one\r\ntwo\n\nthree\n", &font, Pt(10.0), Pt(500.0));
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn blank_text_has_no_lines() {
        assert!(wrap_lines("  \n\t ", &helvetica(), Pt(10.0), Pt(100.0)).is_empty());
    }

    #[test]
    fn truncation_adds_an_ellipsis() {
        let font = helvetica();
        let text = "An extremely long threat title that will not fit";
        let truncated = truncate_to_width(text, &font, Pt(12.0), Pt(100.0));
        assert!(truncated.ends_with("..."));
        assert!(font.width_of_text(&truncated, Pt(12.0)) <= Pt(100.0));
        assert_eq!(truncate_to_width("short", &font, Pt(12.0), Pt(100.0)), "short");
    }
}
