use serde::Serialize;

/// Language of the Braille table
pub const BRAILLE_LANGUAGE: &str = "en";

/// Result of a Braille conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BrailleOutcome {
    Converted {
        /// Lowercased input
        original_text: String,
        braille_text: String,
        language: &'static str,
    },
    Empty {
        error: &'static str,
    },
}

impl BrailleOutcome {
    pub fn braille_text(&self) -> Option<&str> {
        match self {
            Self::Converted { braille_text, .. } => Some(braille_text),
            Self::Empty { .. } => None,
        }
    }
}

/// Convert text to Unicode Braille cells
///
/// The text is lowercased first. Characters outside the table pass through
/// unchanged.
pub fn text_to_braille(text: &str) -> BrailleOutcome {
    if text.is_empty() {
        return BrailleOutcome::Empty {
            error: "No text provided",
        };
    }

    let original_text = text.to_lowercase();
    let mut braille_text = String::with_capacity(original_text.len() * 3);

    for c in original_text.chars() {
        match cell(c) {
            Some(cells) => braille_text.push_str(cells),
            None => braille_text.push(c),
        }
    }

    BrailleOutcome::Converted {
        original_text,
        braille_text,
        language: BRAILLE_LANGUAGE,
    }
}

/// Grade-1 cells; digits reuse the a-j row shifted down, without a number sign
const fn cell(c: char) -> Option<&'static str> {
    let cells = match c {
        'a' => "⠁",
        'b' => "⠃",
        'c' => "⠉",
        'd' => "⠙",
        'e' => "⠑",
        'f' => "⠋",
        'g' => "⠛",
        'h' => "⠓",
        'i' => "⠊",
        'j' => "⠚",
        'k' => "⠅",
        'l' => "⠇",
        'm' => "⠍",
        'n' => "⠝",
        'o' => "⠕",
        'p' => "⠏",
        'q' => "⠟",
        'r' => "⠗",
        's' => "⠎",
        't' => "⠞",
        'u' => "⠥",
        'v' => "⠧",
        'w' => "⠺",
        'x' => "⠭",
        'y' => "⠽",
        'z' => "⠵",
        ' ' => "⠀",
        '.' | '4' => "⠲",
        ',' | '1' => "⠂",
        '!' | '6' => "⠖",
        '?' | '8' => "⠦",
        '\'' => "⠄",
        '"' => "⠐⠂",
        '-' => "⠤",
        '@' => "⠈⠁",
        '2' => "⠆",
        '3' => "⠒",
        '5' => "⠢",
        '7' => "⠶",
        '9' => "⠔",
        '0' => "⠴",
        _ => return None,
    };

    Some(cells)
}
