use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Serialize;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

/// One character of a word and the image that signs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignReference {
    pub character: String,
    pub image_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SignOutcome {
    Translated {
        status: &'static str,
        /// Lowercased input
        original_text: String,
        /// One list per whitespace-separated word
        sign_references: Vec<Vec<SignReference>>,
    },
    Empty {
        status: &'static str,
        message: &'static str,
    },
}

/// Character to image mapping, read once from a directory of `<char>.jpg`
/// and `<char>.png` files
#[derive(Debug, Clone, Default)]
pub struct SignLibrary {
    signs: BTreeMap<String, PathBuf>,
}

impl SignLibrary {
    /// Scan `dir`; a missing or unreadable directory gives an empty library
    pub fn load(dir: &Path) -> Self {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "sign image directory unavailable");
                return Self::default();
            }
        };

        let signs = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image(path))
            .filter_map(|path| {
                let key = path.file_stem()?.to_string_lossy().to_lowercase();
                Some((key, path))
            })
            .collect::<BTreeMap<_, _>>();

        tracing::info!(dir = %dir.display(), signs = signs.len(), "sign library loaded");

        Self { signs }
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    pub fn image_for(&self, character: char) -> Option<&Path> {
        let mut key = [0; 4];
        self.signs
            .get(&*character.encode_utf8(&mut key))
            .map(PathBuf::as_path)
    }

    /// Map every character of every word to its sign image
    pub fn translate(&self, text: &str) -> SignOutcome {
        if text.trim().is_empty() {
            return SignOutcome::Empty {
                status: "error",
                message: "No text provided",
            };
        }

        let original_text = text.to_lowercase();

        let sign_references = original_text
            .split_whitespace()
            .map(|word| word.chars().map(|c| self.reference(c)).collect())
            .collect();

        SignOutcome::Translated {
            status: "success",
            original_text,
            sign_references,
        }
    }

    fn reference(&self, character: char) -> SignReference {
        let image_path = self.image_for(character).map(Path::to_path_buf);
        let error = image_path.is_none().then_some("No sign available");

        SignReference {
            character: character.to_string(),
            image_path,
            error,
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}
