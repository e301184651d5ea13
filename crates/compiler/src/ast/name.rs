use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An identifier of the root node.
///
/// Names are stored in camelCase, whatever casing the IDL used, and can be
/// converted to the casing each target language expects.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    pub value: String,
}

impl Name {
    pub fn new<S: AsRef<str>>(raw: S) -> Self {
        let value = words(raw.as_ref())
            .iter()
            .enumerate()
            .map(|(index, word)| {
                if index == 0 {
                    word.to_lowercase()
                } else {
                    capitalize(word)
                }
            })
            .collect();

        Name { value }
    }

    pub fn camel(&self) -> String {
        self.value.clone()
    }

    pub fn pascal(&self) -> String {
        words(&self.value).iter().map(|word| capitalize(word)).collect()
    }

    pub fn snake(&self) -> String {
        words(&self.value)
            .iter()
            .map(|word| word.to_lowercase())
            .join("_")
    }

    pub fn screaming(&self) -> String {
        words(&self.value)
            .iter()
            .map(|word| word.to_uppercase())
            .join("_")
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

fn capitalize(word: &str) -> String {
    let mut c = word.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + &c.as_str().to_lowercase(),
    }
}

/// Split an identifier into its words.
///
/// Any non-alphanumeric character separates words, as does a lowercase letter
/// or digit followed by an uppercase letter. A run of capitals is kept together
/// until its last letter starts a new capitalized word (`HTTPServer`).
fn words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = vec![];
    let mut current = String::new();
    for (index, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let previous = chars[index - 1];
            let next_is_lower = chars
                .get(index + 1)
                .is_some_and(|next| next.is_lowercase());
            if previous.is_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::Name;

    #[test]
    fn snake_case_input_is_stored_as_camel_case() {
        let name = Name::new("tape_set_header");
        assert_eq!(name.camel(), "tapeSetHeader");
        assert_eq!(name.pascal(), "TapeSetHeader");
        assert_eq!(name.snake(), "tape_set_header");
        assert_eq!(name.screaming(), "TAPE_SET_HEADER");
    }

    #[test]
    fn pascal_case_input() {
        let name = Name::new("ProofPath");
        assert_eq!(name.camel(), "proofPath");
        assert_eq!(name.snake(), "proof_path");
    }

    #[test]
    fn acronyms_and_digits() {
        assert_eq!(Name::new("HTTPServer").camel(), "httpServer");
        assert_eq!(Name::new("u64Value").snake(), "u64_value");
        assert_eq!(Name::new("merkle_root_v2").pascal(), "MerkleRootV2");
    }

    #[test]
    fn conversions_are_stable() {
        let name = Name::new("lastProofAt");
        assert_eq!(Name::new(name.snake()), name);
        assert_eq!(Name::new(name.pascal()), name);
    }
}
