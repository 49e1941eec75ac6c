//! Ordered token-to-value replacement mapping.

/// An insertion-ordered mapping of literal placeholder tokens to their
/// replacement values.
///
/// Order matters: replacements are applied key by key in insertion order,
/// each key applied to the current (possibly already-modified) text. A
/// single pass is made per key; the result is not iterated to a fixpoint.
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, or update its value if already present. New tokens
    /// are applied after all previously inserted ones.
    pub fn set(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        let value = value.into();
        if let Some(pair) = self.pairs.iter_mut().find(|(t, _)| *t == token) {
            pair.1 = value;
        } else {
            self.pairs.push((token, value));
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(token, value);
        self
    }

    /// Number of tokens in the mapping.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the mapping holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Replace every occurrence of every token in `text`.
    ///
    /// Text containing none of the tokens comes back unchanged.
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for (token, value) in &self.pairs {
            if current.contains(token.as_str()) {
                current = current.replace(token.as_str(), value);
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_in_insertion_order() {
        let reps = Replacements::new()
            .with("<#>", "12")
            .with("#", "12");

        // "<#>" is consumed first, so the bare "#" pass finds nothing left.
        assert_eq!(reps.apply("Responses: <#>"), "Responses: 12");
        assert_eq!(reps.apply("# of 10"), "12 of 10");
    }

    #[test]
    fn identity_on_text_without_tokens() {
        let reps = Replacements::new().with("<SOLUTION>", "Alpha");
        assert_eq!(reps.apply("no placeholders here"), "no placeholders here");
    }

    #[test]
    fn replaces_every_occurrence() {
        let reps = Replacements::new().with("<Key>", "45");
        assert_eq!(reps.apply("<Key> and <Key>"), "45 and 45");
    }

    #[test]
    fn set_updates_existing_token_in_place() {
        let mut reps = Replacements::new();
        reps.set("<Release>", "v1");
        reps.set("<Release>", "v2");
        assert_eq!(reps.len(), 1);
        assert_eq!(reps.apply("<Release>"), "v2");
    }
}
