use std::fmt;

/// A single labeled answer option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub key: String,
    pub text: String,
}

/// Answer options in display order.
///
/// Keys are unique. Order is the order the options were inserted in and is
/// never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices {
    entries: Vec<Choice>,
}

impl Choices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an option. A repeated key overwrites the text in place and
    /// keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();
        match self.entries.iter_mut().find(|choice| choice.key == key) {
            Some(existing) => existing.text = text,
            None => self.entries.push(Choice { key, text }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|choice| choice.key == key)
            .map(|choice| choice.text.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Display position of `key`, if present.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|choice| choice.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|choice| choice.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Choice] {
        &self.entries
    }
}

impl<K, V> FromIterator<(K, V)> for Choices
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut choices = Choices::new();
        for (key, text) in iter {
            choices.insert(key, text);
        }
        choices
    }
}

impl<'a> IntoIterator for &'a Choices {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A normalized quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Informational page label, may be empty.
    pub page: String,
    pub text: String,
    pub choices: Choices,
    pub correct_key: String,
}

impl Question {
    /// True when the question has a prompt, a correct key and at least one
    /// choice. Only such questions survive loading.
    pub fn is_well_formed(&self) -> bool {
        !self.text.is_empty() && !self.correct_key.is_empty() && !self.choices.is_empty()
    }

    /// True when the correct key names one of the choices. A question that
    /// fails this can never be answered correctly.
    pub fn is_answerable(&self) -> bool {
        self.choices.contains_key(&self.correct_key)
    }

    pub fn correct_text(&self) -> Option<&str> {
        self.choices.get(&self.correct_key)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.key, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_keep_insertion_order() {
        let choices: Choices = [("γ", "three"), ("α", "one"), ("β", "two")]
            .into_iter()
            .collect();

        let keys: Vec<&str> = choices.keys().collect();
        assert_eq!(keys, vec!["γ", "α", "β"]);
        assert_eq!(choices.position("α"), Some(1));
    }

    #[test]
    fn repeated_key_overwrites_in_place() {
        let mut choices = Choices::new();
        choices.insert("A", "first");
        choices.insert("B", "second");
        choices.insert("A", "replaced");

        assert_eq!(choices.len(), 2);
        assert_eq!(choices.get("A"), Some("replaced"));
        assert_eq!(choices.position("A"), Some(0));
    }

    #[test]
    fn well_formed_requires_text_key_and_choices() {
        let question = Question {
            page: String::new(),
            text: "Q".to_string(),
            choices: [("A", "x")].into_iter().collect(),
            correct_key: "A".to_string(),
        };
        assert!(question.is_well_formed());
        assert!(question.is_answerable());

        let mut no_text = question.clone();
        no_text.text.clear();
        assert!(!no_text.is_well_formed());

        let mut no_key = question.clone();
        no_key.correct_key.clear();
        assert!(!no_key.is_well_formed());

        let mut no_choices = question;
        no_choices.choices = Choices::new();
        assert!(!no_choices.is_well_formed());
    }

    #[test]
    fn unknown_correct_key_is_unanswerable() {
        let question = Question {
            page: "3".to_string(),
            text: "Q".to_string(),
            choices: [("A", "x"), ("B", "y")].into_iter().collect(),
            correct_key: "C".to_string(),
        };
        assert!(question.is_well_formed());
        assert!(!question.is_answerable());
        assert_eq!(question.correct_text(), None);
    }
}
