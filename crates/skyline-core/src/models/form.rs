use serde::{Deserialize, Serialize};

/// Raw text fields exactly as the form transport delivered them.
///
/// Repeated names keep their arrival order. Bracketed array names
/// (`first_name[]`, `first_name[2]`) are folded into the bare name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawForm {
    entries: Vec<(String, String)>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .push((bare_name(name.as_ref()).to_string(), value.into()));
    }

    /// All values posted under `name`, in arrival order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = RawForm::new();
        for (name, value) in iter {
            form.push(name, value);
        }
        form
    }
}

fn bare_name(name: &str) -> &str {
    let name = name.trim();
    if let Some(open) = name.rfind('[')
        && name.ends_with(']')
    {
        let index = &name[open + 1..name.len() - 1];
        if index.chars().all(|c| c.is_ascii_digit()) {
            return &name[..open];
        }
    }
    name
}
