//! Ordered response header set.

/// Insertion-ordered multimap of response headers.
///
/// Names compare case-insensitively but keep the casing they were last set
/// with. Setting a name replaces all previously set values for that name;
/// values passed together in one call keep their call order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderSet {
    /// An empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all values for a header name, replacing any existing ones.
    ///
    /// An existing entry keeps its position but takes the new casing.
    pub fn set(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, values),
            None => self.entries.push((name, values)),
        }
    }

    /// Values for a name, case-insensitive.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (name, values) in iter {
            set.set(name, values);
        }
        set
    }
}

impl FromIterator<(String, String)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (name, value) in iter {
            set.set(name, vec![value]);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn set_replaces_all_values_for_a_name() {
        let mut headers = HeaderSet::new();
        headers.set("c", strings(&["d", "e", "f"]));
        headers.set("c", strings(&["d", "e"]));

        assert_eq!(headers.get("c").unwrap(), &["d", "e"]);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn lookup_is_case_insensitive_with_last_set_casing() {
        let mut headers = HeaderSet::new();
        headers.set("content-type", strings(&["text/plain"]));
        headers.set("Content-Type", strings(&["text/html"]));

        assert_eq!(headers.get("CONTENT-TYPE").unwrap(), &["text/html"]);
        let (name, _) = headers.iter().next().unwrap();
        assert_eq!(name, "Content-Type");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut headers = HeaderSet::new();
        headers.set("a", strings(&["1"]));
        headers.set("b", strings(&["2"]));
        headers.set("a", strings(&["3"]));

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn values_within_one_call_keep_order() {
        let mut headers = HeaderSet::new();
        headers.set("set-cookie", strings(&["a=1", "b=2", "c=3"]));
        assert_eq!(headers.get("set-cookie").unwrap(), &["a=1", "b=2", "c=3"]);
    }
}
