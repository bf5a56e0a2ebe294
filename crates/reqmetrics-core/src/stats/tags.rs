/// Tag set attached to a recorded sample.
///
/// Pairs are kept sorted by key so the same tags always land in the same
/// aggregation row. A later duplicate key overrides an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagSet {
    pairs: Vec<(String, String)>,
}

impl TagSet {
    /// The single global row.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(pairs: &[(&str, &str)]) -> Self {
        let mut out: Vec<(String, String)> = Vec::with_capacity(pairs.len());
        for (k, v) in pairs {
            match out.iter_mut().find(|(ek, _)| ek == k) {
                Some(existing) => existing.1 = v.to_string(),
                None => out.push((k.to_string(), v.to_string())),
            }
        }
        out.sort();
        Self { pairs: out }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
