/// Ordered assignment of site tables to the isotopologue columns they split
///
/// Iteration follows insertion order. Assigning a site a second time
/// replaces its column but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteMapping {
    entries: Vec<(String, String)>,
}

impl SiteMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `column` by the site table `site`
    pub fn insert(&mut self, site: impl Into<String>, column: impl Into<String>) {
        let site = site.into();
        let column = column.into();
        match self.entries.iter_mut().find(|(s, _)| *s == site) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((site, column)),
        }
    }

    /// Builder-style variant of [`SiteMapping::insert`]
    pub fn with(mut self, site: impl Into<String>, column: impl Into<String>) -> Self {
        self.insert(site, column);
        self
    }

    /// `(site, column)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, c)| (s.as_str(), c.as_str()))
    }

    /// Column split by a site table
    pub fn column_for(&self, site: &str) -> Option<&str> {
        self.iter().find(|(s, _)| *s == site).map(|(_, c)| c)
    }

    /// Number of assignments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is assigned
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, C: Into<String>> FromIterator<(S, C)> for SiteMapping {
    fn from_iter<I: IntoIterator<Item = (S, C)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (site, column) in iter {
            mapping.insert(site, column);
        }
        mapping
    }
}

/// Parse a `SITE=COLUMN` assignment
///
/// Only the first `=` separates site and column, so column labels may
/// contain `=`.
pub fn parse_assignment(text: &str) -> Result<(String, String), String> {
    let (site, column) = text
        .split_once('=')
        .ok_or_else(|| format!("expected SITE=COLUMN, got '{}'", text))?;
    let (site, column) = (site.trim(), column.trim());
    if site.is_empty() || column.is_empty() {
        return Err(format!("expected SITE=COLUMN, got '{}'", text));
    }
    Ok((site.to_string(), column.to_string()))
}
