use std::cmp::Ordering;
use std::fmt;

/// Sample/time identifier of a table row
///
/// Keys keep the text they were read from so output files reproduce the
/// input labels exactly. When the text parses as a finite number the numeric
/// value is used for comparison, so `0` and `0.0` name the same row.
#[derive(Debug, Clone)]
pub struct SampleKey {
    text: String,
    value: Option<f64>,
}

impl SampleKey {
    /// Create a key from its textual representation
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        Self { text, value }
    }

    /// Text of the key as read or constructed
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Numeric value of the key, if it is a number
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl From<&str> for SampleKey {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SampleKey {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<f64> for SampleKey {
    fn from(value: f64) -> Self {
        Self::new(value.to_string())
    }
}

impl From<i32> for SampleKey {
    fn from(value: i32) -> Self {
        Self::new(value.to_string())
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Ord for SampleKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.value, other.value) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.text.cmp(&other.text),
        }
    }
}

impl PartialOrd for SampleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SampleKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SampleKey {}
