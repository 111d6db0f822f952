//! Stop point identifier type.

use std::fmt;

/// Error returned when parsing an invalid stop point id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop point id: {reason}")]
pub struct InvalidStopPointId {
    reason: &'static str,
}

/// A TfL StopPoint (Naptan) identifier.
///
/// Stop point ids are opaque identifiers assigned by TfL to stations and
/// platforms (e.g. `910GWALTMCN` for Walthamstow Central). The only
/// validation is that they must be non-empty.
///
/// # Examples
///
/// ```
/// use tube_monitor::domain::StopPointId;
///
/// let stop = StopPointId::new("910GWALTMCN".to_string()).unwrap();
/// assert_eq!(stop.as_str(), "910GWALTMCN");
///
/// // Empty strings are rejected
/// assert!(StopPointId::new("".to_string()).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StopPointId(String);

impl StopPointId {
    /// Create a new stop point id from a string.
    ///
    /// Returns an error if the string is empty.
    pub fn new(s: String) -> Result<Self, InvalidStopPointId> {
        if s.is_empty() {
            return Err(InvalidStopPointId {
                reason: "stop point id cannot be empty",
            });
        }
        Ok(StopPointId(s))
    }

    /// Returns the stop point id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopPointId({})", self.0)
    }
}

impl fmt::Display for StopPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_ids() {
        let stop = StopPointId::new("940GZZLUHBT".to_string()).unwrap();
        assert_eq!(stop.as_str(), "940GZZLUHBT");
        assert_eq!(stop.to_string(), "940GZZLUHBT");
    }

    #[test]
    fn rejects_empty_ids() {
        assert!(StopPointId::new(String::new()).is_err());
    }
}
