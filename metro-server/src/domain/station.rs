//! Station names.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid station name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStation {
    reason: &'static str,
}

/// A named point on one or more lines.
///
/// A station has no identity beyond its name: two stations built from the
/// same name compare and hash equal. Names are matched exactly, including
/// case. The name is shared, so cloning a `Station` is cheap.
///
/// # Examples
///
/// ```
/// use metro_server::domain::Station;
///
/// let a = Station::parse("Admiralty").unwrap();
/// assert_eq!(a.name(), "Admiralty");
/// assert_eq!(a, Station::parse("Admiralty").unwrap());
///
/// // Case matters
/// assert_ne!(a, Station::parse("admiralty").unwrap());
///
/// // Blank names are rejected
/// assert!(Station::parse("").is_err());
/// assert!(Station::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Station(Arc<str>);

impl Station {
    /// Parse a station from its name.
    ///
    /// The name is kept verbatim. It must contain at least one
    /// non-whitespace character.
    pub fn parse(name: &str) -> Result<Self, InvalidStation> {
        if name.trim().is_empty() {
            return Err(InvalidStation {
                reason: "must not be blank",
            });
        }

        Ok(Station(Arc::from(name)))
    }

    /// Returns the station name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Station {
    fn borrow(&self) -> &str {
        self.name()
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({})", self.name())
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Station {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then name returns the original
        #[test]
        fn roundtrip(s in "[A-Za-z][A-Za-z0-9 ']{0,20}") {
            let station = Station::parse(&s).unwrap();
            prop_assert_eq!(station.name(), s.as_str());
        }

        /// Independently parsed stations with the same name are equal
        #[test]
        fn same_name_same_station(s in "[A-Za-z]{1,12}") {
            prop_assert_eq!(Station::parse(&s).unwrap(), Station::parse(&s).unwrap());
        }

        /// Whitespace-only names are always rejected
        #[test]
        fn whitespace_rejected(s in "[ \t\n]{0,8}") {
            prop_assert!(Station::parse(&s).is_err());
        }
    }
}
