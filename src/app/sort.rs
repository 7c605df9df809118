//! Named sort keys for the recordings list.
//!
//! Keys are registered in a fixed order which also defines the order the
//! "sort by" button cycles through. Names are the strings shown in the skin
//! and persisted in settings.
//!
//! # Example
//!
//! ```rust
//! use reclist::app::sort::SortKey;
//!
//! let key = SortKey::from_name("Title").unwrap();
//! assert_eq!(key.cycle_next(), SortKey::OriginalAirDate);
//! assert_eq!(SortKey::OriginalAirDate.cycle_next(), SortKey::Date);
//! ```

use crate::domain::Program;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// A registered comparison key over programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Recording start time.
    #[default]
    Date,
    /// Title, with the original air date breaking ties.
    Title,
    /// Original air date alone. Unknown dates sort first.
    OriginalAirDate,
}

impl SortKey {
    /// Every key in registration order.
    pub const ALL: [Self; 3] = [Self::Date, Self::Title, Self::OriginalAirDate];

    /// Returns the registered name of the key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Title => "Title",
            Self::OriginalAirDate => "Orig. Air Date",
        }
    }

    /// Looks a key up by its registered name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Returns the key after this one, wrapping to the first after the last.
    #[must_use]
    pub fn cycle_next(self) -> Self {
        let position = Self::ALL
            .iter()
            .position(|key| *key == self)
            .unwrap_or_default();
        Self::ALL[(position + 1) % Self::ALL.len()]
    }

    /// Compares two programs by this key, ascending.
    #[must_use]
    pub fn compare(self, a: &Program, b: &Program) -> Ordering {
        match self {
            Self::Date => a.start_time.cmp(&b.start_time),
            Self::Title => (&a.title, a.original_air_date).cmp(&(&b.title, b.original_air_date)),
            Self::OriginalAirDate => a.original_air_date.cmp(&b.original_air_date),
        }
    }

    /// Sorts `programs` in place by this key.
    ///
    /// The sort is stable in both directions: programs that compare equal keep
    /// their input order even when `ascending` is `false`.
    pub fn sort<P: Deref<Target = Program>>(self, programs: &mut [P], ascending: bool) {
        if ascending {
            programs.sort_by(|a, b| self.compare(a, b));
        } else {
            programs.sort_by(|a, b| self.compare(b, a));
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sorts by a key given by name.
///
/// # Panics
///
/// Panics if `name` is not a registered key. Names coming from outside the
/// program (settings, skins) must be checked with [`SortKey::from_name`]
/// first; reaching this with an unknown name is a bug.
pub fn sort_by_name<P: Deref<Target = Program>>(programs: &mut [P], name: &str, ascending: bool) {
    let Some(key) = SortKey::from_name(name) else {
        panic!("unregistered sort key: {name:?}");
    };
    key.sort(programs, ascending);
}
