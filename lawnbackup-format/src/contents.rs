use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask of payload categories included in, or requested from, an archive.
///
/// The mask supplied at restore time is independent of the one the archive
/// was created with; the effective restored set is their intersection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Contents(u32);

impl Contents {
    /// Home screen state: the launcher database.
    pub const HOMESCREEN: Contents = Contents(1 << 0);
    /// The preferences file.
    pub const SETTINGS: Contents = Contents(1 << 1);
    /// Reserved; not consulted by current read or write logic.
    pub const WALLPAPER: Contents = Contents(1 << 2);

    pub const fn empty() -> Contents {
        Contents(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Contents {
        Contents(bits)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Contents) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Contents {
    type Output = Contents;

    fn bitor(self, rhs: Contents) -> Contents {
        Contents(self.0 | rhs.0)
    }
}

impl BitOrAssign for Contents {
    fn bitor_assign(&mut self, rhs: Contents) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }

        let mut first = true;
        for (bit, label) in [
            (Contents::HOMESCREEN, "homescreen"),
            (Contents::SETTINGS, "settings"),
            (Contents::WALLPAPER, "wallpaper"),
        ] {
            if self.contains(bit) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", label)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Contents;

    #[test]
    fn bits_round_trip() {
        let mask = Contents::HOMESCREEN | Contents::SETTINGS;
        assert_eq!(mask.bits(), 3);
        assert_eq!(Contents::from_bits(3), mask);
    }

    #[test]
    fn contains_is_per_bit() {
        let mask = Contents::HOMESCREEN;
        assert!(mask.contains(Contents::HOMESCREEN));
        assert!(!mask.contains(Contents::SETTINGS));
        assert!(!mask.contains(Contents::HOMESCREEN | Contents::SETTINGS));
        assert!((Contents::HOMESCREEN | Contents::SETTINGS).contains(mask));
    }

    #[test]
    fn empty_mask() {
        assert!(Contents::empty().is_empty());
        assert!(!Contents::WALLPAPER.is_empty());
        assert!(Contents::WALLPAPER.contains(Contents::empty()));
    }

    #[test]
    fn display_names() {
        assert_eq!(Contents::empty().to_string(), "-");
        assert_eq!(
            (Contents::HOMESCREEN | Contents::SETTINGS).to_string(),
            "homescreen|settings"
        );
        assert_eq!(Contents::WALLPAPER.to_string(), "wallpaper");
    }
}
