// crates/beamsim-core/src/physics/location.rs

use std::fmt;
use std::str::FromStr;

use crate::error::BeamError;

/// Where the beam is standing. Only gravity depends on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Location {
    Mercury,
    Venus,
    #[default]
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Location {
    pub const ALL: [Location; 10] = [
        Location::Mercury,
        Location::Venus,
        Location::Earth,
        Location::Moon,
        Location::Mars,
        Location::Jupiter,
        Location::Saturn,
        Location::Uranus,
        Location::Neptune,
        Location::Pluto,
    ];

    /// Surface gravity in m/s^2.
    pub const fn gravity(self) -> f64 {
        match self {
            Location::Mercury => 3.70,
            Location::Venus => 8.87,
            Location::Earth => 9.81,
            Location::Moon => 1.62,
            Location::Mars => 3.71,
            Location::Jupiter => 24.79,
            Location::Saturn => 10.44,
            Location::Uranus => 8.69,
            Location::Neptune => 11.15,
            Location::Pluto => 0.62,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Location::Mercury => "mercury",
            Location::Venus => "venus",
            Location::Earth => "earth",
            Location::Moon => "moon",
            Location::Mars => "mars",
            Location::Jupiter => "jupiter",
            Location::Saturn => "saturn",
            Location::Uranus => "uranus",
            Location::Neptune => "neptune",
            Location::Pluto => "pluto",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Location {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Location::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BeamError::UnknownLocation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        for l in Location::ALL {
            assert_eq!(l.name().to_uppercase().parse::<Location>().unwrap(), l);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(
            "vulcan".parse::<Location>(),
            Err(BeamError::UnknownLocation(_))
        ));
    }

    #[test]
    fn all_gravities_positive() {
        assert!(Location::ALL.iter().all(|l| l.gravity() > 0.0));
        assert_eq!(Location::default().gravity(), 9.81);
    }
}
