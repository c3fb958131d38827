//! Named gain profiles
//!
//! A profile is chosen once per controller and never changes afterwards.
//! Lookup by name is lenient: unrecognized names resolve to `DEFAULT`, and the
//! returned `ProfileSelection` records that the fallback happened.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Scale applied to the disturbance vector before it is subtracted
    pub recoil_compensation: f64,
    /// Base correction gain toward the compensated target
    pub sensitivity: f64,
    pub lock_strength: f64,
    pub accuracy_boost: f64,
    /// Multiplier on the velocity term of the extrapolation
    pub prediction_scale: f64,
    /// Exponential smoothing parameter in [0, 1]
    pub smoothing_factor: f64,
    /// Distance under which the correction gain is forced to the snap multiplier
    pub snap_threshold: f64,
    pub velocity_compensation: f64,
}

impl Profile {
    pub const DEFAULT: Profile = Profile {
        recoil_compensation: 0.8,
        sensitivity: 2.0,
        lock_strength: 2.0,
        accuracy_boost: 2.0,
        prediction_scale: 1.0,
        smoothing_factor: 0.7,
        snap_threshold: 0.1,
        velocity_compensation: 1.0,
    };

    pub const M1887: Profile = Profile {
        recoil_compensation: 1.2,
        sensitivity: 3.8,
        lock_strength: 2.5,
        accuracy_boost: 2.8,
        prediction_scale: 1.6,
        smoothing_factor: 0.85,
        snap_threshold: 0.15,
        velocity_compensation: 1.4,
    };
}

impl Default for Profile {
    fn default() -> Self {
        Profile::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    #[default]
    Default,
    M1887,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 2] = [ProfileKind::Default, ProfileKind::M1887];

    pub fn profile(self) -> Profile {
        match self {
            ProfileKind::Default => Profile::DEFAULT,
            ProfileKind::M1887 => Profile::M1887,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProfileKind::Default => "DEFAULT",
            ProfileKind::M1887 => "M1887",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TrackerError::UnknownProfile(s.to_string()))
    }
}

/// Outcome of a lenient profile lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileSelection {
    pub kind: ProfileKind,
    pub profile: Profile,
    /// Requested name did not match any profile and `DEFAULT` was substituted
    pub fell_back: bool,
}

impl ProfileSelection {
    pub fn select(name: &str) -> Self {
        match name.parse::<ProfileKind>() {
            Ok(kind) => ProfileSelection {
                kind,
                profile: kind.profile(),
                fell_back: false,
            },
            Err(_) => {
                log::warn!("Unknown profile '{}', using {}", name, ProfileKind::Default);
                ProfileSelection {
                    kind: ProfileKind::Default,
                    profile: Profile::DEFAULT,
                    fell_back: true,
                }
            }
        }
    }
}

impl From<ProfileKind> for ProfileSelection {
    fn from(kind: ProfileKind) -> Self {
        ProfileSelection {
            kind,
            profile: kind.profile(),
            fell_back: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_known_profile() {
        let selection = ProfileSelection::select("M1887");
        assert_eq!(selection.kind, ProfileKind::M1887);
        assert_eq!(selection.profile, Profile::M1887);
        assert!(!selection.fell_back);
    }

    #[test]
    fn test_select_is_case_insensitive() {
        let selection = ProfileSelection::select("default");
        assert_eq!(selection.kind, ProfileKind::Default);
        assert!(!selection.fell_back);
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let selection = ProfileSelection::select("AWM");
        assert_eq!(selection.kind, ProfileKind::Default);
        assert_eq!(selection.profile, Profile::DEFAULT);
        assert!(selection.fell_back);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        let err = "nope".parse::<ProfileKind>().unwrap_err();
        assert!(matches!(err, TrackerError::UnknownProfile(ref n) if n == "nope"));
    }

    #[test]
    fn test_display_round_trips() {
        for kind in ProfileKind::ALL {
            assert_eq!(kind.to_string().parse::<ProfileKind>().unwrap(), kind);
        }
    }
}
