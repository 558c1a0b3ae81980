//! Seasonal cycle across the calendar
//!
//! Provides the season of every grid week, including:
//! - An 8-zone year (four peaks, four transitions) anchored on December 1st
//! - Hemisphere-aware rotation so zones line up with real months
//! - Per-week colour tints interpolated between the peak seasons

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::palette::Rgb;

/// Weeks in one seasonal cycle.
pub const CYCLE_WEEKS: usize = 52;

// =============================================================================
// SEASON DEFINITIONS
// =============================================================================

/// The four seasons
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter = 0,
    Spring = 1,
    Summer = 2,
    Autumn = 3,
}

impl Season {
    /// Get all seasons in calendar order starting from December
    pub fn all() -> &'static [Season] {
        &[Season::Winter, Season::Spring, Season::Summer, Season::Autumn]
    }

    /// Get the next season
    pub fn next(&self) -> Season {
        match self {
            Season::Winter => Season::Spring,
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }

    /// Fixed tint at the height of the season.
    pub fn peak_tint(&self) -> SeasonalTint {
        match self {
            Season::Winter => WINTER_TINT,
            Season::Spring => SPRING_TINT,
            Season::Summer => SUMMER_TINT,
            Season::Autumn => AUTUMN_TINT,
        }
    }
}

/// Which half of the globe the calendar owner lives in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

impl Hemisphere {
    /// Week offset applied to the rotation; the south runs half a year apart.
    pub fn offset_weeks(&self) -> usize {
        match self {
            Hemisphere::North => 0,
            Hemisphere::South => CYCLE_WEEKS / 2,
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hemisphere::North => f.write_str("north"),
            Hemisphere::South => f.write_str("south"),
        }
    }
}

impl FromStr for Hemisphere {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" | "northern" => Ok(Hemisphere::North),
            "south" | "s" | "southern" => Ok(Hemisphere::South),
            other => Err(format!("unknown hemisphere '{}' (expected north or south)", other)),
        }
    }
}

// =============================================================================
// ZONES
// =============================================================================

/// One of the eight zones of the seasonal year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeasonZone {
    Winter,
    WinterToSpring,
    Spring,
    SpringToSummer,
    Summer,
    SummerToAutumn,
    Autumn,
    AutumnToWinter,
}

/// Zone boundaries in weeks since December 1st: (zone, first week, end week exclusive).
const ZONES: [(SeasonZone, usize, usize); 8] = [
    (SeasonZone::Winter, 0, 8),          // Dec, Jan
    (SeasonZone::WinterToSpring, 8, 13), // Feb
    (SeasonZone::Spring, 13, 20),        // Mar, early Apr
    (SeasonZone::SpringToSummer, 20, 26),
    (SeasonZone::Summer, 26, 35),        // Jun, Jul
    (SeasonZone::SummerToAutumn, 35, 39), // Aug
    (SeasonZone::Autumn, 39, 46),        // Sep, early Oct
    (SeasonZone::AutumnToWinter, 46, 52),
];

impl SeasonZone {
    /// Zone containing a cycle position in [0, 51]. Larger values wrap.
    pub fn at(position: usize) -> SeasonZone {
        let p = position % CYCLE_WEEKS;
        ZONES
            .iter()
            .find(|(_, start, end)| p >= *start && p < *end)
            .map(|(zone, _, _)| *zone)
            .unwrap_or(SeasonZone::Winter)
    }

    fn bounds(&self) -> (usize, usize) {
        ZONES
            .iter()
            .find(|(zone, _, _)| zone == self)
            .map(|(_, start, end)| (*start, *end))
            .unwrap_or((0, CYCLE_WEEKS))
    }

    /// The peak season this zone leaves from.
    pub fn from_season(&self) -> Season {
        match self {
            SeasonZone::Winter | SeasonZone::WinterToSpring => Season::Winter,
            SeasonZone::Spring | SeasonZone::SpringToSummer => Season::Spring,
            SeasonZone::Summer | SeasonZone::SummerToAutumn => Season::Summer,
            SeasonZone::Autumn | SeasonZone::AutumnToWinter => Season::Autumn,
        }
    }

    pub fn is_peak(&self) -> bool {
        matches!(
            self,
            SeasonZone::Winter | SeasonZone::Spring | SeasonZone::Summer | SeasonZone::Autumn
        )
    }
}

/// Rotation offset for a grid whose oldest week starts on `oldest`.
///
/// Weeks elapsed since the most recent December 1st on or before `oldest`,
/// shifted half a cycle for the southern hemisphere. Always in [0, 51].
pub fn rotation_for_date(oldest: NaiveDate, hemisphere: Hemisphere) -> usize {
    let dec_year = if oldest.month() == 12 { oldest.year() } else { oldest.year() - 1 };
    let weeks = NaiveDate::from_ymd_opt(dec_year, 12, 1)
        .map(|dec1| (oldest - dec1).num_days().max(0) as usize / 7)
        .unwrap_or(0);
    (weeks + hemisphere.offset_weeks()) % CYCLE_WEEKS
}

/// Progress through a zone: `from` and `to` are equal with `t = 0` at a peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionBlend {
    pub from: Season,
    pub to: Season,
    pub t: f64,
}

/// Season lookups for one render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeasonCalendar {
    pub rotation: usize,
}

impl SeasonCalendar {
    pub fn new(oldest: Option<NaiveDate>, hemisphere: Hemisphere) -> Self {
        let rotation = match oldest {
            Some(date) => rotation_for_date(date, hemisphere),
            None => hemisphere.offset_weeks(),
        };
        Self { rotation }
    }

    pub fn with_rotation(rotation: usize) -> Self {
        Self { rotation: rotation % CYCLE_WEEKS }
    }

    fn position(&self, week: usize) -> usize {
        (week + self.rotation) % CYCLE_WEEKS
    }

    pub fn zone(&self, week: usize) -> SeasonZone {
        SeasonZone::at(self.position(week))
    }

    pub fn transition_blend(&self, week: usize) -> TransitionBlend {
        let position = self.position(week);
        let zone = SeasonZone::at(position);
        let from = zone.from_season();
        if zone.is_peak() {
            return TransitionBlend { from, to: from, t: 0.0 };
        }
        let (start, end) = zone.bounds();
        let t = (position - start) as f64 / (end - start) as f64;
        TransitionBlend { from, to: from.next(), t }
    }

    /// The season whose character dominates a week.
    pub fn season(&self, week: usize) -> Season {
        let blend = self.transition_blend(week);
        if blend.t < 0.5 {
            blend.from
        } else {
            blend.to
        }
    }

    pub fn tint(&self, week: usize) -> SeasonalTint {
        let blend = self.transition_blend(week);
        if blend.from == blend.to {
            return blend.from.peak_tint();
        }
        blend.from.peak_tint().lerp(&blend.to.peak_tint(), blend.t)
    }

    /// Zones that occur anywhere in a grid of `weeks` weeks.
    pub fn zones_present(&self, weeks: usize) -> BTreeSet<SeasonZone> {
        (0..weeks).map(|w| self.zone(w)).collect()
    }
}

// =============================================================================
// TINTS
// =============================================================================

/// Colour transform parameters for a point in the seasonal cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonalTint {
    /// Blend factor toward `color_target` (0 = none)
    pub color_shift: f64,
    pub color_target: Rgb,
    /// Multiplier on the green channel
    pub green_mul: f64,
    /// Added to red, subtracted from blue
    pub warmth: f64,
    /// Blend factor toward snow white (0 = none)
    pub snow_coverage: f64,
    /// Fraction of saturation kept (1 = unchanged)
    pub saturation: f64,
}

const SNOW: [f64; 3] = [240.0, 245.0, 250.0];

pub const SUMMER_TINT: SeasonalTint = SeasonalTint {
    color_shift: 0.0,
    color_target: Rgb::new(0, 0, 0),
    green_mul: 1.0,
    warmth: 0.0,
    snow_coverage: 0.0,
    saturation: 1.0,
};

pub const WINTER_TINT: SeasonalTint = SeasonalTint {
    color_shift: 0.15,
    color_target: Rgb::new(200, 215, 235),
    green_mul: 0.8,
    warmth: -10.0,
    snow_coverage: 0.55,
    saturation: 0.55,
};

pub const SPRING_TINT: SeasonalTint = SeasonalTint {
    color_shift: 0.08,
    color_target: Rgb::new(255, 190, 210),
    green_mul: 1.1,
    warmth: 0.0,
    snow_coverage: 0.0,
    saturation: 1.05,
};

pub const AUTUMN_TINT: SeasonalTint = SeasonalTint {
    color_shift: 0.25,
    color_target: Rgb::new(200, 110, 40),
    green_mul: 0.85,
    warmth: 18.0,
    snow_coverage: 0.0,
    saturation: 0.95,
};

impl SeasonalTint {
    pub fn is_identity(&self) -> bool {
        *self == SUMMER_TINT
    }

    /// Blend two tints field by field.
    ///
    /// `color_target` is only lerped when both sides shift. A side with zero
    /// shift (summer) borrows the other side's target instead, so the pull
    /// `shift * (target - c)` still grows linearly from zero and never drifts
    /// toward summer's unused black target.
    pub fn lerp(&self, other: &SeasonalTint, t: f64) -> SeasonalTint {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        let color_target = if self.color_shift == 0.0 {
            other.color_target
        } else if other.color_shift == 0.0 {
            self.color_target
        } else {
            self.color_target.lerp(other.color_target, t)
        };
        SeasonalTint {
            color_shift: mix(self.color_shift, other.color_shift),
            color_target,
            green_mul: mix(self.green_mul, other.green_mul),
            warmth: mix(self.warmth, other.warmth),
            snow_coverage: mix(self.snow_coverage, other.snow_coverage),
            saturation: mix(self.saturation, other.saturation),
        }
    }

    /// Run the five-step tint pipeline. Intermediate values are unclamped;
    /// only the final channels are clamped to [0, 255].
    pub fn apply(&self, rgb: Rgb) -> Rgb {
        if self.is_identity() {
            return rgb;
        }

        let mut c = [rgb.r as f64, rgb.g as f64, rgb.b as f64];

        let lum = 0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2];
        for ch in c.iter_mut() {
            *ch = lum + (*ch - lum) * self.saturation;
        }

        c[1] *= self.green_mul;

        c[0] += self.warmth;
        c[2] -= self.warmth;

        if self.color_shift > 0.0 {
            let target = [
                self.color_target.r as f64,
                self.color_target.g as f64,
                self.color_target.b as f64,
            ];
            for (ch, t) in c.iter_mut().zip(target) {
                *ch += (t - *ch) * self.color_shift;
            }
        }

        if self.snow_coverage > 0.0 {
            for (ch, s) in c.iter_mut().zip(SNOW) {
                *ch += (s - *ch) * self.snow_coverage;
            }
        }

        let out = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Rgb::new(out(c[0]), out(c[1]), out(c[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_cycle() {
        let s = Season::Winter;
        assert_eq!(s.next(), Season::Spring);
        assert_eq!(s.next().next(), Season::Summer);
        assert_eq!(s.next().next().next(), Season::Autumn);
        assert_eq!(s.next().next().next().next(), Season::Winter);
    }

    #[test]
    fn test_zones_cover_cycle_exactly_once() {
        let mut covered = [0u8; CYCLE_WEEKS];
        for (_, start, end) in ZONES {
            for p in start..end {
                covered[p] += 1;
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_every_rotation_and_week_is_in_domain() {
        for rotation in 0..CYCLE_WEEKS {
            let cal = SeasonCalendar::with_rotation(rotation);
            for week in 0..CYCLE_WEEKS {
                let blend = cal.transition_blend(week);
                assert!((0.0..1.0).contains(&blend.t));
                if cal.zone(week).is_peak() {
                    assert_eq!(blend.from, blend.to);
                    assert_eq!(blend.t, 0.0);
                } else {
                    assert_eq!(blend.to, blend.from.next());
                }
                // Rotating by r is the same as shifting the week by r.
                assert_eq!(cal.zone(week), SeasonCalendar::with_rotation(0).zone(week + rotation));
            }
        }
    }

    #[test]
    fn test_rotation_domain_for_every_week_of_year() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        for offset in 0..366 {
            let date = start + chrono::Duration::days(offset);
            for hemisphere in [Hemisphere::North, Hemisphere::South] {
                assert!(rotation_for_date(date, hemisphere) < CYCLE_WEEKS);
            }
        }
    }

    #[test]
    fn test_rotation_values() {
        let dec1 = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(rotation_for_date(dec1, Hemisphere::North), 0);
        assert_eq!(rotation_for_date(dec1, Hemisphere::South), 26);
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(rotation_for_date(jan1, Hemisphere::North), 4);
        let nov30 = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        assert_eq!(rotation_for_date(nov30, Hemisphere::North), 0);
    }

    #[test]
    fn test_june_start_is_summer_in_north_winter_in_south() {
        let june15 = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let north = SeasonCalendar::new(Some(june15), Hemisphere::North);
        assert_eq!(north.zone(0), SeasonZone::Summer);
        assert_eq!(north.season(0), Season::Summer);

        let south = SeasonCalendar::new(Some(june15), Hemisphere::South);
        assert_eq!(south.season(0), Season::Winter);
    }

    #[test]
    fn test_summer_tint_is_identity() {
        let cal = SeasonCalendar::with_rotation(0);
        let summer_week = (0..CYCLE_WEEKS).find(|&w| cal.zone(w) == SeasonZone::Summer).unwrap();
        let tint = cal.tint(summer_week);
        assert!(tint.is_identity());
        for rgb in [Rgb::new(0, 0, 0), Rgb::new(12, 200, 99), Rgb::new(255, 255, 255)] {
            assert_eq!(tint.apply(rgb), rgb);
        }
    }

    #[test]
    fn test_winter_tint_whitens_and_autumn_warms() {
        let grass = Rgb::new(80, 150, 60);
        let winter = WINTER_TINT.apply(grass);
        assert!(winter.b > grass.b);
        assert!(winter.r > grass.r);

        let autumn = AUTUMN_TINT.apply(grass);
        assert!(autumn.r > grass.r);
        assert!(autumn.g < grass.g);
    }

    #[test]
    fn test_transition_tint_lies_between_peaks() {
        let mid = SUMMER_TINT.lerp(&AUTUMN_TINT, 0.5);
        assert!((mid.warmth - 9.0).abs() < 1e-12);
        assert_eq!(mid.color_target, AUTUMN_TINT.color_target);
        assert!(!mid.is_identity());
    }

    #[test]
    fn test_summer_to_autumn_blend_moves_steadily() {
        for rgb in [Rgb::new(80, 150, 60), Rgb::new(30, 90, 200), Rgb::new(220, 220, 220)] {
            let steps: Vec<Rgb> = (0..=4).map(|i| SUMMER_TINT.lerp(&AUTUMN_TINT, i as f64 / 4.0).apply(rgb)).collect();
            assert_eq!(steps[0], rgb);
            assert_eq!(steps[4], AUTUMN_TINT.apply(rgb));
            for pair in steps.windows(2) {
                assert!(pair[1].r >= pair[0].r, "{:?}", steps);
                assert!(pair[1].g <= pair[0].g, "{:?}", steps);
                assert!(pair[1].b <= pair[0].b, "{:?}", steps);
            }
        }
    }

    #[test]
    fn test_zones_present() {
        let cal = SeasonCalendar::with_rotation(0);
        assert_eq!(cal.zones_present(52).len(), 8);
        let few = cal.zones_present(4);
        assert_eq!(few.len(), 1);
        assert!(few.contains(&SeasonZone::Winter));
    }
}
