//! Synthetic GPS fix history.
//!
//! The server expects every signature to carry the three most recent location
//! fixes, each a slightly jittered copy of the reported position, with ages
//! that grow between requests and a fresh fix roughly once a second. The
//! window below reproduces that pattern from a caller-supplied position and
//! random source; nothing here reads a real sensor.
//!
//! ```text
//! empty    -> three fixes aged [500,750) [350,450) [200,300) ms
//! stale    -> oldest evicted, survivors aged, new fix aged [200,300) ms
//! fresh    -> all three aged, no new fix
//! ```

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::proto;

/// Number of fixes carried by every signature.
pub const WINDOW_LEN: usize = 3;

/// Once the oldest fix is older than this, a new fix is taken.
pub const REFRESH_AFTER_MS: u64 = 1000;

/// Initial age ranges for the three fixes, oldest first.
const INITIAL_AGES_MS: [(u64, u64); WINDOW_LEN] = [(500, 750), (350, 450), (200, 300)];

/// Age range of a newly taken fix.
const FRESH_AGE_MS: (u64, u64) = (200, 300);

const JITTER: f32 = 0.01;

pub const FIX_PROVIDER: &str = "fused";
const PROVIDER_STATUS: u64 = 3;
const LOCATION_TYPE: u64 = 1;

/// The position the client reports for a request.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    /// Horizontal accuracy in metres.
    pub accuracy: f64,
    pub speed: Option<f64>,
    pub course: Option<f64>,
    pub floor: Option<i32>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, altitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            accuracy,
            ..Default::default()
        }
    }
}

/// One synthetic GPS sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Age of the fix in milliseconds.
    pub timestamp_snapshot: u64,
    pub latitude: f32,
    pub longitude: f32,
    pub altitude: f32,
    pub speed: f32,
    pub course: f32,
    pub floor: Option<i32>,
}

impl LocationFix {
    fn generate<R: Rng>(rng: &mut R, location: &Location, age_ms: u64) -> Self {
        let mut jitter = |value: f64| value as f32 + rng.gen_range(-JITTER..JITTER);
        let latitude = jitter(location.latitude);
        let longitude = jitter(location.longitude);
        let altitude = jitter(location.altitude);
        let speed = location.speed.map(&mut jitter);
        let course = location.course.map(&mut jitter);

        Self {
            timestamp_snapshot: age_ms,
            latitude,
            longitude,
            altitude,
            speed: speed.unwrap_or_else(|| rng.gen_range(1.0..5.0)),
            course: course.unwrap_or_else(|| rng.gen_range(0.0..360.0)),
            floor: location.floor,
        }
    }

    pub fn to_proto(&self) -> proto::LocationFix {
        proto::LocationFix {
            provider: FIX_PROVIDER.to_string(),
            timestamp_snapshot: self.timestamp_snapshot,
            altitude: self.altitude,
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            course: self.course,
            provider_status: PROVIDER_STATUS,
            floor: self.floor,
            location_type: LOCATION_TYPE,
        }
    }
}

/// The rolling window of the last three fixes.
///
/// Holds either zero or exactly `WINDOW_LEN` fixes, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixWindow {
    fixes: VecDeque<LocationFix>,
    last_update_ms: Option<u64>,
}

impl FixWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationFix> {
        self.fixes.iter()
    }

    pub fn to_proto(&self) -> Vec<proto::LocationFix> {
        self.fixes.iter().map(LocationFix::to_proto).collect()
    }

    /// Advance the window to `now_ms` (monotonic, since client start) and
    /// return the age of the newest fix.
    pub fn next_ms_since_last_fix<R: Rng>(
        &mut self,
        rng: &mut R,
        location: &Location,
        now_ms: u64,
    ) -> u64 {
        let elapsed = now_ms.saturating_sub(self.last_update_ms.unwrap_or(now_ms));
        self.last_update_ms = Some(now_ms);

        let oldest_age = match self.fixes.front() {
            None => {
                for (min, max) in INITIAL_AGES_MS {
                    let age = rng.gen_range(min..max);
                    self.fixes.push_back(LocationFix::generate(rng, location, age));
                }
                return self.newest_age();
            }
            Some(oldest) => oldest.timestamp_snapshot + elapsed,
        };

        if oldest_age > REFRESH_AFTER_MS {
            self.fixes.pop_front();
            self.age_by(elapsed);
            let age = rng.gen_range(FRESH_AGE_MS.0..FRESH_AGE_MS.1);
            self.fixes.push_back(LocationFix::generate(rng, location, age));
            age
        } else {
            self.age_by(elapsed);
            self.newest_age()
        }
    }

    fn age_by(&mut self, elapsed: u64) {
        for fix in self.fixes.iter_mut() {
            fix.timestamp_snapshot += elapsed;
        }
    }

    fn newest_age(&self) -> u64 {
        self.fixes
            .back()
            .map(|fix| fix.timestamp_snapshot)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn here() -> Location {
        Location::new(37.7749, -122.4194, 16.0, 5.0)
    }

    #[test]
    fn test_first_call_fills_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut window = FixWindow::new();

        let ms = window.next_ms_since_last_fix(&mut rng, &here(), 0);
        assert!((200..300).contains(&ms));
        assert_eq!(window.len(), WINDOW_LEN);

        let ages: Vec<u64> = window.iter().map(|f| f.timestamp_snapshot).collect();
        assert!((500..750).contains(&ages[0]));
        assert!((350..450).contains(&ages[1]));
        assert_eq!(ages[2], ms);
    }

    #[test]
    fn test_fixes_are_jittered_copies() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut window = FixWindow::new();
        window.next_ms_since_last_fix(&mut rng, &here(), 0);

        for fix in window.iter() {
            assert!((fix.latitude - 37.7749f32).abs() <= 0.011);
            assert!((fix.longitude + 122.4194f32).abs() <= 0.011);
            assert!((1.0..5.0).contains(&fix.speed));
            assert!((0.0..360.0).contains(&fix.course));
        }
        let wire = window.to_proto();
        assert_eq!(wire[0].provider, "fused");
        assert_eq!(wire[0].provider_status, 3);
        assert_eq!(wire[0].location_type, 1);
    }

    #[test]
    fn test_quick_calls_only_age_fixes() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut window = FixWindow::new();
        let first = window.next_ms_since_last_fix(&mut rng, &here(), 1_000);
        let before: Vec<LocationFix> = window.iter().cloned().collect();

        let second = window.next_ms_since_last_fix(&mut rng, &here(), 1_100);
        assert_eq!(second, first + 100);
        for (old, new) in before.iter().zip(window.iter()) {
            assert_eq!(new.timestamp_snapshot, old.timestamp_snapshot + 100);
            assert_eq!(new.latitude, old.latitude);
        }
    }

    #[test]
    fn test_stale_window_evicts_oldest() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut window = FixWindow::new();
        window.next_ms_since_last_fix(&mut rng, &here(), 0);
        let before: Vec<LocationFix> = window.iter().cloned().collect();

        let ms = window.next_ms_since_last_fix(&mut rng, &here(), 1_200);
        assert!((200..300).contains(&ms));
        assert_eq!(window.len(), WINDOW_LEN);

        let after: Vec<&LocationFix> = window.iter().collect();
        assert_eq!(after[0].latitude, before[1].latitude);
        assert_eq!(after[0].timestamp_snapshot, before[1].timestamp_snapshot + 1_200);
        assert_eq!(after[1].timestamp_snapshot, before[2].timestamp_snapshot + 1_200);
        assert_eq!(after[2].timestamp_snapshot, ms);
    }
}
