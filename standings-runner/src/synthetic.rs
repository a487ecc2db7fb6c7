//! Synthetic competitions for demos, benchmarks, and tests.
//!
//! Each team gets a random-walk value series starting at 10,000 with one
//! point per minute. Per-team RNG seeds are derived with BLAKE3 from the
//! master seed and the team id, so a team's series does not depend on how
//! many other teams are generated. Roughly one point in two hundred carries
//! no value, mimicking gaps in the live feed.

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use standings_core::{TimePoint, TimeSeries};

use crate::source::CompetitionSeries;

const STARTING_VALUE: f64 = 10_000.0;
const GAP_PROBABILITY: f64 = 0.005;

/// Generate `teams` entities with `points` observations each.
pub fn synthetic_competition(teams: usize, points: usize, seed: u64) -> CompetitionSeries {
    (0..teams)
        .map(|i| {
            let id = format!("team-{:02}", i + 1);
            let series = synthetic_series(&id, points, seed);
            (id, series)
        })
        .collect()
}

/// Generate one team's series.
pub fn synthetic_series(team_id: &str, points: usize, seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(team_seed(team_id, seed));
    // Per-team drift and volatility so rankings are not a coin toss
    let drift: f64 = rng.gen_range(-0.0002..0.0004);
    let vol: f64 = rng.gen_range(0.001..0.006);

    let start = epoch();
    let mut value = STARTING_VALUE;
    let mut series = Vec::with_capacity(points);

    for i in 0..points {
        let timestamp =
            (start + Duration::minutes(i as i64)).to_rfc3339_opts(SecondsFormat::Secs, true);
        if i > 0 {
            let shock: f64 = rng.gen_range(-1.0..1.0);
            value *= 1.0 + drift + vol * shock;
        }
        if i > 0 && rng.gen_bool(GAP_PROBABILITY) {
            series.push(TimePoint::missing(timestamp));
        } else {
            series.push(TimePoint::new(timestamp, value));
        }
    }
    series
}

fn team_seed(team_id: &str, seed: u64) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(team_id.as_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
