//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for HTTP requests against logs.tf
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL for the logs.tf site
pub const LOGS_TF_URL: &str = "https://logs.tf";

/// Timestamp layout used by the source engine, e.g. `07/10/2019 - 23:28:01`
pub const LOG_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Cache directories hold this many consecutive log ids each.
/// Ids below `CACHE_BUCKET_MIN` all land in bucket "0".
pub const CACHE_BUCKET_SIZE: i64 = 1000;
pub const CACHE_BUCKET_MIN: i64 = 10_000;

/// Weapons whose nominal `damage` value under-reports the real health
/// reduction. When one of these carries a positive `realdamage` field,
/// the real value is applied instead.
pub const REAL_DAMAGE_WEAPONS: &[&str] = &[
    "big_earner",
    "black_rose",
    "eternal_reward",
    "knife",
    "kunai",
    "sharp_dresser",
    "spy_cicle",
];

/// A medic dying above this charge percentage counts as a near-full
/// charge death. Matches the logs.tf heuristic.
pub const NEAR_FULL_CHARGE_PCT: i64 = 80;

// Relative pack values used when counting health pack pickups
pub const PACK_WEIGHT_SMALL: i32 = 1;
pub const PACK_WEIGHT_MEDIUM: i32 = 2;
pub const PACK_WEIGHT_FULL: i32 = 4;

pub fn is_real_damage_weapon(weapon: &str) -> bool {
    REAL_DAMAGE_WEAPONS.contains(&weapon)
}
