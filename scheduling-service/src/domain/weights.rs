//! Named objective weights, grouped by intent so a deployment can re-tune
//! the soft objective without touching the model assembler. Magnitudes
//! come from the documented canonical weights; order of magnitude is what
//! matters, not the exact values.

// Coverage.
pub const UNDER_MINIMUM_COVERAGE: i32 = 100_000;
pub const UNDER_TARGET_COVERAGE: i32 = 500;
pub const MISSED_SPECIAL_REQUEST: i32 = 100_000;
pub const OVER_COVERAGE_PER_BODY: i32 = 20;

// Hours.
pub const UNDER_WEEKLY_TARGET_PER_HOUR: i32 = 2_000;
pub const OVERTIME_TIER_1_PER_HOUR: i32 = 300; // 0-2h above target
pub const OVERTIME_TIER_2_EXTRA_PER_HOUR: i32 = 200; // beyond +2h
pub const OVERTIME_TIER_3_EXTRA_PER_HOUR: i32 = 500; // beyond +5h
pub const OVERTIME_TIER_4_EXTRA_PER_HOUR: i32 = 1_000; // beyond +10h

pub const OVERTIME_TIER_1_HOURS: i32 = 2;
pub const OVERTIME_TIER_2_HOURS: i32 = 5;
pub const OVERTIME_TIER_3_HOURS: i32 = 10;

// Shape.
pub const CROSS_SHOP_PENALTY: i32 = 30;
pub const FULL_SHIFT_SMALL_SHOP: i32 = 300;
pub const FULL_SHIFT_LARGE_SHOP: i32 = 3_000;
pub const AM_PM_IMBALANCE_LARGE_SHOP: i32 = 500;
pub const PM_EXCEEDS_AM_LARGE_SHOP: i32 = 300;

/// Per-hour penalty for the overtime hours falling in tier `tier` (1-indexed,
/// tiers beyond 4 reuse the tier-4 weight). Hours are expressed as whole
/// tenths-of-an-hour increments by the caller.
pub fn overtime_tier_weight(tier: u32) -> i32 {
    match tier {
        1 => OVERTIME_TIER_1_PER_HOUR,
        2 => OVERTIME_TIER_1_PER_HOUR + OVERTIME_TIER_2_EXTRA_PER_HOUR,
        3 => OVERTIME_TIER_1_PER_HOUR + OVERTIME_TIER_2_EXTRA_PER_HOUR + OVERTIME_TIER_3_EXTRA_PER_HOUR,
        _ => {
            OVERTIME_TIER_1_PER_HOUR
                + OVERTIME_TIER_2_EXTRA_PER_HOUR
                + OVERTIME_TIER_3_EXTRA_PER_HOUR
                + OVERTIME_TIER_4_EXTRA_PER_HOUR
        }
    }
}
