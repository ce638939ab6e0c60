//! Derives one demand entry per (active shop, open day): minimum, target
//! and maximum headcount for the AM/PM halves of that day, applying the
//! Sunday override and the enumerated large-shop business overrides.

use super::config_loader::NormalizedShop;
use super::entities::{CoverageMode, DemandEntry};

pub fn build_demands(shops: &[NormalizedShop]) -> Vec<DemandEntry> {
    let mut demands = Vec::new();
    for shop in shops {
        if !shop.shop.active {
            continue;
        }
        for day in 0..7u8 {
            if day == 6 && shop.sunday.closed {
                continue;
            }
            demands.push(build_day_demand(shop, day));
        }
    }
    demands
}

fn build_day_demand(shop: &NormalizedShop, day: u8) -> DemandEntry {
    let configured = shop
        .staffing
        .days
        .get(day as usize)
        .copied()
        .flatten()
        .unwrap_or_default();

    let is_solo = shop.shop.can_be_solo && !shop.is_large;

    let (mut min_am, mut min_pm, mut target_am, mut target_pm, mut max_staff) = if is_solo {
        (1, 1, 1, 1, 2)
    } else {
        (
            configured.min_am,
            configured.min_pm,
            configured.target_am,
            configured.target_pm,
            configured.max_staff,
        )
    };

    if day == 6 {
        if let Some(sunday_max) = shop.sunday.max_staff {
            max_staff = max_staff.min(sunday_max);
        }
        // Large shops on Sunday mandate a heavier balanced minimum and a
        // capped headcount, per the enumerated business override.
        if shop.is_large {
            min_am = min_am.max(2);
            min_pm = min_pm.max(2);
            max_staff = max_staff.min(4);
            target_am = target_am.max(min_am);
            target_pm = target_pm.max(min_pm);
        }
    }

    let coverage_mode = if day == 6 && shop.is_large {
        // Large-shop Sunday override disallows FULL shifts.
        CoverageMode::Split
    } else {
        shop.staffing.coverage_mode
    };

    DemandEntry {
        shop_id: shop.shop.id,
        day,
        min_am,
        min_pm,
        target_am: target_am.max(min_am),
        target_pm: target_pm.max(min_pm),
        max_staff,
        is_mandatory: configured.is_mandatory,
        is_solo,
        coverage_mode,
    }
}
