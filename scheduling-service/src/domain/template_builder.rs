//! Derives the set of candidate shift templates for every shop from its
//! open/close times and per-day coverage-mode policy.

use shared::time::{duration_tenths, parse_hhmm};
use shared::RosterResult;

use super::config_loader::NormalizedShop;
use super::entities::{CoverageMode, ShiftTemplate, ShiftType};

pub fn build_templates(shops: &[NormalizedShop]) -> RosterResult<Vec<ShiftTemplate>> {
    let mut templates = Vec::new();
    for shop in shops {
        if !shop.shop.active {
            continue;
        }
        for day in 0..7u8 {
            if day == 6 && shop.sunday.closed {
                continue;
            }
            templates.extend(build_day_templates(shop, day)?);
        }
    }
    Ok(templates)
}

fn build_day_templates(shop: &NormalizedShop, day: u8) -> RosterResult<Vec<ShiftTemplate>> {
    let (open_str, close_str) = if day == 6 {
        (
            shop.sunday
                .custom_open
                .clone()
                .unwrap_or_else(|| shop.shop.open.clone()),
            shop.sunday
                .custom_close
                .clone()
                .unwrap_or_else(|| shop.shop.close.clone()),
        )
    } else {
        (shop.shop.open.clone(), shop.shop.close.clone())
    };

    let open = parse_hhmm(&open_str)?;
    let close = parse_hhmm(&close_str)?;
    if close <= open {
        return Ok(Vec::new());
    }

    let midpoint = (open + close) / 2;
    let is_mandatory = shop
        .staffing
        .days
        .get(day as usize)
        .copied()
        .flatten()
        .map(|d| d.is_mandatory)
        .unwrap_or(false);

    let full_duration = duration_tenths(open, close);
    let short_day = full_duration <= 60; // <= 6.0 hours

    let mut templates = Vec::new();
    let mut push = |shift_type: ShiftType, start: u32, end: u32| {
        templates.push(ShiftTemplate {
            shop_id: shop.shop.id,
            day,
            shift_type,
            start_minutes: start,
            end_minutes: end,
            duration_tenths: duration_tenths(start, end),
            is_mandatory,
        });
    };

    if short_day {
        push(ShiftType::Full, open, close);
        return Ok(templates);
    }

    match shop.staffing.coverage_mode {
        CoverageMode::Split => {
            push(ShiftType::Am, open, midpoint);
            push(ShiftType::Pm, midpoint, close);
        }
        CoverageMode::FullDayOnly => {
            push(ShiftType::Full, open, close);
        }
        CoverageMode::Flexible => {
            push(ShiftType::Am, open, midpoint);
            push(ShiftType::Pm, midpoint, close);
            push(ShiftType::Full, open, close);
        }
    }

    Ok(templates)
}
