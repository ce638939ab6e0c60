//! Normalises heterogeneous raw shop/employee input into a shape the rest
//! of the pipeline can treat uniformly: sub-fields resolved to concrete
//! values, the large-shop solo override applied, and name-based keys
//! lowercased and trimmed. Shape only, no business-rule validation.

use std::collections::HashMap;

use shared::{RosterError, RosterResult};

use super::entities::{
    is_large_shop, Employee, RosterRequest, Shop, StaffingConfig, SundayConfig, TrimmingConfig,
};

/// A shop with every sub-field resolved to a concrete value.
#[derive(Debug, Clone)]
pub struct NormalizedShop {
    pub shop: Shop,
    pub staffing: StaffingConfig,
    pub sunday: SundayConfig,
    pub trimming: TrimmingConfig,
    pub is_large: bool,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub employees: Vec<Employee>,
    pub shops: Vec<NormalizedShop>,
    /// Fixed days off, keyed by lowercase-trimmed employee name, with day
    /// indices already normalised (0=Mon..6=Sun); unrecognised day names
    /// are dropped rather than aborting the whole field.
    pub fixed_days_off: HashMap<String, Vec<u8>>,
}

pub fn load(request: &RosterRequest) -> RosterResult<LoadedConfig> {
    if request.employees.is_empty() {
        return Err(RosterError::InvalidInput(
            "at least one employee is required".to_string(),
        ));
    }
    if request.shops.is_empty() {
        return Err(RosterError::InvalidInput(
            "at least one shop is required".to_string(),
        ));
    }

    for employee in &request.employees {
        if employee.name.trim().is_empty() {
            return Err(RosterError::InvalidInput(format!(
                "employee {} is missing a name",
                employee.id
            )));
        }
    }

    let mut shops = Vec::with_capacity(request.shops.len());
    for shop in &request.shops {
        if shop.name.trim().is_empty() {
            return Err(RosterError::InvalidInput(format!(
                "shop {} is missing a name",
                shop.id
            )));
        }
        shops.push(normalize_shop(shop.clone()));
    }

    let mut fixed_days_off = HashMap::new();
    for (raw_name, raw_days) in &request.fixed_days_off {
        let key = raw_name.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        let days: Vec<u8> = raw_days
            .iter()
            .filter_map(|d| shared::time::normalize_day(d))
            .collect();
        fixed_days_off.insert(key, days);
    }

    Ok(LoadedConfig {
        employees: request.employees.clone(),
        shops,
        fixed_days_off,
    })
}

fn normalize_shop(shop: Shop) -> NormalizedShop {
    let staffing = shop.staffing.clone().resolve(StaffingConfig::default());
    let sunday = shop.sunday.clone().resolve(SundayConfig::default());
    let trimming = shop.trimming.clone().resolve(TrimmingConfig::default());
    let is_large = is_large_shop(&shop.name);

    let mut shop = shop;
    if is_large {
        // Large shops never operate solo, regardless of the raw flag.
        shop.can_be_solo = false;
    }

    NormalizedShop {
        shop,
        staffing,
        sunday,
        trimming,
        is_large,
    }
}
