//! Eligibility predicate for (employee, template) pairs: §4.4 of the
//! roster engine's constraint model.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};

use crate::domain::config_loader::NormalizedShop;
use crate::domain::entities::{
    Employee, LeaveRequest, PreviousWeekSundayShift, Shop, ShiftTemplate, ShopId,
};

pub struct EligibilityContext<'a> {
    pub week_start: NaiveDate,
    pub shops_by_id: HashMap<ShopId, &'a Shop>,
    pub active_shops_by_company: HashMap<String, Vec<ShopId>>,
    pub explicit_assignments: Vec<(u32, ShopId, bool)>,
    pub leave_days: HashMap<u32, HashSet<u8>>,
    pub fixed_days_off: HashMap<String, Vec<u8>>,
    pub excluded_employee_ids: HashSet<u32>,
    pub am_only_employee_names: HashSet<String>,
    /// (employee, shop) pairs that worked the previous week's Sunday at a
    /// day-in/day-out shop: Monday work there is blocked this week.
    pub day_in_day_out_blocks: HashSet<(u32, ShopId)>,
}

impl<'a> EligibilityContext<'a> {
    pub fn build(
        week_start: NaiveDate,
        shops: &'a [NormalizedShop],
        leave_requests: &[LeaveRequest],
        fixed_days_off: HashMap<String, Vec<u8>>,
        explicit_assignments: Vec<(u32, ShopId, bool)>,
        excluded_employee_ids: HashSet<u32>,
        am_only_employee_names: HashSet<String>,
        previous_week_sunday_shifts: &[PreviousWeekSundayShift],
    ) -> Self {
        let mut shops_by_id = HashMap::new();
        let mut active_shops_by_company: HashMap<String, Vec<ShopId>> = HashMap::new();
        for shop in shops {
            shops_by_id.insert(shop.shop.id, &shop.shop);
            if shop.shop.active {
                active_shops_by_company
                    .entry(shop.shop.company.clone())
                    .or_default()
                    .push(shop.shop.id);
            }
        }

        let mut leave_days: HashMap<u32, HashSet<u8>> = HashMap::new();
        for leave in leave_requests {
            if !leave.approved {
                continue;
            }
            leave_days
                .entry(leave.employee_id)
                .or_default()
                .extend(days_in_week(week_start, leave.start_date, leave.end_date));
        }

        let day_in_day_out_blocks = previous_week_sunday_shifts
            .iter()
            .filter(|s| {
                shops_by_id
                    .get(&s.shop_id)
                    .map(|shop| shop.day_in_day_out)
                    .unwrap_or(false)
            })
            .map(|s| (s.employee_id, s.shop_id))
            .collect();

        Self {
            week_start,
            shops_by_id,
            active_shops_by_company,
            explicit_assignments,
            leave_days,
            fixed_days_off,
            excluded_employee_ids,
            am_only_employee_names,
            day_in_day_out_blocks,
        }
    }

    pub fn is_eligible(&self, employee: &Employee, template: &ShiftTemplate) -> bool {
        if !employee.active || self.excluded_employee_ids.contains(&employee.id) {
            return false;
        }

        let shop = match self.shops_by_id.get(&template.shop_id) {
            Some(s) => *s,
            None => return false,
        };
        if !shop.active {
            return false;
        }

        if !self.shop_is_allowed(employee, shop.id) {
            return false;
        }

        if employee.company != "BOTH" && employee.company != shop.company {
            return false;
        }

        if let Some(days) = self.leave_days.get(&employee.id) {
            if days.contains(&template.day) {
                return false;
            }
        }

        let name_key = employee.name.trim().to_lowercase();
        if let Some(days) = self.fixed_days_off.get(&name_key) {
            if days.contains(&template.day) {
                return false;
            }
        }

        let is_am_only =
            employee.am_only || self.am_only_employee_names.contains(&name_key);
        if is_am_only && template.shift_type != crate::domain::entities::ShiftType::Am {
            return false;
        }

        if template.day == 0
            && self
                .day_in_day_out_blocks
                .contains(&(employee.id, shop.id))
        {
            return false;
        }

        true
    }

    fn shop_is_allowed(&self, employee: &Employee, shop_id: ShopId) -> bool {
        let mut allowed: HashSet<ShopId> = employee.primary_shop.into_iter().collect();
        allowed.extend(employee.secondary_shops.iter().copied());
        allowed.extend(
            self.explicit_assignments
                .iter()
                .filter(|(e, _, _)| *e == employee.id)
                .map(|(_, s, _)| *s),
        );

        if allowed.is_empty() {
            if let Some(company_shops) = self.active_shops_by_company.get(&employee.company) {
                return company_shops.contains(&shop_id);
            }
            return false;
        }

        allowed.contains(&shop_id)
    }
}

/// Day indices (0=Mon..6=Sun, relative to `week_start`) covered by the
/// inclusive `[start, end]` leave range.
fn days_in_week(week_start: NaiveDate, start: NaiveDate, end: NaiveDate) -> Vec<u8> {
    let mut days = Vec::new();
    for offset in 0..7u64 {
        let Some(day_date) = week_start.checked_add_days(Days::new(offset)) else {
            continue;
        };
        if day_date >= start && day_date <= end {
            days.push(offset as u8);
        }
    }
    days
}
