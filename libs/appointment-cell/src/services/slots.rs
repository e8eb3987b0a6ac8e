use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::SlotView;

pub const DAY_START_HOUR: u32 = 9;
pub const DAY_END_HOUR: u32 = 17;
pub const SLOT_MINUTES: i64 = 30;

/// Grid points `09:00 <= t < 17:00` in 30-minute steps.
pub fn canonical_slots(date: NaiveDate) -> Vec<NaiveDateTime> {
    let (Some(start), Some(end)) = (
        NaiveTime::from_hms_opt(DAY_START_HOUR, 0, 0),
        NaiveTime::from_hms_opt(DAY_END_HOUR, 0, 0),
    ) else {
        return Vec::new();
    };

    let end = date.and_time(end);
    let mut slots = Vec::new();
    let mut current = date.and_time(start);
    while current < end {
        slots.push(current);
        current += Duration::minutes(SLOT_MINUTES);
    }
    slots
}

/// Marks grid points taken by `booked` and appends any booked timestamps that
/// miss the grid. Advisory only: booking never consults it.
pub fn day_grid(date: NaiveDate, booked: &[NaiveDateTime]) -> Vec<SlotView> {
    let grid = canonical_slots(date);

    let mut views: Vec<SlotView> = grid
        .iter()
        .map(|slot| view(*slot, !booked.contains(slot), true))
        .collect();

    views.extend(
        booked
            .iter()
            .filter(|taken| taken.date() == date && !grid.contains(taken))
            .map(|taken| view(*taken, false, false)),
    );

    views.sort_by(|a, b| a.appointment_date.cmp(&b.appointment_date));
    views.dedup_by(|a, b| a.appointment_date == b.appointment_date);
    views
}

fn view(at: NaiveDateTime, available: bool, on_grid: bool) -> SlotView {
    SlotView {
        time: at.format("%H:%M").to_string(),
        appointment_date: at,
        available,
        on_grid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn grid_has_sixteen_half_hour_slots() {
        let slots = canonical_slots(date());
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].format("%H:%M").to_string(), "09:00");
        assert_eq!(slots[15].format("%H:%M").to_string(), "16:30");
    }

    #[test]
    fn booked_and_off_grid_slots_are_unavailable() {
        let booked = vec![
            date().and_hms_opt(9, 0, 0).unwrap(),
            date().and_hms_opt(10, 15, 0).unwrap(),
        ];
        let grid = day_grid(date(), &booked);

        assert_eq!(grid.len(), 17);
        assert!(!grid[0].available);
        assert!(grid[1].available);

        let off_grid = grid.iter().find(|s| !s.on_grid).unwrap();
        assert_eq!(off_grid.time, "10:15");
        assert!(!off_grid.available);
        assert_eq!(grid.iter().filter(|s| s.available).count(), 15);
    }
}
