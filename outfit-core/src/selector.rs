//! Picks the morning, noon and afternoon points of the next relevant day.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use tracing::debug;

use crate::{
    error::{Error, Result},
    model::{DayPart, DaySelection, ForecastPoint},
};

/// How a forecast point is matched to a target hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMatch {
    /// The local hour must equal the target hour.
    ExactHour,
    /// The closest point within `within_minutes` of the target hour. Used for
    /// feeds on a coarse UTC grid that rarely lands on a local full hour.
    Nearest { within_minutes: u32 },
}

/// Which day and which local hours to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Past this local hour today's forecast is skipped in favour of tomorrow's.
    pub cutoff_hour: u32,
    pub morning_hour: u32,
    pub noon_hour: u32,
    pub afternoon_hour: u32,
    pub slot_match: SlotMatch,
}

impl SelectionPolicy {
    pub fn hour_of(&self, part: DayPart) -> u32 {
        match part {
            DayPart::Morning => self.morning_hour,
            DayPart::Noon => self.noon_hour,
            DayPart::Afternoon => self.afternoon_hour,
        }
    }

    /// Distance in minutes between a local time of day and the slot's target
    /// hour, or `None` when the point does not qualify for the slot.
    fn distance<T: Timelike>(&self, part: DayPart, local: &T) -> Option<u32> {
        let target = self.hour_of(part);
        match self.slot_match {
            SlotMatch::ExactHour => (local.hour() == target).then_some(0),
            SlotMatch::Nearest { within_minutes } => {
                let minutes = local.hour() * 60 + local.minute();
                let distance = minutes.abs_diff(target * 60);
                (distance <= within_minutes).then_some(distance)
            }
        }
    }

    /// Today, or tomorrow once the cutoff hour has passed.
    pub fn target_day<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> NaiveDate {
        let today = now.date_naive();
        if now.hour() > self.cutoff_hour {
            today.succ_opt().unwrap_or(today)
        } else {
            today
        }
    }
}

/// Filter `points` down to the target day's three representative observations.
///
/// Local dates and hours are taken in the time zone of `now`. Each slot keeps
/// its closest point; on a tie the first one wins.
pub fn select_day<Tz: TimeZone>(
    points: &[ForecastPoint],
    now: &DateTime<Tz>,
    policy: &SelectionPolicy,
) -> Result<DaySelection> {
    let day = policy.target_day(now);
    let tz = now.timezone();

    let mut slots: BTreeMap<DayPart, (u32, &ForecastPoint)> = BTreeMap::new();
    for point in points {
        let local = point.time.with_timezone(&tz);
        if local.date_naive() != day {
            continue;
        }
        for part in DayPart::all() {
            let Some(distance) = policy.distance(part, &local) else {
                continue;
            };
            match slots.get(&part) {
                Some((best, _)) if *best <= distance => {}
                _ => {
                    slots.insert(part, (distance, point));
                }
            }
        }
    }

    debug!(%day, matched = slots.len(), total = points.len(), "selected forecast points");

    match (
        slots.get(&DayPart::Morning),
        slots.get(&DayPart::Noon),
        slots.get(&DayPart::Afternoon),
    ) {
        (Some((_, morning)), Some((_, noon)), Some((_, afternoon))) => Ok(DaySelection {
            day,
            morning: (*morning).clone(),
            noon: (*noon).clone(),
            afternoon: (*afternoon).clone(),
        }),
        _ => {
            let missing = DayPart::all()
                .into_iter()
                .filter(|part| !slots.contains_key(part))
                .map(|part| format!("{} ({:02}:00)", part.as_str(), policy.hour_of(part)))
                .collect::<Vec<_>>()
                .join(", ");
            Err(Error::InsufficientData { day, missing })
        }
    }
}
