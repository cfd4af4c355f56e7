use std::time::Duration;

use chrono::{Datelike, Local, NaiveDateTime, NaiveTime, Timelike};

use crate::config::ScheduleConfig;

const SECONDS_PER_DAY: u64 = 86_400;

/// Source of "now" for schedule decisions, injected so window logic is
/// deterministic under test.
pub trait Clock: Send {
	fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone.
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> NaiveDateTime {
		Local::now().naive_local()
	}
}

/// Decide whether traffic generation is permitted at `now`.
///
/// No schedule at all means no traffic (the caller is expected to stop the
/// loop rather than spin). A continuous schedule is always open. Otherwise
/// the weekday must be listed and the time of day must fall inside
/// [start_time, end_time], both ends inclusive.
pub fn is_scheduled(schedule: Option<&ScheduleConfig>, now: NaiveDateTime) -> bool {
	let Some(schedule) = schedule else {
		return false;
	};
	if schedule.continuous {
		return true;
	}
	schedule.days.contains(&now.weekday())
		&& schedule.start_time <= now.time()
		&& now.time() <= schedule.end_time
}

/// Delay until the daily window next opens, considering only the
/// time-of-day cycle.
///
/// Inside the window the wait is zero; before it, the wait reaches the
/// same-day start; past it, the wait wraps to tomorrow's start. Day-of-week
/// eligibility is not consulted here, so a wake-up may land on an ineligible
/// day; callers re-evaluate `is_scheduled` after sleeping instead of
/// trusting the wait.
pub fn wait_until_window(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> Duration {
	let now_s = u64::from(now.num_seconds_from_midnight());
	let start_s = u64::from(start.num_seconds_from_midnight());
	let end_s = u64::from(end.num_seconds_from_midnight());

	let wait_s = if start_s <= now_s && now_s <= end_s {
		0
	} else if now_s < start_s {
		start_s - now_s
	} else {
		(SECONDS_PER_DAY - now_s) + start_s
	};
	Duration::from_secs(wait_s)
}
