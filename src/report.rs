use chrono::{DateTime, Datelike, Local, NaiveDate};
use std::collections::BTreeMap;

use crate::config::MAX_SESSIONS_PER_MONTH;
use crate::parser::Session;
use crate::tracker::SessionTracker;

/// Linear projection of this month's usage from the pace so far.
#[derive(Debug, Clone, Copy)]
struct UsageProjection {
    daily_average: f64,
    projected_total: i64,
    remaining_budget: i64,
    remaining_days: u32,
}

fn project_usage(used: usize, now: DateTime<Local>) -> UsageProjection {
    // day() is 1-based, so the average never divides by zero
    let days_passed = now.day();
    let total_days = days_in_month(now);
    let daily_average = used as f64 / days_passed as f64;

    UsageProjection {
        daily_average,
        projected_total: (daily_average * total_days as f64).round() as i64,
        remaining_budget: MAX_SESSIONS_PER_MONTH as i64 - used as i64,
        remaining_days: total_days - days_passed,
    }
}

/// Days in the local calendar month containing `now`.
fn days_in_month(now: DateTime<Local>) -> u32 {
    let (year, month) = (now.year(), now.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("first of month is always valid");

    first_of_next
        .pred_opt()
        .expect("last day of month is always valid")
        .day()
}

fn usage_icon(percentage: i64) -> &'static str {
    if percentage >= 90 {
        "🔴"
    } else if percentage >= 70 {
        "🟡"
    } else {
        "🟢"
    }
}

fn format_hm(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Current-month usage, projection and active session.
pub fn show_status(tracker: &SessionTracker, now: DateTime<Local>) {
    let used = tracker.current_month_sessions(now).len();

    println!("🤖 Claude Code session usage\n");

    let percentage = (used as f64 / MAX_SESSIONS_PER_MONTH as f64 * 100.0).round() as i64;
    println!(
        "{} This month: {}/{} sessions ({}%)",
        usage_icon(percentage),
        used,
        MAX_SESSIONS_PER_MONTH,
        percentage
    );

    let projection = project_usage(used, now);
    if projection.remaining_days > 0 {
        let icon = if projection.projected_total > MAX_SESSIONS_PER_MONTH as i64 {
            "⚠️"
        } else {
            "✅"
        };
        println!(
            "{} Projected month end: {} sessions (current pace: {:.1}/day)",
            icon, projection.projected_total, projection.daily_average
        );
    }

    match tracker.current_session(now) {
        Some(session) => {
            let elapsed = (now - session.start_time).num_minutes();
            let remaining = (session.end_time - now).num_minutes();
            println!(
                "\n⏱️  Current session: {} elapsed ({} remaining)",
                format_hm(elapsed),
                format_hm(remaining)
            );
            println!("📁 Project: {}", session.project);
        }
        None => println!("\n⭕ No active session"),
    }

    println!();
}

/// Recent sessions grouped by local calendar day, oldest first.
pub fn show_history(tracker: &SessionTracker, now: DateTime<Local>, days: i64) {
    let recent = tracker.recent_sessions(now, days);

    println!("📅 Session history, last {} days\n", days);

    if recent.is_empty() {
        println!("No sessions");
        return;
    }

    let mut by_date: BTreeMap<NaiveDate, Vec<&Session>> = BTreeMap::new();
    for session in recent {
        by_date
            .entry(session.start_time.date_naive())
            .or_default()
            .push(session);
    }

    for (date, sessions) in by_date {
        println!("{}: {} sessions", date.format("%a %Y-%m-%d"), sessions.len());
        for session in sessions {
            let project = session.project.rsplit('/').next().unwrap_or(&session.project);
            println!("  {} - {}", session.start_time.format("%H:%M"), project);
        }
        println!();
    }
}

/// Month-end projection with a recommended daily pace.
pub fn show_prediction(tracker: &SessionTracker, now: DateTime<Local>) {
    let used = tracker.current_month_sessions(now).len();

    println!("📊 Usage projection\n");

    if used == 0 {
        println!("No data for this month");
        return;
    }

    let projection = project_usage(used, now);
    println!("Daily average: {:.1} sessions", projection.daily_average);
    println!("Projected month end: {} sessions", projection.projected_total);

    if projection.remaining_days > 0 {
        let recommended = projection.remaining_budget as f64 / projection.remaining_days as f64;
        println!(
            "\n{} sessions left over {} days",
            projection.remaining_budget, projection.remaining_days
        );
        println!("Recommended pace: at most {:.1} sessions/day", recommended);
    }

    if projection.projected_total > MAX_SESSIONS_PER_MONTH as i64 {
        println!("\n⚠️  At the current pace you may hit the monthly limit");
    } else {
        println!("\n✅ Current pace is safe");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn days_in_month_handles_february_and_december() {
        let feb = Local.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        assert_eq!(days_in_month(feb), 28);

        let leap_feb = Local.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        assert_eq!(days_in_month(leap_feb), 29);

        let dec = Local.with_ymd_and_hms(2026, 12, 10, 12, 0, 0).unwrap();
        assert_eq!(days_in_month(dec), 31);
    }

    #[test]
    fn projection_matches_linear_pace() {
        // 2 sessions by the 10th of a 31-day month
        let now = Local.with_ymd_and_hms(2026, 8, 10, 12, 0, 0).unwrap();
        let projection = project_usage(2, now);

        assert!((projection.daily_average - 0.2).abs() < 1e-9);
        assert_eq!(projection.projected_total, 6); // round(0.2 * 31)
        assert_eq!(projection.remaining_budget, 48);
        assert_eq!(projection.remaining_days, 21);
    }

    #[test]
    fn no_days_remain_on_the_last_day_of_month() {
        let now = Local.with_ymd_and_hms(2026, 8, 31, 12, 0, 0).unwrap();
        assert_eq!(project_usage(10, now).remaining_days, 0);
    }

    #[test]
    fn usage_icon_tiers() {
        assert_eq!(usage_icon(95), "🔴");
        assert_eq!(usage_icon(90), "🔴");
        assert_eq!(usage_icon(72), "🟡");
        assert_eq!(usage_icon(40), "🟢");
    }

    #[test]
    fn format_hm_splits_minutes() {
        assert_eq!(format_hm(83), "1h 23m");
        assert_eq!(format_hm(0), "0h 0m");
        assert_eq!(format_hm(300), "5h 0m");
    }
}
