//! Daily-streak growth tracker.
//!
//! A tree grows one stage per active calendar day. Stage 30 matures the tree:
//! `total_trees` goes up by one and the stage resets to a seed (0).
//!
//! # Decay
//!
//! One skipped day is forgiven. From the second skipped day on, each extra
//! day costs a stage:
//!
//! | days since last activity | penalty |
//! |--------------------------|---------|
//! | 1 (consecutive)          | 0       |
//! | 2 (one day skipped)      | 0       |
//! | 3                        | 1       |
//! | n ≥ 3                    | n − 2   |
//!
//! The penalty is applied first (floored at 0), then the day's +1.
//!
//! Calendar days are computed in a fixed UTC offset given by
//! [`CalendarPolicy`], never the host's local zone.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::StoreError;
use crate::models::{GrowthState, Millis, DAY_MS};

/// Stage at which a tree matures.
pub const MAX_STAGE: u32 = 30;

/// Days between activities that cost nothing.
const GRACE_DAYS: i64 = 2;

/// Maps instants to calendar days in one fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarPolicy {
    offset: FixedOffset,
}

impl Default for CalendarPolicy {
    fn default() -> Self {
        Self::utc()
    }
}

impl CalendarPolicy {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// `None` when the offset is outside ±24h.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    pub fn date_of(&self, at: Millis) -> NaiveDate {
        DateTime::from_timestamp_millis(at)
            .unwrap_or_default()
            .with_timezone(&self.offset)
            .date_naive()
    }

    /// Whole calendar days from `earlier` to `later` (negative if reversed).
    pub fn days_between(&self, earlier: Millis, later: Millis) -> i64 {
        (self.date_of(later) - self.date_of(earlier)).num_days()
    }
}

/// What a [`check_daily_growth`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthChange {
    /// First activity ever: stage 1.
    Planted,
    /// Already recorded today.
    SameDay,
    /// `now` is on an earlier calendar day than the last activity.
    ClockSkew { days: i64 },
    Grew {
        days: i64,
        decay: u32,
        stage: u32,
        matured: bool,
    },
}

impl GrowthChange {
    pub fn changed_state(&self) -> bool {
        matches!(self, GrowthChange::Planted | GrowthChange::Grew { .. })
    }
}

/// Record activity at `now`. At most one change per calendar day.
pub fn check_daily_growth(
    growth: &mut GrowthState,
    now: Millis,
    calendar: &CalendarPolicy,
) -> GrowthChange {
    if growth.last_activity_date == 0 {
        *growth = GrowthState {
            total_trees: 0,
            current_stage: 1,
            last_activity_date: now,
        };
        return GrowthChange::Planted;
    }

    let days = calendar.days_between(growth.last_activity_date, now);
    if days == 0 {
        return GrowthChange::SameDay;
    }
    if days < 0 {
        return GrowthChange::ClockSkew { days };
    }

    let decay = if days > GRACE_DAYS {
        u32::try_from(days - GRACE_DAYS).unwrap_or(u32::MAX)
    } else {
        0
    };
    let mut stage = growth.current_stage.saturating_sub(decay);
    stage = stage.saturating_add(1).min(MAX_STAGE);

    let matured = stage >= MAX_STAGE;
    if matured {
        growth.total_trees += 1;
        stage = 0;
    }
    growth.current_stage = stage;
    growth.last_activity_date = now;

    GrowthChange::Grew {
        days,
        decay,
        stage,
        matured,
    }
}

/// Overwrite the growth block, backdating the last activity by `days_ago`.
/// Used to simulate decay and maturity without waiting real days.
///
/// `days_ago` must be non-negative and land after the epoch, since a zero
/// `last_activity_date` means the tree was never planted.
pub fn debug_growth(
    stage: u32,
    total_trees: u32,
    days_ago: i64,
    now: Millis,
) -> Result<GrowthState, StoreError> {
    let last_activity_date = days_ago
        .checked_mul(DAY_MS)
        .and_then(|span| now.checked_sub(span))
        .filter(|at| days_ago >= 0 && *at > 0)
        .ok_or_else(|| StoreError::InvalidValue {
            field: "days_ago".to_string(),
            value: days_ago.to_string(),
        })?;
    Ok(GrowthState {
        total_trees,
        current_stage: stage.min(MAX_STAGE),
        last_activity_date,
    })
}

/// Pull a growth block read from outside (backup, hand-edited state) back
/// into range.
pub fn clamp_growth(mut growth: GrowthState) -> GrowthState {
    growth.current_stage = growth.current_stage.min(MAX_STAGE);
    growth.last_activity_date = growth.last_activity_date.max(0);
    growth
}

/// Named phase of the current tree, by stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthPhase {
    /// Stages 0..5.
    Sprout,
    /// Stages 5..15.
    Sapling,
    /// Stages 15..25.
    YoungTree,
    /// Stage 25 and up.
    Maturing,
}

impl GrowthPhase {
    pub fn of_stage(stage: u32) -> Self {
        match stage {
            0..=4 => GrowthPhase::Sprout,
            5..=14 => GrowthPhase::Sapling,
            15..=24 => GrowthPhase::YoungTree,
            _ => GrowthPhase::Maturing,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GrowthPhase::Sprout => "Sprout Phase",
            GrowthPhase::Sapling => "Sapling Phase",
            GrowthPhase::YoungTree => "Young Tree",
            GrowthPhase::Maturing => "Maturing Tree",
        }
    }
}

/// Forest score: 100 per grown tree plus the current stage.
pub fn richness(growth: &GrowthState) -> u64 {
    u64::from(growth.total_trees) * 100 + u64::from(growth.current_stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-10T12:00:00Z
    const NOON: Millis = 1_710_072_000_000;

    fn grown(stage: u32, trees: u32, days_ago: i64) -> GrowthState {
        debug_growth(stage, trees, days_ago, NOON).unwrap()
    }

    #[test]
    fn test_first_activity_plants_seed() {
        let mut g = GrowthState::default();
        let change = check_daily_growth(&mut g, NOON, &CalendarPolicy::utc());
        assert_eq!(change, GrowthChange::Planted);
        assert_eq!(g.current_stage, 1);
        assert_eq!(g.total_trees, 0);
        assert_eq!(g.last_activity_date, NOON);
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let cal = CalendarPolicy::utc();
        let mut g = grown(5, 1, 1);
        check_daily_growth(&mut g, NOON, &cal);
        let after_first = g;
        let change = check_daily_growth(&mut g, NOON + 3 * 3_600_000, &cal);
        assert_eq!(change, GrowthChange::SameDay);
        assert_eq!(g, after_first);
    }

    #[test]
    fn test_consecutive_day_grows_one_stage() {
        let mut g = grown(7, 0, 1);
        check_daily_growth(&mut g, NOON, &CalendarPolicy::utc());
        assert_eq!(g.current_stage, 8);
        assert_eq!(g.last_activity_date, NOON);
    }

    #[test]
    fn test_one_skipped_day_is_forgiven() {
        let mut g = grown(7, 0, 2);
        check_daily_growth(&mut g, NOON, &CalendarPolicy::utc());
        assert_eq!(g.current_stage, 8);
    }

    #[test]
    fn test_four_day_gap_costs_two_stages() {
        let mut g = grown(10, 0, 4);
        let change = check_daily_growth(&mut g, NOON, &CalendarPolicy::utc());
        assert_eq!(
            change,
            GrowthChange::Grew {
                days: 4,
                decay: 2,
                stage: 9,
                matured: false
            }
        );
        assert_eq!(g.current_stage, 9);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let mut g = grown(3, 2, 40);
        check_daily_growth(&mut g, NOON, &CalendarPolicy::utc());
        assert_eq!(g.current_stage, 1);
        assert_eq!(g.total_trees, 2);
    }

    #[test]
    fn test_stage_29_matures_tree() {
        let mut g = grown(29, 4, 1);
        let change = check_daily_growth(&mut g, NOON, &CalendarPolicy::utc());
        assert!(matches!(change, GrowthChange::Grew { matured: true, .. }));
        assert_eq!(g.current_stage, 0);
        assert_eq!(g.total_trees, 5);
    }

    #[test]
    fn test_backwards_clock_changes_nothing() {
        let mut g = GrowthState {
            total_trees: 0,
            current_stage: 4,
            last_activity_date: NOON,
        };
        let change = check_daily_growth(&mut g, NOON - 2 * DAY_MS, &CalendarPolicy::utc());
        assert_eq!(change, GrowthChange::ClockSkew { days: -2 });
        assert_eq!(g.current_stage, 4);
        assert_eq!(g.last_activity_date, NOON);
    }

    #[test]
    fn test_day_boundary_follows_configured_offset() {
        // 2024-03-10T23:30Z and 2024-03-11T00:30Z: different UTC days,
        // the same day in UTC-05:00.
        let late = NOON + 11 * 3_600_000 + 30 * 60_000;
        let early = late + 3_600_000;
        assert_eq!(CalendarPolicy::utc().days_between(late, early), 1);
        let eastern = CalendarPolicy::with_offset_minutes(-300).unwrap();
        assert_eq!(eastern.days_between(late, early), 0);
        assert_eq!(eastern.offset_minutes(), -300);
    }

    #[test]
    fn test_invalid_offset_rejected() {
        assert!(CalendarPolicy::with_offset_minutes(25 * 60).is_none());
    }

    #[test]
    fn test_debug_growth_backdates() {
        let g = debug_growth(12, 3, 5, NOON).unwrap();
        assert_eq!(g.current_stage, 12);
        assert_eq!(g.total_trees, 3);
        assert_eq!(g.last_activity_date, NOON - 5 * DAY_MS);
    }

    #[test]
    fn test_debug_growth_rejects_unrepresentable_days() {
        for days_ago in [i64::MAX / 1000, i64::MAX, -1, NOON / DAY_MS + 1] {
            assert!(
                matches!(
                    debug_growth(1, 0, days_ago, NOON),
                    Err(StoreError::InvalidValue { .. })
                ),
                "days_ago = {days_ago}"
            );
        }
    }

    #[test]
    fn test_debug_growth_cannot_land_on_never_planted() {
        let now = 3 * DAY_MS;
        assert!(debug_growth(4, 0, 3, now).is_err());
        assert_eq!(debug_growth(4, 0, 2, now).unwrap().last_activity_date, DAY_MS);
    }

    #[test]
    fn test_out_of_range_stage_does_not_overflow() {
        let mut g = GrowthState {
            total_trees: 1,
            current_stage: u32::MAX,
            last_activity_date: NOON - DAY_MS,
        };
        let change = check_daily_growth(&mut g, NOON, &CalendarPolicy::utc());
        assert!(matches!(change, GrowthChange::Grew { matured: true, .. }));
        assert_eq!(g.current_stage, 0);
        assert_eq!(g.total_trees, 2);
    }

    #[test]
    fn test_clamp_growth() {
        let g = clamp_growth(GrowthState {
            total_trees: 2,
            current_stage: 4_000_000_000,
            last_activity_date: -5,
        });
        assert_eq!(g.current_stage, MAX_STAGE);
        assert_eq!(g.last_activity_date, 0);
        assert_eq!(g.total_trees, 2);
    }

    #[test]
    fn test_phase_boundaries() {
        let phases: Vec<_> = [0, 4, 5, 14, 15, 24, 25, 30]
            .into_iter()
            .map(GrowthPhase::of_stage)
            .collect();
        use GrowthPhase::*;
        assert_eq!(
            phases,
            vec![Sprout, Sprout, Sapling, Sapling, YoungTree, YoungTree, Maturing, Maturing]
        );
        assert_eq!(GrowthPhase::of_stage(16).name(), "Young Tree");
    }

    #[test]
    fn test_richness_counts_trees_and_stage() {
        let g = GrowthState {
            total_trees: 3,
            current_stage: 17,
            last_activity_date: NOON,
        };
        assert_eq!(richness(&g), 317);
        assert_eq!(richness(&GrowthState::default()), 0);
    }
}
