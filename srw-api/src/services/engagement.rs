//! Engagement estimation
//!
//! Estimates how many of a member's 2024 lives a viewer attended. The upstream
//! visit counter is all-time, so it is scaled against the member's 2024 live
//! count: four visits per live saturate the estimate at the full live count.
//! Trainee rooms skip the estimate and report the raw visit count.

use srw_common::{RoomId, TraineeIdSet};

/// Visits per 2024 live at which the estimate saturates
pub const VISITS_PER_LIVE: f64 = 4.0;

/// Fraction of `total_live_member` lives represented by `all_visit`, capped at 1
pub fn engagement_ratio(all_visit: u64, total_live_member: u64) -> f64 {
    if total_live_member == 0 {
        return 0.0;
    }
    (all_visit as f64 / (total_live_member as f64 * VISITS_PER_LIVE)).min(1.0)
}

/// Estimated 2024 visits for a non-trainee room
///
/// Always within `0..=total_live_member`.
pub fn estimate_visits(all_visit: u64, total_live_member: u64) -> u64 {
    let ratio = engagement_ratio(all_visit, total_live_member);
    let estimate = (total_live_member as f64 * ratio).ceil() as u64;
    estimate.min(total_live_member)
}

/// `visit_2024` for a fetched room
pub fn visit_2024(
    room_id: &RoomId,
    all_visit: u64,
    total_live_member: u64,
    trainees: &TraineeIdSet,
) -> u64 {
    if trainees.contains(room_id) {
        all_visit
    } else {
        estimate_visits(all_visit, total_live_member)
    }
}
