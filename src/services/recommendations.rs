use crate::domain::forecast::{Priority, Recommendation, RecommendationKind};
use crate::domain::params::ForecastParams;
use crate::domain::terminal::{TerminalLimits, TerminalProfile};
use crate::services::congestion_scoring::PeakMetrics;

const LPG_QUEUE_TRIGGER: u32 = 3;
const LPG_WAIT_SAVING_MIN: i64 = 15;

/// Applies the operational rule set and returns the triggered
/// recommendations, high priority first.
///
/// The LPG bay reservation is always part of the result; only its
/// priority depends on occupancy.
pub fn recommend(
    peaks: &PeakMetrics,
    params: &ForecastParams,
    limits: &TerminalLimits,
    profile: &TerminalProfile,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if peaks.outside > limits.outside() * 0.65 {
        let cap_to = ((limits.bays() / 6.0).round() as i64).max(3);
        let reduction = (peaks.outside * 0.35).round() as i64;
        recs.push(Recommendation {
            id: "slot_cap".to_string(),
            kind: RecommendationKind::SlotCap,
            title: format!("Cap next slot to {cap_to} trucks"),
            description: format!(
                "Reduce the next 30-min booking window from the current load to {cap_to} trucks to prevent the outside queue from breaching the {}-truck limit.",
                limits.outside_queue_limit
            ),
            impact: format!("-{reduction} trucks outside"),
            impact_value: reduction,
            priority: Priority::High,
        });
    }

    if params.docs_delay_pct > 15.0 {
        let saving = (params.docs_delay_fraction() * profile.docs_delayed_min * 0.55).round() as i64;
        recs.push(Recommendation {
            id: "docs_preclear".to_string(),
            kind: RecommendationKind::DocsPreclear,
            title: "Pre-clear docs for next arrivals".to_string(),
            description: "Call top clients 2 h before their slot to confirm EX-Bond, Delivery Order and e-Way Bill are ready. Focus on clients with historically high rejection rates.".to_string(),
            impact: format!("-{saving} min avg turnaround"),
            impact_value: saving,
            priority: if params.docs_delay_pct > 30.0 {
                Priority::High
            } else {
                Priority::Medium
            },
        });
    }

    if peaks.inside > limits.inside() * 0.65 {
        let reduction = (peaks.inside * 0.30).round() as i64;
        recs.push(Recommendation {
            id: "shift_trucks".to_string(),
            kind: RecommendationKind::ShiftTrucks,
            title: "Shift 3-4 trucks to off-peak slot".to_string(),
            description: "Offer the 06:00-08:00 or post-17:30 slot to 3-4 trucks booked in the busiest window. Incentivise with priority bay assignment.".to_string(),
            impact: format!("-{reduction} trucks inside yard"),
            impact_value: reduction,
            priority: Priority::Medium,
        });
    }

    let lpg_bays = profile.lpg_bays();
    recs.push(Recommendation {
        id: "lpg_priority".to_string(),
        kind: RecommendationKind::BayPriority,
        title: format!("Reserve LPG bays when LPG queue > {LPG_QUEUE_TRIGGER}"),
        description: format!(
            "Lock all {lpg_bays} LPG bays exclusively for LPG trucks when the LPG queue exceeds {LPG_QUEUE_TRIGGER} so POL/chemical trucks cannot block LPG flow."
        ),
        impact: format!("-{LPG_WAIT_SAVING_MIN} min avg LPG truck wait"),
        impact_value: LPG_WAIT_SAVING_MIN,
        priority: if peaks.occupancy_pct > 85.0 {
            Priority::High
        } else {
            Priority::Low
        },
    });

    // stable, so equal priorities keep rule order
    recs.sort_by_key(|rec| rec.priority);
    recs
}
