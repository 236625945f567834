// ============================================================================
// VIEW QUERY - Pure filter/search/sort engine over the in-memory parcel list
// ============================================================================
// One function, `apply_view`, replaces the near-duplicate filter logic the
// dashboards used to carry. It is a full re-run on every change; the returned
// vector is the derived view, the caller keeps the unfiltered source cache.
// ============================================================================

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::location::UNKNOWN_FIELD;
use crate::models::parcel::{Parcel, ParcelStatus, UNKNOWN_COURIER};

/// Status predicate. `All` (the UI's "ALL"/empty selection) bypasses the
/// predicate entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    #[default]
    Pending,
    PickedUp,
}

impl StatusFilter {
    pub fn matches(&self, status: ParcelStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == ParcelStatus::Pending,
            StatusFilter::PickedUp => status == ParcelStatus::PickedUp,
        }
    }

    pub fn from_value(value: &str) -> Self {
        match value {
            "PENDING" => StatusFilter::Pending,
            "PICKED_UP" => StatusFilter::PickedUp,
            _ => StatusFilter::All,
        }
    }

    pub fn as_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Pending => "PENDING",
            StatusFilter::PickedUp => "PICKED_UP",
        }
    }
}

/// Cutoff window relative to wall-clock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    AllTime,
    Today,
    Week,
    Month,
}

impl DateRange {
    pub fn from_value(value: &str) -> Self {
        match value {
            "today" => DateRange::Today,
            "week" => DateRange::Week,
            "month" => DateRange::Month,
            _ => DateRange::AllTime,
        }
    }

    pub fn as_value(&self) -> &'static str {
        match self {
            DateRange::AllTime => "",
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
        }
    }

    /// True when `created` falls inside the window ending at `now`. "Today"
    /// is the calendar day of `now` in its own timezone; week and month are
    /// rolling windows, unaffected by the day boundary.
    fn contains<Tz: TimeZone>(&self, created: Option<DateTime<Utc>>, now: &DateTime<Tz>) -> bool {
        match self {
            DateRange::AllTime => true,
            DateRange::Today => created
                .map(|t| t.with_timezone(&now.timezone()).date_naive() == now.date_naive())
                .unwrap_or(false),
            DateRange::Week => created
                .map(|t| t >= (now.clone() - Duration::days(7)).with_timezone(&Utc))
                .unwrap_or(false),
            DateRange::Month => created
                .map(|t| t >= (now.clone() - Duration::days(30)).with_timezone(&Utc))
                .unwrap_or(false),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CreatedAt,
    StudentName,
    TrackingId,
    Courier,
    Status,
}

impl SortKey {
    pub fn from_value(value: &str) -> Self {
        match value {
            "studentName" => SortKey::StudentName,
            "trackingId" => SortKey::TrackingId,
            "courier" => SortKey::Courier,
            "status" => SortKey::Status,
            _ => SortKey::CreatedAt,
        }
    }

    pub fn as_value(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "createdAt",
            SortKey::StudentName => "studentName",
            SortKey::TrackingId => "trackingId",
            SortKey::Courier => "courier",
            SortKey::Status => "status",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    // Newest first.
    fn default() -> Self {
        SortOrder::Desc
    }
}

impl SortOrder {
    pub fn from_value(value: &str) -> Self {
        match value {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_value(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Page-local filter/search/sort configuration. Not persisted; `default()` is
/// the cleared state (status = PENDING, newest first, everything else empty).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewQuery {
    pub status: StatusFilter,
    pub block: String,
    pub courier: String,
    pub date_range: DateRange,
    pub search: String,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

/// Apply filters, search and sort in order and return the derived view.
/// Equal sort keys keep whatever order the comparator primitive gives them;
/// no tie-break is guaranteed.
pub fn apply_view<Tz: TimeZone>(parcels: &[Parcel], query: &ViewQuery, now: DateTime<Tz>) -> Vec<Parcel> {
    let needle = query.search.trim().to_lowercase();

    let mut filtered: Vec<Parcel> = parcels
        .iter()
        .filter(|p| query.status.matches(p.status))
        .filter(|p| query.block.is_empty() || p.location.block == query.block)
        .filter(|p| query.courier.is_empty() || p.courier == query.courier)
        .filter(|p| query.date_range.contains(p.created_at, &now))
        .filter(|p| needle.is_empty() || matches_search(p, &needle))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = match query.sort_by {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::StudentName => key(&a.student_name).cmp(&key(&b.student_name)),
            SortKey::TrackingId => key(&a.tracking_id).cmp(&key(&b.tracking_id)),
            SortKey::Courier => key(&a.courier).cmp(&key(&b.courier)),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    filtered
}

/// Case-insensitive substring match over name, tracking id, courier, room
/// and block.
fn matches_search(parcel: &Parcel, needle: &str) -> bool {
    [
        &parcel.student_name,
        &parcel.tracking_id,
        &parcel.courier,
        &parcel.location.room,
        &parcel.location.block,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn key(value: &str) -> String {
    value.to_lowercase()
}

/// Distinct dropdown options derived from the fetched data, placeholder
/// values excluded.
pub fn filter_choices(parcels: &[Parcel]) -> (Vec<String>, Vec<String>) {
    let mut blocks: Vec<String> = parcels
        .iter()
        .map(|p| p.location.block.clone())
        .filter(|b| !b.is_empty() && b != UNKNOWN_FIELD)
        .collect();
    blocks.sort();
    blocks.dedup();

    let mut couriers: Vec<String> = parcels
        .iter()
        .map(|p| p.courier.clone())
        .filter(|c| !c.is_empty() && c != UNKNOWN_COURIER)
        .collect();
    couriers.sort();
    couriers.dedup();

    (blocks, couriers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::ParcelLocation;
    use chrono::FixedOffset;

    fn parcel(
        id: u64,
        name: &str,
        block: &str,
        courier: &str,
        status: ParcelStatus,
        created_days_ago: i64,
        now: DateTime<Utc>,
    ) -> Parcel {
        Parcel {
            id,
            student_name: name.to_string(),
            location: ParcelLocation::new("204", block, None),
            tracking_id: format!("HPM-{}", id),
            courier: courier.to_string(),
            status,
            created_at: Some(now - Duration::days(created_days_ago)),
            picked_up_time: None,
            image_url: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn sample() -> Vec<Parcel> {
        let now = now();
        vec![
            parcel(1, "Asha Rao", "A Block", "BlueDart", ParcelStatus::Pending, 0, now),
            parcel(2, "Dev Patel", "B Block", "Amazon", ParcelStatus::PickedUp, 2, now),
            parcel(3, "Meera Iyer", "A Block", "FedEx", ParcelStatus::Pending, 10, now),
            parcel(4, "Rohan Das", "C Block", "Amazon", ParcelStatus::Pending, 40, now),
        ]
    }

    #[test]
    fn status_all_is_a_no_op_predicate() {
        let parcels = sample();
        let query = ViewQuery {
            status: StatusFilter::All,
            ..ViewQuery::default()
        };
        assert_eq!(apply_view(&parcels, &query, now()).len(), parcels.len());
        assert_eq!(StatusFilter::from_value(""), StatusFilter::All);
        assert_eq!(StatusFilter::from_value("ALL"), StatusFilter::All);
    }

    #[test]
    fn default_query_returns_pending_newest_first() {
        let parcels = sample();
        let view = apply_view(&parcels, &ViewQuery::default(), now());
        let ids: Vec<u64> = view.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert!(view.iter().all(|p| p.status == ParcelStatus::Pending));
    }

    #[test]
    fn block_and_courier_predicates_are_exact() {
        let parcels = sample();
        let query = ViewQuery {
            status: StatusFilter::All,
            block: "A Block".to_string(),
            ..ViewQuery::default()
        };
        let ids: Vec<u64> = apply_view(&parcels, &query, now()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let query = ViewQuery {
            status: StatusFilter::All,
            courier: "Amazon".to_string(),
            ..ViewQuery::default()
        };
        let ids: Vec<u64> = apply_view(&parcels, &query, now()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn date_range_cutoffs_exclude_older_parcels() {
        let parcels = sample();
        let base = ViewQuery {
            status: StatusFilter::All,
            ..ViewQuery::default()
        };

        let today = ViewQuery { date_range: DateRange::Today, ..base.clone() };
        assert_eq!(apply_view(&parcels, &today, now()).len(), 1);

        let week = ViewQuery { date_range: DateRange::Week, ..base.clone() };
        assert_eq!(apply_view(&parcels, &week, now()).len(), 2);

        let month = ViewQuery { date_range: DateRange::Month, ..base };
        assert_eq!(apply_view(&parcels, &month, now()).len(), 3);
    }

    #[test]
    fn today_follows_the_calendar_day_of_the_given_clock() {
        // 20:00 on 14 Mar in UTC-7, which is already 15 Mar in UTC
        let tz = FixedOffset::west_opt(7 * 3600).unwrap();
        let now_local = tz.with_ymd_and_hms(2025, 3, 14, 20, 0, 0).unwrap();
        let parcels = vec![
            // 15:00 local on 14 Mar: same local day, despite the UTC date
            parcel(1, "Asha Rao", "A Block", "BlueDart", ParcelStatus::Pending, 0,
                   Utc.with_ymd_and_hms(2025, 3, 14, 22, 0, 0).unwrap()),
            // 15:00 local on 13 Mar: previous local day
            parcel(2, "Dev Patel", "B Block", "Amazon", ParcelStatus::Pending, 0,
                   Utc.with_ymd_and_hms(2025, 3, 13, 22, 0, 0).unwrap()),
        ];
        let query = ViewQuery {
            status: StatusFilter::All,
            date_range: DateRange::Today,
            ..ViewQuery::default()
        };
        let ids: Vec<u64> = apply_view(&parcels, &query, now_local)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let parcels = sample();
        let base = ViewQuery {
            status: StatusFilter::All,
            ..ViewQuery::default()
        };

        for (needle, expected) in [
            ("asha", vec![1]),          // student name
            ("hpm-3", vec![3]),         // tracking id
            ("AMAZON", vec![2, 4]),     // courier
            ("b block", vec![2]),       // block
            ("204", vec![1, 2, 3, 4]),  // room
        ] {
            let query = ViewQuery { search: needle.to_string(), ..base.clone() };
            let ids: Vec<u64> = apply_view(&parcels, &query, now()).iter().map(|p| p.id).collect();
            assert_eq!(ids, expected, "search {:?}", needle);
        }
    }

    #[test]
    fn sort_direction_reverses_order() {
        let parcels = sample();
        let desc = ViewQuery {
            status: StatusFilter::All,
            ..ViewQuery::default()
        };
        let asc = ViewQuery { sort_order: SortOrder::Asc, ..desc.clone() };

        let newest_first: Vec<u64> = apply_view(&parcels, &desc, now()).iter().map(|p| p.id).collect();
        let oldest_first: Vec<u64> = apply_view(&parcels, &asc, now()).iter().map(|p| p.id).collect();
        assert_eq!(newest_first, vec![1, 2, 3, 4]);
        assert_eq!(oldest_first, vec![4, 3, 2, 1]);
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let parcels = sample();
        let query = ViewQuery {
            status: StatusFilter::All,
            sort_by: SortKey::StudentName,
            sort_order: SortOrder::Asc,
            ..ViewQuery::default()
        };
        let names: Vec<String> = apply_view(&parcels, &query, now())
            .iter()
            .map(|p| p.student_name.clone())
            .collect();
        assert_eq!(names, vec!["Asha Rao", "Dev Patel", "Meera Iyer", "Rohan Das"]);
    }

    #[test]
    fn empty_input_yields_empty_view() {
        assert!(apply_view(&[], &ViewQuery::default(), now()).is_empty());
    }

    #[test]
    fn choices_exclude_placeholders_and_dedupe() {
        let mut parcels = sample();
        parcels.push(parcel(5, "X", "N/A", UNKNOWN_COURIER, ParcelStatus::Pending, 0, now()));
        let (blocks, couriers) = filter_choices(&parcels);
        assert_eq!(blocks, vec!["A Block", "B Block", "C Block"]);
        assert_eq!(couriers, vec!["Amazon", "BlueDart", "FedEx"]);
    }
}
