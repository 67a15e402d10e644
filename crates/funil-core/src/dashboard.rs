//! Dashboard aggregation.
//!
//! The database layer loads raw facts (one per in-range card, one per stored
//! custom value); everything computed from them lives here.

use crate::error::AppError;
use crate::models::{
    CustomFieldBreakdown, DailyCount, DashboardQuery, DashboardStats, FieldType, TagCount,
    ValueCount,
};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Tag names counted as pipeline buckets, in display order
pub const LEAD_BUCKETS: [&str; 5] = ["New", "Contacted", "Qualified", "Converted", "Lost"];

/// Largest allowed distance between `start` and `end`
pub const MAX_RANGE_DAYS: i64 = 366;

pub const DEFAULT_RECENT_LEADS: i64 = 10;
pub const MAX_RECENT_LEADS: i64 = 100;

/// Inclusive range of whole UTC days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::BadRequest(
                "start deve ser anterior ou igual a end".to_string(),
            ));
        }
        if (end - start).num_days() > MAX_RANGE_DAYS {
            return Err(AppError::BadRequest(format!(
                "Intervalo máximo é de {} dias",
                MAX_RANGE_DAYS
            )));
        }
        Ok(Self { start, end })
    }

    /// Build the range from query parameters.
    ///
    /// Explicit `start`/`end` win; a missing `end` means today and a missing
    /// `start` means `default_days` before `end`. Without either, the range is
    /// `today - days ..= today`.
    pub fn resolve(
        query: &DashboardQuery,
        today: NaiveDate,
        default_days: i64,
    ) -> Result<Self, AppError> {
        if query.start.is_some() || query.end.is_some() {
            let end = query.end.unwrap_or(today);
            let start = match query.start {
                Some(start) => start,
                None => days_before(end, default_days)?,
            };
            return Self::new(start, end);
        }

        let days = query.days.unwrap_or(default_days);
        if days < 0 {
            return Err(AppError::BadRequest("days deve ser >= 0".to_string()));
        }
        Self::new(days_before(today, days)?, today)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every day of the range, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Midnight UTC at the start of the range
    pub fn lower_bound(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Midnight UTC after the last day (exclusive bound)
    pub fn upper_bound(&self) -> DateTime<Utc> {
        let next = self
            .end
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX);
        next.and_time(NaiveTime::MIN).and_utc()
    }
}

fn days_before(day: NaiveDate, days: i64) -> Result<NaiveDate, AppError> {
    u64::try_from(days)
        .ok()
        .and_then(|d| day.checked_sub_days(Days::new(d)))
        .ok_or_else(|| AppError::BadRequest("Intervalo de datas inválido".to_string()))
}

/// A card created in the range, with the names of its tags
#[derive(Debug, Clone)]
pub struct LeadFact {
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// A stored custom value of a contact created in the range
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FieldValueFact {
    pub field_id: Uuid,
    pub field_name: String,
    pub field_type: FieldType,
    pub value: Option<String>,
}

fn bucket_of(tag: &str) -> Option<usize> {
    let tag = tag.trim();
    LEAD_BUCKETS
        .iter()
        .position(|bucket| bucket.eq_ignore_ascii_case(tag))
}

/// Compute dashboard statistics. Facts outside `range` are ignored.
pub fn aggregate(
    range: &DateRange,
    leads: &[LeadFact],
    values: &[FieldValueFact],
) -> DashboardStats {
    let mut buckets = [0i64; LEAD_BUCKETS.len()];
    let mut per_day: BTreeMap<NaiveDate, i64> = range.days().map(|d| (d, 0)).collect();
    let mut total = 0i64;

    for lead in leads {
        let day = lead.created_at.date_naive();
        if !range.contains(day) {
            continue;
        }
        total += 1;
        *per_day.entry(day).or_insert(0) += 1;

        let mut seen = [false; LEAD_BUCKETS.len()];
        for idx in lead.tags.iter().filter_map(|t| bucket_of(t)) {
            seen[idx] = true;
        }
        for (count, hit) in buckets.iter_mut().zip(seen) {
            if hit {
                *count += 1;
            }
        }
    }

    let conversion_rate = if total == 0 {
        0.0
    } else {
        buckets[3] as f64 / total as f64
    };

    DashboardStats {
        start: range.start,
        end: range.end,
        total_leads: total,
        new_leads: buckets[0],
        contacted_leads: buckets[1],
        qualified_leads: buckets[2],
        converted_leads: buckets[3],
        lost_leads: buckets[4],
        conversion_rate,
        leads_by_tag: LEAD_BUCKETS
            .iter()
            .zip(buckets)
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect(),
        leads_over_time: per_day
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect(),
        custom_field_breakdown: breakdown(values),
    }
}

fn breakdown(values: &[FieldValueFact]) -> Vec<CustomFieldBreakdown> {
    let mut fields: HashMap<Uuid, (String, FieldType, HashMap<String, i64>)> = HashMap::new();

    for fact in values {
        let Some(value) = fact
            .value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
        else {
            continue;
        };
        let (_, _, counts) = fields
            .entry(fact.field_id)
            .or_insert_with(|| (fact.field_name.clone(), fact.field_type, HashMap::new()));
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    let mut out: Vec<CustomFieldBreakdown> = fields
        .into_iter()
        .map(|(field_id, (field_name, field_type, counts))| {
            let mut values: Vec<ValueCount> = counts
                .into_iter()
                .map(|(value, count)| ValueCount { value, count })
                .collect();
            values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
            CustomFieldBreakdown {
                field_id,
                field_name,
                field_type,
                values,
            }
        })
        .collect();
    out.sort_by(|a, b| {
        a.field_name
            .cmp(&b.field_name)
            .then_with(|| a.field_id.cmp(&b.field_id))
    });
    out
}

/// Clamp a requested recent-leads limit into `1..=MAX_RECENT_LEADS`.
pub fn recent_leads_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_RECENT_LEADS)
        .clamp(1, MAX_RECENT_LEADS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lead(date: NaiveDate, tags: &[&str]) -> LeadFact {
        LeadFact {
            created_at: Utc
                .from_utc_datetime(&date.and_hms_opt(14, 30, 0).unwrap()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolve_default_days() {
        let today = day(2024, 3, 31);
        let range = DateRange::resolve(&DashboardQuery::default(), today, 30).unwrap();
        assert_eq!(range.start, day(2024, 3, 1));
        assert_eq!(range.end, today);
        assert_eq!(range.days().count(), 31);
    }

    #[test]
    fn test_resolve_explicit_range() {
        let query = DashboardQuery {
            start: Some(day(2024, 1, 1)),
            end: Some(day(2024, 1, 7)),
            days: Some(90),
        };
        let range = DateRange::resolve(&query, day(2024, 6, 1), 30).unwrap();
        assert_eq!((range.start, range.end), (day(2024, 1, 1), day(2024, 1, 7)));
    }

    #[test]
    fn test_resolve_rejects_inverted_and_oversized_ranges() {
        let inverted = DashboardQuery {
            start: Some(day(2024, 2, 1)),
            end: Some(day(2024, 1, 1)),
            days: None,
        };
        assert!(matches!(
            DateRange::resolve(&inverted, day(2024, 6, 1), 30),
            Err(AppError::BadRequest(_))
        ));

        let too_long = DashboardQuery {
            start: Some(day(2022, 1, 1)),
            end: Some(day(2024, 1, 1)),
            days: None,
        };
        assert!(DateRange::resolve(&too_long, day(2024, 6, 1), 30).is_err());

        let negative = DashboardQuery {
            days: Some(-3),
            ..Default::default()
        };
        assert!(DateRange::resolve(&negative, day(2024, 6, 1), 30).is_err());
    }

    #[test]
    fn test_bounds_cover_whole_days() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 2)).unwrap();
        assert_eq!(range.lower_bound().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(range.upper_bound().to_rfc3339(), "2024-01-03T00:00:00+00:00");
    }

    #[test]
    fn test_empty_range_has_zero_conversion() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 3)).unwrap();
        let stats = aggregate(&range, &[], &[]);
        assert_eq!(stats.total_leads, 0);
        assert_eq!(stats.conversion_rate, 0.0);
        assert_eq!(stats.leads_over_time.len(), 3);
        assert!(stats.leads_over_time.iter().all(|d| d.count == 0));
        assert_eq!(stats.leads_by_tag.len(), 5);
    }

    #[test]
    fn test_counts_only_in_range_leads() {
        let range = DateRange::new(day(2024, 1, 10), day(2024, 1, 12)).unwrap();
        let leads = vec![
            lead(day(2024, 1, 9), &["Converted"]),
            lead(day(2024, 1, 10), &["New"]),
            lead(day(2024, 1, 12), &["converted"]),
            lead(day(2024, 1, 13), &["Converted"]),
        ];
        let stats = aggregate(&range, &leads, &[]);
        assert_eq!(stats.total_leads, 2);
        assert_eq!(stats.converted_leads, 1);
        assert_eq!(stats.new_leads, 1);
        assert_eq!(stats.conversion_rate, 0.5);
        let counts: Vec<i64> = stats.leads_over_time.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![1, 0, 1]);
    }

    #[test]
    fn test_bucket_matching_ignores_case_and_whitespace() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 1)).unwrap();
        let leads = vec![
            lead(day(2024, 1, 1), &[" QUALIFIED ", "qualified"]),
            lead(day(2024, 1, 1), &["lost", "VIP"]),
            lead(day(2024, 1, 1), &[]),
        ];
        let stats = aggregate(&range, &leads, &[]);
        assert_eq!(stats.total_leads, 3);
        assert_eq!(stats.qualified_leads, 1);
        assert_eq!(stats.lost_leads, 1);
        assert_eq!(stats.contacted_leads, 0);
        assert_eq!(
            stats.leads_by_tag[2],
            TagCount {
                tag: "Qualified".to_string(),
                count: 1
            }
        );
    }

    #[test]
    fn test_custom_field_breakdown_sorting() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 1)).unwrap();
        let field = Uuid::new_v4();
        let fact = |v: Option<&str>| FieldValueFact {
            field_id: field,
            field_name: "Origem".to_string(),
            field_type: FieldType::Text,
            value: v.map(str::to_string),
        };
        let values = vec![
            fact(Some("Instagram")),
            fact(Some("Google")),
            fact(Some("Instagram")),
            fact(Some("Indicação")),
            fact(Some("  ")),
            fact(None),
        ];
        let stats = aggregate(&range, &[], &values);
        assert_eq!(stats.custom_field_breakdown.len(), 1);
        let got: Vec<(&str, i64)> = stats.custom_field_breakdown[0]
            .values
            .iter()
            .map(|v| (v.value.as_str(), v.count))
            .collect();
        assert_eq!(got, vec![("Instagram", 2), ("Google", 1), ("Indicação", 1)]);
    }

    #[test]
    fn test_recent_leads_limit() {
        assert_eq!(recent_leads_limit(None), 10);
        assert_eq!(recent_leads_limit(Some(500)), 100);
        assert_eq!(recent_leads_limit(Some(0)), 1);
        assert_eq!(recent_leads_limit(Some(25)), 25);
    }
}
