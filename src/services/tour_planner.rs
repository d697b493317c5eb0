// src/services/tour_planner.rs
// DOCUMENTATION: In-memory editing model for tour segments
// PURPOSE: Validate state ranges, detect date conflicts and assemble the
// payload persisted by TourService. No I/O happens here.
//
// A tour is a list of state ranges. Within one tour:
// - every range has start_date < end_date
// - a state appears at most once
// - no two ranges overlap; ranges that only touch (one ends on the day the
//   next starts) are allowed, that day is the travel day

use crate::errors::MarketplaceError;
use crate::models::{StateRange, StateRangeDraft, TourSegment};
use crate::services::us_states;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

pub const MAX_TOUR_NAME_LEN: usize = 120;
pub const MAX_CITIES_PER_RANGE: usize = 25;
pub const MAX_CITY_LEN: usize = 100;
pub const MAX_NOTES_LEN: usize = 1000;

/// Anything with a state and a date range
pub trait DatedRange {
    fn range_id(&self) -> Uuid;
    fn state(&self) -> &str;
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> NaiveDate;
}

impl DatedRange for StateRange {
    fn range_id(&self) -> Uuid {
        self.id
    }
    fn state(&self) -> &str {
        &self.state
    }
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }
    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// A validated, normalized state range held by a TourForm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRange {
    pub id: Uuid,
    pub state: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cities: Vec<String>,
    pub notes: Option<String>,
}

impl DatedRange for PlannedRange {
    fn range_id(&self) -> Uuid {
        self.id
    }
    fn state(&self) -> &str {
        &self.state
    }
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }
    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

impl PlannedRange {
    pub fn to_draft(&self) -> StateRangeDraft {
        StateRangeDraft {
            state: self.state.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            cities: self.cities.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Number of nights spent in the state
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    DuplicateState,
    OverlappingDates,
}

/// Two ranges of the same tour that cannot coexist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeConflict {
    pub kind: ConflictKind,
    pub first: Uuid,
    pub second: Uuid,
}

/// Overlap between a range of one tour and a range of another tour of the same artist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossSegmentConflict {
    pub range_id: Uuid,
    pub state: String,
    pub other_segment_id: Uuid,
    pub other_segment_name: String,
    pub other_range_id: Uuid,
    pub other_state: String,
    pub overlap_start: NaiveDate,
    pub overlap_end: NaiveDate,
}

/// Editing mode of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Editing { range_id: Uuid },
}

/// Validated payload ready to be persisted, ranges in chronological order
#[derive(Debug, Clone, PartialEq)]
pub struct TourSubmission {
    pub name: String,
    pub notes: Option<String>,
    pub ranges: Vec<PlannedRange>,
}

pub fn ranges_overlap<A: DatedRange + ?Sized, B: DatedRange + ?Sized>(a: &A, b: &B) -> bool {
    a.start_date() < b.end_date() && b.start_date() < a.end_date()
}

/// Earliest start and latest end across the ranges
pub fn tour_span<R: DatedRange>(ranges: &[R]) -> Option<(NaiveDate, NaiveDate)> {
    let start = ranges.iter().map(|r| r.start_date()).min()?;
    let end = ranges.iter().map(|r| r.end_date()).max()?;
    Some((start, end))
}

/// Every pair of ranges that shares a state or overlaps in time
pub fn detect_conflicts<R: DatedRange>(ranges: &[R]) -> Vec<RangeConflict> {
    let mut conflicts = Vec::new();
    for (i, a) in ranges.iter().enumerate() {
        for b in &ranges[i + 1..] {
            if a.state().eq_ignore_ascii_case(b.state()) {
                conflicts.push(RangeConflict {
                    kind: ConflictKind::DuplicateState,
                    first: a.range_id(),
                    second: b.range_id(),
                });
            }
            if ranges_overlap(a, b) {
                conflicts.push(RangeConflict {
                    kind: ConflictKind::OverlappingDates,
                    first: a.range_id(),
                    second: b.range_id(),
                });
            }
        }
    }
    conflicts
}

/// Overlaps between `ranges` (belonging to `segment_id`, if persisted) and the
/// artist's other tour segments. The segment itself is skipped.
pub fn cross_segment_conflicts<R: DatedRange>(
    segment_id: Option<Uuid>,
    ranges: &[R],
    others: &[TourSegment],
) -> Vec<CrossSegmentConflict> {
    let mut conflicts = Vec::new();
    for other in others.iter().filter(|s| Some(s.id) != segment_id) {
        for range in ranges {
            for other_range in &other.state_ranges {
                if ranges_overlap(range, other_range) {
                    conflicts.push(CrossSegmentConflict {
                        range_id: range.range_id(),
                        state: range.state().to_string(),
                        other_segment_id: other.id,
                        other_segment_name: other.name.clone(),
                        other_range_id: other_range.id,
                        other_state: other_range.state.clone(),
                        overlap_start: range.start_date().max(other_range.start_date),
                        overlap_end: range.end_date().min(other_range.end_date),
                    });
                }
            }
        }
    }
    conflicts
}

/// Trim, drop blanks and case-insensitive duplicates (first spelling wins)
pub fn clean_cities(cities: &[String]) -> Result<Vec<String>, MarketplaceError> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();
    for city in cities {
        let city = city.trim();
        if city.is_empty() {
            continue;
        }
        if city.chars().count() > MAX_CITY_LEN {
            return Err(MarketplaceError::ValidationError(format!(
                "City name exceeds {} characters",
                MAX_CITY_LEN
            )));
        }
        if seen.insert(city.to_lowercase()) {
            cleaned.push(city.to_string());
        }
    }
    if cleaned.len() > MAX_CITIES_PER_RANGE {
        return Err(MarketplaceError::ValidationError(format!(
            "A state range can list at most {} cities",
            MAX_CITIES_PER_RANGE
        )));
    }
    Ok(cleaned)
}

pub fn clean_notes(notes: Option<&str>) -> Result<Option<String>, MarketplaceError> {
    match notes.map(str::trim) {
        None | Some("") => Ok(None),
        Some(notes) if notes.chars().count() > MAX_NOTES_LEN => Err(
            MarketplaceError::ValidationError(format!("Notes exceed {} characters", MAX_NOTES_LEN)),
        ),
        Some(notes) => Ok(Some(notes.to_string())),
    }
}

/// Validate a single draft in isolation
pub fn normalize_draft(draft: &StateRangeDraft, id: Uuid) -> Result<PlannedRange, MarketplaceError> {
    let state = us_states::normalize(&draft.state)?;

    if draft.start_date >= draft.end_date {
        return Err(MarketplaceError::ValidationError(format!(
            "{}: start date {} must be before end date {}",
            state, draft.start_date, draft.end_date
        )));
    }

    Ok(PlannedRange {
        id,
        state,
        start_date: draft.start_date,
        end_date: draft.end_date,
        cities: clean_cities(&draft.cities)?,
        notes: clean_notes(draft.notes.as_deref())?,
    })
}

/// Tour being created or edited
#[derive(Debug, Clone)]
pub struct TourForm {
    name: String,
    notes: Option<String>,
    ranges: Vec<PlannedRange>,
    editing: EditState,
}

impl TourForm {
    pub fn new(name: impl Into<String>) -> Self {
        TourForm {
            name: name.into(),
            notes: None,
            ranges: Vec::new(),
            editing: EditState::Idle,
        }
    }

    /// Load a persisted segment for editing; ranges keep their ids and order
    pub fn from_segment(segment: &TourSegment) -> Self {
        let mut stored: Vec<&StateRange> = segment.state_ranges.iter().collect();
        stored.sort_by_key(|r| r.position);

        TourForm {
            name: segment.name.clone(),
            notes: segment.notes.clone(),
            ranges: stored
                .into_iter()
                .map(|r| PlannedRange {
                    id: r.id,
                    state: r.state.clone(),
                    start_date: r.start_date,
                    end_date: r.end_date,
                    cities: r.cities.clone(),
                    notes: r.notes.clone(),
                })
                .collect(),
            editing: EditState::Idle,
        }
    }

    /// Build a form from a full request body, adding ranges in order
    pub fn from_request(
        name: &str,
        notes: Option<&str>,
        drafts: &[StateRangeDraft],
    ) -> Result<Self, MarketplaceError> {
        let mut form = TourForm::new(name);
        form.set_notes(notes)?;
        for draft in drafts {
            form.add_range(draft)?;
        }
        Ok(form)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn ranges(&self) -> &[PlannedRange] {
        &self.ranges
    }

    pub fn edit_state(&self) -> EditState {
        self.editing
    }

    pub fn set_notes(&mut self, notes: Option<&str>) -> Result<(), MarketplaceError> {
        self.notes = clean_notes(notes)?;
        Ok(())
    }

    pub fn range(&self, id: Uuid) -> Option<&PlannedRange> {
        self.ranges.iter().find(|r| r.id == id)
    }

    fn index_of(&self, id: Uuid) -> Result<usize, MarketplaceError> {
        self.ranges
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| MarketplaceError::NotFound(format!("State range {}", id)))
    }

    /// Reject `candidate` if it repeats a state or overlaps another range.
    /// `exclude` is the range being replaced, if any.
    fn check_against_others(
        &self,
        candidate: &PlannedRange,
        exclude: Option<Uuid>,
    ) -> Result<(), MarketplaceError> {
        for other in self.ranges.iter().filter(|r| Some(r.id) != exclude) {
            if other.state == candidate.state {
                return Err(MarketplaceError::Conflict(format!(
                    "{} is already part of this tour",
                    candidate.state
                )));
            }
            if ranges_overlap(candidate, other) {
                return Err(MarketplaceError::Conflict(format!(
                    "{} ({} to {}) overlaps {} ({} to {})",
                    candidate.state,
                    candidate.start_date,
                    candidate.end_date,
                    other.state,
                    other.start_date,
                    other.end_date
                )));
            }
        }
        Ok(())
    }

    /// Append a new range and return its id
    pub fn add_range(&mut self, draft: &StateRangeDraft) -> Result<Uuid, MarketplaceError> {
        let range = normalize_draft(draft, Uuid::new_v4())?;
        self.check_against_others(&range, None)?;
        let id = range.id;
        self.ranges.push(range);
        Ok(id)
    }

    /// Replace a range in place, keeping its id and position
    pub fn update_range(&mut self, id: Uuid, draft: &StateRangeDraft) -> Result<(), MarketplaceError> {
        let index = self.index_of(id)?;
        let range = normalize_draft(draft, id)?;
        self.check_against_others(&range, Some(id))?;
        self.ranges[index] = range;
        Ok(())
    }

    pub fn remove_range(&mut self, id: Uuid) -> Result<PlannedRange, MarketplaceError> {
        let index = self.index_of(id)?;
        if self.editing == (EditState::Editing { range_id: id }) {
            self.editing = EditState::Idle;
        }
        Ok(self.ranges.remove(index))
    }

    pub fn add_city(&mut self, range_id: Uuid, city: &str) -> Result<(), MarketplaceError> {
        let index = self.index_of(range_id)?;
        let range = &self.ranges[index];
        let city = city.trim();
        if city.is_empty() {
            return Err(MarketplaceError::ValidationError("City name is required".to_string()));
        }
        if range.cities.iter().any(|c| c.eq_ignore_ascii_case(city)) {
            return Err(MarketplaceError::ValidationError(format!(
                "{} is already listed for {}",
                city, range.state
            )));
        }

        let mut cities = range.cities.clone();
        cities.push(city.to_string());
        self.ranges[index].cities = clean_cities(&cities)?;
        Ok(())
    }

    pub fn remove_city(&mut self, range_id: Uuid, city: &str) -> Result<(), MarketplaceError> {
        let index = self.index_of(range_id)?;
        let cities = &mut self.ranges[index].cities;
        let before = cities.len();
        cities.retain(|c| !c.eq_ignore_ascii_case(city.trim()));
        if cities.len() == before {
            return Err(MarketplaceError::NotFound(format!("City {}", city.trim())));
        }
        Ok(())
    }

    /// Start editing a range; returns its current values
    pub fn begin_edit(&mut self, id: Uuid) -> Result<StateRangeDraft, MarketplaceError> {
        let draft = self.ranges[self.index_of(id)?].to_draft();
        self.editing = EditState::Editing { range_id: id };
        Ok(draft)
    }

    /// Apply the edit started by `begin_edit`. On error the form stays in edit mode.
    pub fn commit_edit(&mut self, draft: &StateRangeDraft) -> Result<Uuid, MarketplaceError> {
        let range_id = match self.editing {
            EditState::Editing { range_id } => range_id,
            EditState::Idle => {
                return Err(MarketplaceError::InvalidInput(
                    "No state range is being edited".to_string(),
                ))
            }
        };
        self.update_range(range_id, draft)?;
        self.editing = EditState::Idle;
        Ok(range_id)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = EditState::Idle;
    }

    pub fn conflicts(&self) -> Vec<RangeConflict> {
        detect_conflicts(&self.ranges)
    }

    /// Whole-form check run before submission
    pub fn validate(&self) -> Result<(), MarketplaceError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(MarketplaceError::ValidationError("Tour name is required".to_string()));
        }
        if name.chars().count() > MAX_TOUR_NAME_LEN {
            return Err(MarketplaceError::ValidationError(format!(
                "Tour name exceeds {} characters",
                MAX_TOUR_NAME_LEN
            )));
        }
        if self.ranges.is_empty() {
            return Err(MarketplaceError::ValidationError(
                "A tour needs at least one state range".to_string(),
            ));
        }
        if let Some(conflict) = self.conflicts().first() {
            return Err(MarketplaceError::Conflict(format!(
                "State ranges {} and {} conflict ({:?})",
                conflict.first, conflict.second, conflict.kind
            )));
        }
        Ok(())
    }

    /// Validate and produce the payload with ranges sorted by start date
    pub fn into_submission(self) -> Result<TourSubmission, MarketplaceError> {
        self.validate()?;
        let mut ranges = self.ranges;
        ranges.sort_by_key(|r| r.start_date);
        Ok(TourSubmission {
            name: self.name.trim().to_string(),
            notes: self.notes,
            ranges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2031, m, d).unwrap()
    }

    fn draft(state: &str, start: NaiveDate, end: NaiveDate) -> StateRangeDraft {
        StateRangeDraft {
            state: state.to_string(),
            start_date: start,
            end_date: end,
            cities: Vec::new(),
            notes: None,
        }
    }

    #[test]
    fn test_add_range_normalizes_state_and_cities() {
        let mut form = TourForm::new("Southwest run");
        let mut d = draft("tx", date(6, 1), date(6, 5));
        d.cities = vec![
            " Austin ".to_string(),
            "".to_string(),
            "austin".to_string(),
            "El Paso".to_string(),
        ];
        d.notes = Some("   ".to_string());

        let id = form.add_range(&d).unwrap();
        let range = form.range(id).unwrap();
        assert_eq!(range.state, "TX");
        assert_eq!(range.cities, vec!["Austin", "El Paso"]);
        assert_eq!(range.notes, None);
        assert_eq!(range.nights(), 4);
    }

    #[test]
    fn test_end_before_or_equal_start_rejected() {
        let mut form = TourForm::new("Tour");
        let err = form.add_range(&draft("NM", date(6, 5), date(6, 1))).unwrap_err();
        assert!(matches!(err, MarketplaceError::ValidationError(_)));

        let err = form.add_range(&draft("NM", date(6, 5), date(6, 5))).unwrap_err();
        assert!(matches!(err, MarketplaceError::ValidationError(_)));
        assert!(form.ranges().is_empty());
    }

    #[test]
    fn test_unknown_state_rejected() {
        let mut form = TourForm::new("Tour");
        assert!(form.add_range(&draft("ZZ", date(6, 1), date(6, 2))).is_err());
    }

    #[test]
    fn test_duplicate_state_rejected() {
        let mut form = TourForm::new("Tour");
        form.add_range(&draft("AZ", date(6, 1), date(6, 3))).unwrap();
        let err = form.add_range(&draft("az", date(7, 1), date(7, 3))).unwrap_err();
        assert!(matches!(err, MarketplaceError::Conflict(_)));
        assert_eq!(form.ranges().len(), 1);
    }

    #[test]
    fn test_overlapping_dates_rejected() {
        let mut form = TourForm::new("Tour");
        form.add_range(&draft("AZ", date(6, 1), date(6, 5))).unwrap();
        let err = form.add_range(&draft("NM", date(6, 4), date(6, 8))).unwrap_err();
        assert!(matches!(err, MarketplaceError::Conflict(_)));

        // Fully contained
        assert!(form.add_range(&draft("NM", date(6, 2), date(6, 3))).is_err());
    }

    #[test]
    fn test_touching_ranges_allowed() {
        let mut form = TourForm::new("Tour");
        form.add_range(&draft("AZ", date(6, 1), date(6, 5))).unwrap();
        form.add_range(&draft("NM", date(6, 5), date(6, 9))).unwrap();
        form.add_range(&draft("CA", date(5, 28), date(6, 1))).unwrap();
        assert_eq!(form.ranges().len(), 3);
        assert!(form.conflicts().is_empty());
    }

    #[test]
    fn test_update_in_place_keeps_id_and_position() {
        let mut form = TourForm::new("Tour");
        let first = form.add_range(&draft("AZ", date(6, 1), date(6, 5))).unwrap();
        let second = form.add_range(&draft("NM", date(6, 5), date(6, 9))).unwrap();

        // Same state, same dates: must not conflict with itself
        form.update_range(first, &draft("AZ", date(6, 1), date(6, 5))).unwrap();

        form.update_range(first, &draft("UT", date(5, 30), date(6, 4))).unwrap();
        assert_eq!(form.ranges()[0].id, first);
        assert_eq!(form.ranges()[0].state, "UT");
        assert_eq!(form.ranges()[1].id, second);
    }

    #[test]
    fn test_update_rejects_conflict_with_other_range() {
        let mut form = TourForm::new("Tour");
        let first = form.add_range(&draft("AZ", date(6, 1), date(6, 5))).unwrap();
        form.add_range(&draft("NM", date(6, 5), date(6, 9))).unwrap();

        assert!(form.update_range(first, &draft("NM", date(5, 1), date(5, 3))).is_err());
        assert!(form.update_range(first, &draft("AZ", date(6, 1), date(6, 7))).is_err());
        assert_eq!(form.range(first).unwrap().end_date, date(6, 5));
    }

    #[test]
    fn test_update_and_remove_unknown_range() {
        let mut form = TourForm::new("Tour");
        let missing = Uuid::new_v4();
        assert!(matches!(
            form.update_range(missing, &draft("AZ", date(6, 1), date(6, 2))),
            Err(MarketplaceError::NotFound(_))
        ));
        assert!(matches!(form.remove_range(missing), Err(MarketplaceError::NotFound(_))));
    }

    #[test]
    fn test_city_editing() {
        let mut form = TourForm::new("Tour");
        let id = form.add_range(&draft("CO", date(6, 1), date(6, 5))).unwrap();

        form.add_city(id, "Denver").unwrap();
        form.add_city(id, " Boulder ").unwrap();
        assert!(form.add_city(id, "denver").is_err());
        assert!(form.add_city(id, "  ").is_err());
        assert_eq!(form.range(id).unwrap().cities, vec!["Denver", "Boulder"]);

        form.remove_city(id, "DENVER").unwrap();
        assert_eq!(form.range(id).unwrap().cities, vec!["Boulder"]);
        assert!(matches!(form.remove_city(id, "Aspen"), Err(MarketplaceError::NotFound(_))));
    }

    #[test]
    fn test_city_limit() {
        let mut d = draft("CO", date(6, 1), date(6, 5));
        d.cities = (0..=MAX_CITIES_PER_RANGE).map(|i| format!("Town {}", i)).collect();
        assert!(normalize_draft(&d, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_edit_session() {
        let mut form = TourForm::new("Tour");
        let id = form.add_range(&draft("OR", date(6, 1), date(6, 5))).unwrap();

        assert!(form.commit_edit(&draft("OR", date(6, 1), date(6, 6))).is_err());

        let loaded = form.begin_edit(id).unwrap();
        assert_eq!(loaded.state, "OR");
        assert_eq!(form.edit_state(), EditState::Editing { range_id: id });

        // A failed commit keeps the edit open
        assert!(form.commit_edit(&draft("OR", date(6, 6), date(6, 1))).is_err());
        assert_eq!(form.edit_state(), EditState::Editing { range_id: id });

        assert_eq!(form.commit_edit(&draft("WA", date(6, 1), date(6, 6))).unwrap(), id);
        assert_eq!(form.edit_state(), EditState::Idle);
        assert_eq!(form.range(id).unwrap().state, "WA");
    }

    #[test]
    fn test_removing_edited_range_resets_edit_state() {
        let mut form = TourForm::new("Tour");
        let id = form.add_range(&draft("OR", date(6, 1), date(6, 5))).unwrap();
        form.begin_edit(id).unwrap();
        form.remove_range(id).unwrap();
        assert_eq!(form.edit_state(), EditState::Idle);

        let other = form.add_range(&draft("ID", date(6, 1), date(6, 5))).unwrap();
        form.begin_edit(other).unwrap();
        form.cancel_edit();
        assert_eq!(form.edit_state(), EditState::Idle);
    }

    #[test]
    fn test_validate_requires_name_and_ranges() {
        let form = TourForm::new("   ");
        assert!(form.validate().is_err());

        let form = TourForm::new("Named");
        assert!(form.validate().is_err());

        let form = TourForm::new("x".repeat(MAX_TOUR_NAME_LEN + 1));
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_submission_sorted_by_start() {
        let drafts = vec![
            draft("NM", date(6, 5), date(6, 9)),
            draft("AZ", date(6, 1), date(6, 5)),
            draft("TX", date(6, 12), date(6, 20)),
        ];
        let form = TourForm::from_request("  Desert loop ", Some("van tour"), &drafts).unwrap();
        let submission = form.into_submission().unwrap();

        assert_eq!(submission.name, "Desert loop");
        assert_eq!(submission.notes.as_deref(), Some("van tour"));
        let states: Vec<&str> = submission.ranges.iter().map(|r| r.state.as_str()).collect();
        assert_eq!(states, vec!["AZ", "NM", "TX"]);
        assert_eq!(
            tour_span(&submission.ranges),
            Some((date(6, 1), date(6, 20)))
        );
    }

    #[test]
    fn test_from_request_reports_conflicting_draft() {
        let drafts = vec![
            draft("NM", date(6, 5), date(6, 9)),
            draft("NM", date(7, 1), date(7, 2)),
        ];
        assert!(matches!(
            TourForm::from_request("Tour", None, &drafts),
            Err(MarketplaceError::Conflict(_))
        ));
    }

    fn stored_segment(name: &str, ranges: &[(&str, NaiveDate, NaiveDate)]) -> TourSegment {
        let id = Uuid::new_v4();
        TourSegment {
            id,
            artist_id: Uuid::new_v4(),
            name: name.to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            state_ranges: ranges
                .iter()
                .enumerate()
                .map(|(i, (state, start, end))| StateRange {
                    id: Uuid::new_v4(),
                    segment_id: id,
                    state: state.to_string(),
                    start_date: *start,
                    end_date: *end,
                    cities: Vec::new(),
                    notes: None,
                    position: i as i32,
                })
                .collect(),
        }
    }

    #[test]
    fn test_from_segment_orders_by_position() {
        let mut segment = stored_segment(
            "Stored",
            &[("AZ", date(6, 1), date(6, 5)), ("NM", date(6, 5), date(6, 9))],
        );
        segment.state_ranges.reverse();
        let form = TourForm::from_segment(&segment);
        assert_eq!(form.ranges()[0].state, "AZ");
        assert_eq!(form.ranges()[1].state, "NM");
        assert_eq!(form.name(), "Stored");
    }

    #[test]
    fn test_detect_conflicts_reports_pairs() {
        let segment = stored_segment(
            "Legacy",
            &[
                ("AZ", date(6, 1), date(6, 5)),
                ("AZ", date(6, 3), date(6, 8)),
                ("NM", date(7, 1), date(7, 3)),
            ],
        );
        let conflicts = detect_conflicts(&segment.state_ranges);
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().any(|c| c.kind == ConflictKind::DuplicateState));
        assert!(conflicts.iter().any(|c| c.kind == ConflictKind::OverlappingDates));
        assert!(TourForm::from_segment(&segment).validate().is_err());
    }

    #[test]
    fn test_cross_segment_conflicts() {
        let current = stored_segment("Spring", &[("AZ", date(4, 1), date(4, 10))]);
        let other = stored_segment(
            "Festival",
            &[("CA", date(4, 8), date(4, 12)), ("NV", date(4, 12), date(4, 14))],
        );

        let conflicts = cross_segment_conflicts(
            Some(current.id),
            &current.state_ranges,
            &[current.clone(), other.clone()],
        );
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].other_segment_name, "Festival");
        assert_eq!(conflicts[0].other_state, "CA");
        assert_eq!(conflicts[0].overlap_start, date(4, 8));
        assert_eq!(conflicts[0].overlap_end, date(4, 10));
    }
}
