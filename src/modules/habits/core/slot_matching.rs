// Assigns today's records to a habit's configured time slots.
//
// One greedy pass: slots in ascending time, each takes the earliest-created
// unclaimed record whose logged time lies within the tolerance. Every record and
// every slot is used at most once. Surplus records stay unmatched.

use crate::modules::habits::core::habit::HabitRecord;
use crate::modules::habits::core::schedule::SlotTime;
use chrono::TimeZone;

pub const MATCH_TOLERANCE_MINUTES: i64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMatch<'a> {
    pub slot: SlotTime,
    pub record: Option<&'a HabitRecord>,
}

pub fn match_slots<'a, Tz: TimeZone>(
    slots: &[SlotTime],
    records: &[&'a HabitRecord],
    tz: &Tz,
) -> Vec<SlotMatch<'a>> {
    let mut ordered_slots = slots.to_vec();
    ordered_slots.sort();

    let mut candidates: Vec<(&'a HabitRecord, i64)> = records
        .iter()
        .map(|record| (*record, record.logged_minute(tz)))
        .collect();
    candidates.sort_by_key(|(record, _)| record.created_at);
    let mut claimed = vec![false; candidates.len()];

    ordered_slots
        .into_iter()
        .map(|slot| {
            let found = candidates
                .iter()
                .enumerate()
                .find(|(index, (_, logged))| {
                    !claimed[*index]
                        && (logged - slot.minute_of_day()).abs() <= MATCH_TOLERANCE_MINUTES
                })
                .map(|(index, (record, _))| (index, *record));
            match found {
                Some((index, record)) => {
                    claimed[index] = true;
                    SlotMatch {
                        slot,
                        record: Some(record),
                    }
                }
                None => SlotMatch { slot, record: None },
            }
        })
        .collect()
}

#[cfg(test)]
mod slot_matching_tests {
    use super::*;
    use crate::modules::habits::core::habit::RecordId;
    use crate::tests::fixtures::habits::{RecordBuilder, local_at, seoul, slot};
    use rstest::rstest;

    fn matched_ids(matches: &[SlotMatch<'_>]) -> Vec<Option<i64>> {
        matches
            .iter()
            .map(|m| {
                m.record.map(|r| match r.id {
                    RecordId::Persisted(id) => id,
                    RecordId::Provisional(_) => -1,
                })
            })
            .collect()
    }

    #[rstest]
    fn it_should_match_a_record_to_the_nearby_slot() {
        let record = RecordBuilder::new(1)
            .id(10)
            .logged_at(local_at(2026, 10, 19, 9, 5))
            .build();
        let matches = match_slots(&[slot("21:00"), slot("09:00")], &[&record], &seoul());
        assert_eq!(matches[0].slot, slot("09:00"));
        assert_eq!(matched_ids(&matches), vec![Some(10), None]);
    }

    #[rstest]
    fn it_should_prefer_the_label_over_the_timestamp() {
        let record = RecordBuilder::new(1)
            .id(10)
            .logged_at(local_at(2026, 10, 19, 9, 5))
            .slot("21:00")
            .build();
        let matches = match_slots(&[slot("09:00"), slot("21:00")], &[&record], &seoul());
        assert_eq!(matched_ids(&matches), vec![None, Some(10)]);
    }

    #[rstest]
    fn it_should_not_match_records_outside_the_tolerance() {
        let record = RecordBuilder::new(1)
            .id(10)
            .logged_at(local_at(2026, 10, 19, 11, 1))
            .build();
        let matches = match_slots(&[slot("09:00")], &[&record], &seoul());
        assert_eq!(matched_ids(&matches), vec![None]);
    }

    #[rstest]
    fn it_should_include_the_tolerance_boundary() {
        let record = RecordBuilder::new(1)
            .id(10)
            .logged_at(local_at(2026, 10, 19, 11, 0))
            .build();
        let matches = match_slots(&[slot("09:00")], &[&record], &seoul());
        assert_eq!(matched_ids(&matches), vec![Some(10)]);
    }

    #[rstest]
    fn it_should_give_the_slot_to_the_earliest_created_record() {
        let later = RecordBuilder::new(1)
            .id(2)
            .logged_at(local_at(2026, 10, 19, 9, 10))
            .build();
        let earlier = RecordBuilder::new(1)
            .id(1)
            .logged_at(local_at(2026, 10, 19, 9, 0))
            .build();
        let matches = match_slots(&[slot("09:00")], &[&later, &earlier], &seoul());
        assert_eq!(matched_ids(&matches), vec![Some(1)]);
    }

    #[rstest]
    fn it_should_never_assign_one_record_to_two_slots() {
        let record = RecordBuilder::new(1)
            .id(5)
            .logged_at(local_at(2026, 10, 19, 10, 0))
            .build();
        let matches = match_slots(&[slot("09:00"), slot("11:00")], &[&record], &seoul());
        assert_eq!(matched_ids(&matches), vec![Some(5), None]);
    }

    #[rstest]
    fn it_should_leave_surplus_records_unmatched() {
        let first = RecordBuilder::new(1)
            .id(1)
            .logged_at(local_at(2026, 10, 19, 9, 0))
            .build();
        let duplicate = RecordBuilder::new(1)
            .id(2)
            .logged_at(local_at(2026, 10, 19, 9, 1))
            .build();
        let matches = match_slots(&[slot("09:00")], &[&first, &duplicate], &seoul());
        assert_eq!(matches.len(), 1);
        assert_eq!(matched_ids(&matches), vec![Some(1)]);
    }

    #[rstest]
    fn it_should_fill_adjacent_slots_in_order() {
        let morning = RecordBuilder::new(1)
            .id(1)
            .logged_at(local_at(2026, 10, 19, 8, 55))
            .slot("09:00")
            .build();
        let late_morning = RecordBuilder::new(1)
            .id(2)
            .logged_at(local_at(2026, 10, 19, 10, 58))
            .slot("11:00")
            .build();
        let matches = match_slots(
            &[slot("11:00"), slot("09:00")],
            &[&late_morning, &morning],
            &seoul(),
        );
        assert_eq!(matched_ids(&matches), vec![Some(1), Some(2)]);
    }
}
