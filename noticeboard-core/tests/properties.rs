//! Property tests for the entities and the reminder record

use proptest::prelude::*;

use noticeboard_core::entity::{bounded, Notification, NotificationRing, Priority, ReminderTable};
use noticeboard_core::error::Error;
use noticeboard_core::state::ReminderEvent;
use noticeboard_core::storage::{decode, encode, record_len, HEADER_LEN};
use noticeboard_core::time::is_plausible;

fn note(i: usize) -> Notification {
    let text = format!("n{}", i);
    Notification {
        app: bounded("app", 16),
        sender: bounded("who", 32),
        message: bounded(&text, 64),
        priority: Priority::Normal,
    }
}

proptest! {
    #[test]
    fn ring_holds_last_n_newest_first(count in 0usize..40) {
        let mut ring: NotificationRing<5> = NotificationRing::new();
        for i in 0..count {
            ring.push(note(i));
        }
        let held: Vec<String> = ring.iter().map(|n| n.message.as_str().to_owned()).collect();
        let expected: Vec<String> = (0..count).rev().take(5).map(|i| format!("n{}", i)).collect();
        prop_assert_eq!(held, expected);
    }

    #[test]
    fn ids_increase_until_full(extra in 1usize..5) {
        let mut table: ReminderTable<8> = ReminderTable::new();
        for expected in 1..=8u32 {
            let id = table.insert(bounded("r", 63), None, 0, Priority::Normal);
            prop_assert_eq!(id, Ok(expected));
        }
        for _ in 0..extra {
            let before = table.slots().to_vec();
            let result = table.insert(bounded("r", 63), None, 0, Priority::Normal);
            prop_assert_eq!(result, Err(Error::CapacityExceeded));
            prop_assert_eq!(table.slots(), before.as_slice());
        }
    }

    #[test]
    fn triggered_always_listed_first(
        dues in prop::collection::vec(proptest::option::of(0i64..10_000), 1..10),
        fire in prop::collection::vec(any::<bool>(), 10),
    ) {
        let mut table: ReminderTable<10> = ReminderTable::new();
        for (i, due) in dues.iter().enumerate() {
            let id = table.insert(bounded("r", 63), *due, 3, Priority::Normal).unwrap();
            if fire[i] && due.is_some() {
                table.get_mut(id).unwrap().apply(ReminderEvent::Due, 20_000);
            }
        }

        let active = table.active();
        let first_idle = active.iter().position(|r| !r.triggered).unwrap_or(active.len());
        prop_assert!(active[first_idle..].iter().all(|r| !r.triggered));

        // Within each group, dated reminders ascend and undated come last
        for group in [&active[..first_idle], &active[first_idle..]] {
            let keys: Vec<(bool, i64)> = group
                .iter()
                .map(|r| (r.effective_due().is_none(), r.effective_due().unwrap_or(0)))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys, sorted);
        }
    }

    #[test]
    fn record_roundtrip_keeps_active_fields(
        dues in prop::collection::vec(proptest::option::of(1_700_000_000i64..1_900_000_000), 0..10),
        repeat in 0u32..120,
    ) {
        let mut table: ReminderTable<10> = ReminderTable::new();
        for due in &dues {
            table.insert(bounded("persist me", 63), *due, repeat, Priority::Medium).unwrap();
        }
        let mut buf = [0u8; record_len(10)];
        let len = encode(&table, &mut buf).unwrap();
        let (decoded, report) = decode::<10>(&buf[..len]).unwrap();
        prop_assert_eq!(usize::from(report.loaded), dues.len());
        prop_assert_eq!(decoded.slots(), table.slots());
    }

    #[test]
    fn decoding_arbitrary_bytes_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..1200)) {
        let _ = decode::<10>(&bytes);
    }

    #[test]
    fn stored_timestamps_are_range_checked(due in any::<i64>(), review in any::<i64>()) {
        let mut table: ReminderTable<4> = ReminderTable::new();
        let id = table.insert(bounded("late", 63), Some(1_800_000_000), 5, Priority::High).unwrap();
        table.get_mut(id).unwrap().apply(ReminderEvent::Due, 1_800_000_000);
        let mut buf = [0u8; record_len(4)];
        encode(&table, &mut buf).unwrap();
        buf[HEADER_LEN + 4..HEADER_LEN + 12].copy_from_slice(&due.to_le_bytes());
        buf[HEADER_LEN + 12..HEADER_LEN + 20].copy_from_slice(&review.to_le_bytes());

        let (decoded, report) = decode::<4>(&buf).unwrap();
        let valid = is_plausible(due) && is_plausible(review);
        prop_assert_eq!(report.loaded, u8::from(valid));
        prop_assert_eq!(report.rejected, u8::from(!valid));
        if let Some(r) = decoded.get(id) {
            prop_assert_eq!(r.due_at, Some(due));
            prop_assert_eq!(r.next_review_at, Some(review));
        }
    }

    #[test]
    fn decoding_mutated_record_never_panics(
        index in 0usize..record_len(4),
        value in any::<u8>(),
    ) {
        let mut table: ReminderTable<4> = ReminderTable::new();
        table.insert(bounded("one", 63), Some(1_800_000_000), 5, Priority::High).unwrap();
        table.insert(bounded("two", 63), None, 0, Priority::Normal).unwrap();
        let mut buf = [0u8; record_len(4)];
        encode(&table, &mut buf).unwrap();
        buf[index] = value;

        if let Ok((decoded, report)) = decode::<4>(&buf) {
            prop_assert!(decoded.len() <= 4);
            prop_assert!(usize::from(report.loaded) == decoded.len());
            prop_assert!(decoded.iter().all(|r| r.id > 0 && r.id <= 100_000));
        }
    }
}
