use std::collections::HashSet;

use vcount::{CounterConfig, Counting, CounterRegistry, Detection, Frame, TrackState, VehicleCounter};

fn det(cx: i32, cy: i32) -> Detection {
    Detection::from_ltwh(cx - 10, cy - 10, 20, 20).unwrap()
}

fn counter(height: u32, line_y: i32) -> VehicleCounter {
    VehicleCounter::new((100, height), line_y, CounterConfig::default()).unwrap()
}

#[test]
fn single_crossing_counts_once_where_side_flips() {
    let mut c = counter(100, 50);

    let totals: Vec<u64> = [10, 30, 50, 70, 90]
        .iter()
        .map(|&y| c.update(&[det(50, y)]).total)
        .collect();

    assert_eq!(totals, vec![0, 0, 1, 1, 1]);

    let tracks = c.tracks();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].path.len(), 5);
    assert_eq!(tracks[0].state(), TrackState::Counted);
}

#[test]
fn counted_ids_are_reported_on_the_crossing_frame() {
    let mut c = counter(100, 50);

    let updates: Vec<_> = [20, 40, 60, 80].iter().map(|&y| c.update(&[det(50, y)])).collect();

    assert!(updates[1].counted.is_empty());
    assert_eq!(updates[2].counted, vec![1]);
    assert!(updates[3].counted.is_empty());
}

#[test]
fn no_detections_no_count_no_objects() {
    let mut c = counter(100, 50);

    for _ in 0..20 {
        let upd = c.update(&[]);
        assert_eq!(upd.total, 0);
        assert!(upd.spawned.is_empty());
    }

    assert_eq!(c.total(), 0);
    assert!(c.is_empty());
}

#[test]
fn far_apart_detections_keep_separate_identities() {
    let mut c = counter(100, 50);

    for step in 0..3 {
        c.update(&[det(10, 10 + step * 5), det(90, 90 - step * 5)]);
    }

    let tracks = c.tracks();
    assert_eq!(tracks.len(), 2);

    let left: Vec<i32> = tracks[0].path.iter().map(|p| p.x).collect();
    let right: Vec<i32> = tracks[1].path.iter().map(|p| p.x).collect();
    assert_eq!(left, vec![10, 10, 10]);
    assert_eq!(right, vec![90, 90, 90]);
}

#[test]
fn stale_object_is_replaced_not_revived() {
    let mut c = counter(100, 50);
    c.update(&[det(50, 20)]);

    for _ in 0..5 {
        assert!(c.update(&[]).evicted.is_empty());
    }
    assert_eq!(c.update(&[]).evicted, vec![1]);

    let upd = c.update(&[det(50, 20)]);
    assert_eq!(upd.spawned, vec![2]);
    assert!(c.track(1).is_none());
    assert_eq!(c.track(2).unwrap().path.len(), 1);
}

#[test]
fn short_gap_keeps_identity() {
    let mut c = counter(100, 50);
    c.update(&[det(50, 30)]);
    c.update(&[]);
    c.update(&[]);

    let upd = c.update(&[det(50, 60)]);
    assert_eq!(upd.matched, 1);
    assert_eq!(upd.counted, vec![1]);
}

// xorshift, so the sequence is the same on every run
fn next(state: &mut u32) -> u32 {
    *state ^= *state << 13;
    *state ^= *state >> 17;
    *state ^= *state << 5;
    *state
}

#[test]
fn count_is_monotonic_and_never_double_counts() {
    let mut c = VehicleCounter::new((320, 240), 120, CounterConfig::default()).unwrap();
    let mut seed = 0x2545_f491;
    let mut last = 0;
    let mut counted = HashSet::new();
    let mut spawned = 0;

    for _ in 0..500 {
        let n = next(&mut seed) % 5;
        let dets: Vec<_> = (0..n)
            .map(|_| {
                let x = (next(&mut seed) % 280) as i32 + 20;
                let y = (next(&mut seed) % 200) as i32 + 20;
                det(x, y)
            })
            .collect();

        let upd = c.update(&dets);
        spawned += upd.spawned.len() as u64;

        assert!(upd.total >= last);
        assert_eq!(upd.total - last, upd.counted.len() as u64);
        for id in upd.counted {
            assert!(counted.insert(id), "object #{} counted twice", id);
        }

        last = upd.total;
    }

    assert!(last <= spawned);
    assert_eq!(last, counted.len() as u64);
}

#[test]
fn registry_keeps_streams_independent() {
    let mut reg = CounterRegistry::default();

    for y in [30, 45, 60] {
        reg.update(&Frame::new((100, 100), vec![det(50, y)]), "north").unwrap();
        reg.update(&Frame::new((200, 200), vec![det(50, y)]), "south").unwrap();
    }

    assert_eq!(reg.len(), 2);
    assert_eq!(reg.total("north"), 1);
    assert_eq!(reg.total("south"), 0);
    assert_eq!(reg.get("south").unwrap().line_y(), 100);
    assert_eq!(reg.tracks("north").len(), 1);
    assert!(reg.tracks("east").is_empty());

    assert!(reg.remove("north").is_some());
    assert_eq!(reg.total("north"), 0);
}

#[test]
fn registry_rejects_resized_frames() {
    let mut reg = CounterRegistry::default();
    reg.update(&Frame::new((100, 100), vec![]), "cam").unwrap();

    assert!(reg.update(&Frame::new((50, 100), vec![]), "cam").is_err());
}
