use std::{cell::RefCell, rc::Rc};

use assert_call::{call, CallRecorder};

use super::*;
use crate::{obs_vec, ByKey, FnEq, Move, NeverEq, VecMirror};

fn record<T: Clone + 'static, E: ItemEq<T>>(
    v: &mut ObservableVec<T, E>,
) -> Rc<RefCell<Vec<ChangeEvent<T>>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let events0 = events.clone();
    v.set_handler(move |e| events0.borrow_mut().push(e.clone()));
    events
}

fn kinds(v: &mut ObservableVec<char>) {
    v.set_handler(|e| call!("{}", e.kind()));
}

#[test]
fn replace_identical() {
    let mut cr = CallRecorder::new();
    let mut v = obs_vec!['a', 'b', 'c'];
    kinds(&mut v);
    v.replace(vec!['a', 'b', 'c'], true);
    cr.verify(["beginUpdates", "endUpdates"]);
}

#[test]
fn replace_delete() {
    let mut v = obs_vec!['a', 'b', 'c'];
    let events = record(&mut v);
    v.replace(vec!['a', 'c'], true);
    assert_eq!(v, vec!['a', 'c']);
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Deletes {
                indices: vec![1],
                elements: vec!['b']
            },
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn replace_swap() {
    let mut v = obs_vec!['a', 'b'];
    let events = record(&mut v);
    v.replace(vec!['b', 'a'], true);
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Moves(vec![Move::new(0, 1)]),
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn replace_event_order() {
    let mut cr = CallRecorder::new();
    let mut v = obs_vec!['a', 'b', 'c', 'd'];
    kinds(&mut v);
    v.replace(vec!['d', 'b', 'x'], true);
    cr.verify(["beginUpdates", "moves", "deletes", "inserts", "endUpdates"]);
}

#[test]
fn replace_without_diff() {
    let mut cr = CallRecorder::new();
    let mut v = obs_vec!['a', 'b'];
    kinds(&mut v);
    v.replace(vec!['z'], false);
    cr.verify(());
    assert_eq!(v, vec!['z']);
}

#[test]
fn replace_without_handler() {
    let mut v = obs_vec![1, 2, 3];
    v.replace(vec![3, 2], true);
    assert_eq!(v, vec![3, 2]);
}

#[test]
fn replace_subrange_rebased() {
    let mut v = obs_vec!['a', 'b', 'c', 'd', 'e'];
    let events = record(&mut v);
    v.replace_subrange(1..4, ['d', 'x', 'b']);
    assert_eq!(v, vec!['a', 'd', 'x', 'b', 'e']);
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Moves(vec![Move::new(1, 3)]),
            ChangeEvent::Deletes {
                indices: vec![2],
                elements: vec!['c']
            },
            ChangeEvent::Inserts {
                indices: vec![2],
                elements: vec!['x']
            },
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn replace_subrange_outside_untouched() {
    let mut v = obs_vec!['a', 'b', 'a'];
    let events = record(&mut v);
    v.replace_subrange(1..2, []);
    assert_eq!(v, vec!['a', 'a']);
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Deletes {
                indices: vec![1],
                elements: vec!['b']
            },
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn replace_subrange_unbounded() {
    let mut v = obs_vec![1, 2, 3];
    v.replace_subrange(.., [4]);
    assert_eq!(v, vec![4]);
    v.replace_subrange(1.., [5, 6]);
    assert_eq!(v, vec![4, 5, 6]);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn replace_subrange_out_of_bounds() {
    let mut v = obs_vec![1, 2, 3];
    v.replace_subrange(2..5, []);
}

#[test]
fn try_replace_subrange_error() {
    let mut cr = CallRecorder::new();
    let mut v = obs_vec!['a', 'b'];
    kinds(&mut v);
    assert_eq!(
        v.try_replace_subrange(1..3, ['z']),
        Err(Error::RangeOutOfBounds {
            start: 1,
            end: 3,
            len: 2
        })
    );
    cr.verify(());
    assert_eq!(v, vec!['a', 'b']);
    assert_eq!(v.try_replace_subrange(1..2, ['z']), Ok(()));
    cr.verify(["beginUpdates", "deletes", "inserts", "endUpdates"]);
    assert_eq!(v, vec!['a', 'z']);
}

#[test]
fn insert_contents() {
    let mut v = obs_vec!['a', 'b'];
    let events = record(&mut v);
    v.insert_contents(1, ['z']);
    assert_eq!(v, vec!['a', 'z', 'b']);
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Inserts {
                indices: vec![1],
                elements: vec!['z']
            },
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn insert_contents_never_diffs() {
    let mut v = obs_vec!['a', 'b'];
    let events = record(&mut v);
    v.insert_contents(0, ['b', 'a']);
    assert_eq!(v, vec!['b', 'a', 'a', 'b']);
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Inserts {
                indices: vec![0, 1],
                elements: vec!['b', 'a']
            },
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn insert_nothing() {
    let mut cr = CallRecorder::new();
    let mut v = obs_vec!['a'];
    kinds(&mut v);
    v.insert_contents(1, []);
    cr.verify(["beginUpdates", "endUpdates"]);
}

#[test]
fn try_insert_contents_error() {
    let mut cr = CallRecorder::new();
    let mut v = obs_vec!['a'];
    kinds(&mut v);
    assert_eq!(
        v.try_insert_contents(2, ['z']),
        Err(Error::IndexOutOfBounds { index: 2, len: 1 })
    );
    cr.verify(());
    assert_eq!(v, vec!['a']);
}

#[test]
fn append() {
    let mut v = obs_vec!['a'];
    let events = record(&mut v);
    v.append(['b', 'c']);
    v.extend(['d']);
    assert_eq!(v, vec!['a', 'b', 'c', 'd']);
    let events = events.borrow();
    assert_eq!(
        events[1],
        ChangeEvent::Inserts {
            indices: vec![1, 2],
            elements: vec!['b', 'c']
        }
    );
    assert_eq!(
        events[4],
        ChangeEvent::Inserts {
            indices: vec![3],
            elements: vec!['d']
        }
    );
}

#[test]
fn remove_all() {
    let mut v = obs_vec!['p', 'q', 'r'];
    let events = record(&mut v);
    v.remove_all();
    assert!(v.is_empty());
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Deletes {
                indices: vec![0, 1, 2],
                elements: vec!['p', 'q', 'r']
            },
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn remove_all_empty() {
    let mut cr = CallRecorder::new();
    let mut v = ObservableVec::new();
    kinds(&mut v);
    v.remove_all();
    cr.verify(["beginUpdates", "endUpdates"]);
}

#[test]
fn silent_writes() {
    let mut cr = CallRecorder::new();
    let mut v = obs_vec!['a', 'b'];
    kinds(&mut v);
    v[0] = 'x';
    v.set_silently(1, 'y');
    cr.verify(());
    assert_eq!(v, vec!['x', 'y']);
    assert_eq!(
        v.try_set_silently(2, 'z'),
        Err(Error::IndexOutOfBounds { index: 2, len: 2 })
    );
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn index_out_of_bounds() {
    let v = obs_vec!['a'];
    let _value = v[1];
}

#[test]
fn handler_is_replaced() {
    let mut cr = CallRecorder::new();
    let mut v = obs_vec!['a'];
    v.set_handler(|_| call!("first"));
    v.set_handler(|e| call!("second {}", e.kind()));
    v.remove_all();
    cr.verify(["second beginUpdates", "second deletes", "second endUpdates"]);

    v.clear_handler();
    assert!(!v.has_handler());
    v.append(['b']);
    cr.verify(());
}

#[test]
fn replace_long_list_with_head_insert() {
    let mut cr = CallRecorder::new();
    let mut v: ObservableVec<u32> = (0..20_000).collect();
    v.set_handler(|e| call!("{} {:?}", e.kind(), e.indices().collect::<Vec<_>>()));
    let mut items = vec![u32::MAX];
    items.extend(0..20_000);
    v.replace(items, true);
    cr.verify(["beginUpdates []", "inserts [0]", "endUpdates []"]);
    assert_eq!(v.len(), 20_001);
}

#[test]
fn fn_eq_with_content_reaches_mirror() {
    let eq = FnEq(|a: &i32, b: &i32| a % 10 == b % 10).with_content(|a: &i32, b: &i32| a == b);
    let mut v = ObservableVec::from_vec_with(vec![3, 4], eq);
    let mirror = Rc::new(RefCell::new(VecMirror::from_vec(vec![3, 4])));
    let mirror0 = mirror.clone();
    v.set_handler(move |e| mirror0.borrow_mut().apply(e));
    v.replace(vec![4, 13], true);
    assert_eq!(mirror.borrow().items(), &[4, 13]);
}

#[test]
fn never_eq_replaces_everything() {
    let mut v = ObservableVec::from_vec_with(vec![1, 2], NeverEq);
    let events = record(&mut v);
    v.replace(vec![2, 1], true);
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Deletes {
                indices: vec![0, 1],
                elements: vec![1, 2]
            },
            ChangeEvent::Inserts {
                indices: vec![0, 1],
                elements: vec![2, 1]
            },
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn by_key_reports_updates() {
    let mut v = ObservableVec::from_vec_with(vec![(1, 'a'), (2, 'b')], ByKey(|x: &(u32, char)| x.0));
    let events = record(&mut v);
    v.replace(vec![(1, 'a'), (2, 'B')], true);
    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::BeginUpdates,
            ChangeEvent::Updates {
                indices: vec![1],
                elements: vec![(2, 'B')]
            },
            ChangeEvent::EndUpdates,
        ]
    );
}

#[test]
fn read_access() {
    let v: ObservableVec<i32> = (1..=3).collect();
    assert_eq!(v.len(), 3);
    assert!(!v.is_empty());
    assert_eq!(v.get(1), Some(&2));
    assert_eq!(v.get(3), None);
    assert_eq!(v[2], 3);
    assert_eq!(v.iter().sum::<i32>(), 6);
    assert_eq!((&v).into_iter().count(), 3);
    assert_eq!(v.as_slice(), &[1, 2, 3]);
    assert_eq!(format!("{v:?}"), "[1, 2, 3]");
    assert_eq!(v.into_vec(), vec![1, 2, 3]);
}

#[test]
fn construct() {
    let v: ObservableVec<i32> = ObservableVec::default();
    assert!(v.is_empty());
    let v: ObservableVec<i32> = obs_vec![];
    assert!(v.is_empty());
    let v: ObservableVec<i32> = vec![1, 2].into();
    assert_eq!(v, vec![1, 2]);
    let v = obs_vec![1, 2,];
    assert_eq!(v, vec![1, 2]);
}

#[test]
fn serde() {
    let v = obs_vec![1, 2, 3];
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, "[1,2,3]");
    let v2: ObservableVec<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(v2, vec![1, 2, 3]);
    assert!(!v2.has_handler());
}
