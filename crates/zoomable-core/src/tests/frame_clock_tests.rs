use super::*;

use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn callbacks_run_once_in_registration_order() {
    let clock = FrameClock::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let mut registrations = Vec::new();
    for tag in ["a", "b", "c"] {
        let log = Rc::clone(&log);
        registrations.push(clock.with_frame_nanos(move |time| {
            log.borrow_mut().push((tag, time));
        }));
    }

    assert_eq!(clock.pending_frame_callbacks(), 3);
    assert_eq!(clock.drain_frame_callbacks(16), 3);
    assert_eq!(*log.borrow(), vec![("a", 16), ("b", 16), ("c", 16)]);

    assert_eq!(clock.drain_frame_callbacks(32), 0);
    assert_eq!(log.borrow().len(), 3);
    assert_eq!(clock.last_frame_nanos(), Some(32));
}

#[test]
fn dropping_registration_cancels_callback() {
    let clock = FrameClock::new();
    let ran = Rc::new(RefCell::new(false));
    let registration = {
        let ran = Rc::clone(&ran);
        clock.with_frame_nanos(move |_| *ran.borrow_mut() = true)
    };
    drop(registration);

    assert!(!clock.has_pending_frame_callbacks());
    clock.drain_frame_callbacks(1);
    assert!(!*ran.borrow());
}

#[test]
fn callback_registered_during_drain_waits_for_next_frame() {
    let clock = FrameClock::new();
    let frames = Rc::new(RefCell::new(Vec::new()));
    let slot: Rc<RefCell<Option<FrameCallbackRegistration>>> = Rc::new(RefCell::new(None));

    let outer = {
        let clock_inner = clock.clone();
        let frames = Rc::clone(&frames);
        let slot = Rc::clone(&slot);
        clock.with_frame_nanos(move |time| {
            frames.borrow_mut().push(time);
            let frames = Rc::clone(&frames);
            let registration = clock_inner.with_frame_nanos(move |time| {
                frames.borrow_mut().push(time);
            });
            slot.borrow_mut().replace(registration);
        })
    };

    clock.drain_frame_callbacks(10);
    assert_eq!(*frames.borrow(), vec![10]);
    clock.drain_frame_callbacks(20);
    assert_eq!(*frames.borrow(), vec![10, 20]);
    drop(outer);
}

#[test]
fn callback_cancelled_by_earlier_callback_is_skipped() {
    let clock = FrameClock::new();
    let ran_second = Rc::new(RefCell::new(false));
    let second_slot: Rc<RefCell<Option<FrameCallbackRegistration>>> =
        Rc::new(RefCell::new(None));

    let _first = {
        let second_slot = Rc::clone(&second_slot);
        clock.with_frame_nanos(move |_| {
            second_slot.borrow_mut().take();
        })
    };
    let second = {
        let ran_second = Rc::clone(&ran_second);
        clock.with_frame_nanos(move |_| *ran_second.borrow_mut() = true)
    };
    second_slot.borrow_mut().replace(second);

    assert_eq!(clock.drain_frame_callbacks(5), 1);
    assert!(!*ran_second.borrow());
}
