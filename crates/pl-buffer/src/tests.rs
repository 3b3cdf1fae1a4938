//! Unit tests for pl-buffer.

use std::cell::RefCell;
use std::rc::Rc;

use pl_core::{BufferSpec, FlowError, LocationId, Part, PartId, PartSpec, SimTime, Sink};
use pl_kernel::EventScheduler;

use crate::{ContainerBuffer, StoreBuffer};

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn push(log: &Log, entry: impl Into<String>) {
    log.borrow_mut().push(entry.into());
}

fn part(n: u64) -> Part {
    Part::new(PartSpec::new(PartId(n), format!("part-{n}"))).unwrap()
}

fn spec(name: &str) -> BufferSpec {
    BufferSpec::new(LocationId(7), name)
}

// ── Store buffer ──────────────────────────────────────────────────────────────

mod store {
    use super::*;

    fn store(sched: &EventScheduler, spec: &BufferSpec) -> StoreBuffer {
        StoreBuffer::new(sched.handle(), Sink::none(), spec).unwrap()
    }

    #[test]
    fn items_come_out_oldest_first() {
        let sched = EventScheduler::new();
        let buf = store(&sched, &spec("staging"));
        for n in [3, 1, 2] {
            drop(buf.put(part(n)));
        }
        assert_eq!(buf.part_ids(), vec![PartId(3), PartId(1), PartId(2)]);
    }

    #[test]
    fn get_suspends_until_a_put_arrives() {
        let mut sched = EventScheduler::new();
        let buf = store(&sched, &spec("staging"));
        let out = log();
        {
            let (buf, out) = (buf.clone(), out.clone());
            let h = sched.handle();
            sched.spawn(async move {
                let got = buf.get().await.unwrap();
                push(&out, format!("{}@{}", got.id(), h.now().0));
            });
        }
        {
            let (buf, h) = (buf.clone(), sched.handle());
            sched.spawn(async move {
                h.timeout(SimTime(2.0)).unwrap().await.unwrap();
                buf.put(part(9)).await.unwrap();
            });
        }
        sched.run_until(SimTime(5.0)).unwrap();
        assert_eq!(*out.borrow(), vec!["PartId(9)@2"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn put_blocks_at_capacity_until_a_get_frees_a_slot() {
        let mut sched = EventScheduler::new();
        let buf = store(&sched, &spec("staging").with_capacity(1.0));
        let out = log();
        drop(buf.put(part(1)));
        {
            let (buf, out) = (buf.clone(), out.clone());
            let h = sched.handle();
            sched.spawn(async move {
                buf.put(part(2)).await.unwrap();
                push(&out, format!("stored@{}", h.now().0));
            });
        }
        {
            let (buf, h) = (buf.clone(), sched.handle());
            sched.spawn(async move {
                h.timeout(SimTime(3.0)).unwrap().await.unwrap();
                let got = buf.get().await.unwrap();
                assert_eq!(got.id(), PartId(1));
            });
        }
        sched.run_until(SimTime(10.0)).unwrap();
        assert_eq!(*out.borrow(), vec!["stored@3"]);
        // The freed slot admitted the pending put in the same step.
        assert_eq!(buf.part_ids(), vec![PartId(2)]);
        assert_eq!(buf.waiting_puts(), 0);
    }

    #[test]
    fn pending_gets_are_served_in_issue_order() {
        let mut sched = EventScheduler::new();
        let buf = store(&sched, &spec("staging"));
        let out = log();
        for tag in ["first", "second"] {
            let (buf, out) = (buf.clone(), out.clone());
            sched.spawn(async move {
                let got = buf.get().await.unwrap();
                push(&out, format!("{tag}:{}", got.id().0));
            });
        }
        {
            let buf = buf.clone();
            let h = sched.handle();
            sched.spawn(async move {
                h.timeout(SimTime(1.0)).unwrap().await.unwrap();
                buf.put(part(10)).await.unwrap();
                buf.put(part(11)).await.unwrap();
            });
        }
        sched.run_until(SimTime(5.0)).unwrap();
        assert_eq!(*out.borrow(), vec!["first:10", "second:11"]);
    }

    #[test]
    fn admission_appends_the_buffer_to_the_part_path() {
        let mut sched = EventScheduler::new();
        let buf = store(&sched, &spec("staging"));
        let out = log();
        {
            let (buf, out) = (buf.clone(), out.clone());
            sched.spawn(async move {
                buf.put(part(1)).await.unwrap();
                let got = buf.get().await.unwrap();
                push(&out, format!("{:?}", got.path()));
            });
        }
        sched.run_until(SimTime(1.0)).unwrap();
        assert_eq!(*out.borrow(), vec!["[LocationId(7)]"]);
    }

    #[test]
    fn pass_through_hand_off_still_records_the_visit() {
        let mut sched = EventScheduler::new();
        let buf = store(&sched, &spec("staging"));
        let out = log();
        {
            let (buf, out) = (buf.clone(), out.clone());
            sched.spawn(async move {
                let got = buf.get().await.unwrap();
                push(&out, format!("{:?}", got.path()));
            });
        }
        {
            let buf = buf.clone();
            let h = sched.handle();
            sched.spawn(async move {
                h.timeout(SimTime(1.0)).unwrap().await.unwrap();
                buf.put(part(1)).await.unwrap();
            });
        }
        sched.run_until(SimTime(2.0)).unwrap();
        assert_eq!(*out.borrow(), vec!["[LocationId(7)]"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn fractional_capacity_is_rejected() {
        let sched = EventScheduler::new();
        let err = StoreBuffer::new(
            sched.handle(),
            Sink::none(),
            &spec("staging").with_capacity(2.5),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }

    #[test]
    fn nonzero_initial_level_is_rejected() {
        let sched = EventScheduler::new();
        let err = StoreBuffer::new(
            sched.handle(),
            Sink::none(),
            &spec("staging").with_initial_level(1.0),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }
}

// ── Container buffer ──────────────────────────────────────────────────────────

mod container {
    use super::*;

    fn container(sched: &EventScheduler, spec: &BufferSpec) -> ContainerBuffer {
        ContainerBuffer::new(sched.handle(), Sink::none(), spec).unwrap()
    }

    #[test]
    fn initial_level_is_honored() {
        let sched = EventScheduler::new();
        let buf = container(&sched, &spec("tank").with_capacity(20.0).with_initial_level(5.0));
        assert_eq!(buf.level(), 5.0);
        assert_eq!(buf.capacity(), Some(20.0));
    }

    #[test]
    fn get_waits_for_the_full_amount() {
        let mut sched = EventScheduler::new();
        let buf = container(&sched, &spec("tank").with_capacity(15.0));
        let out = log();
        {
            let (buf, out) = (buf.clone(), out.clone());
            let h = sched.handle();
            sched.spawn(async move {
                let taken = buf.get(7.0).unwrap().await.unwrap();
                push(&out, format!("{taken}@{}", h.now().0));
            });
        }
        {
            let buf = buf.clone();
            let h = sched.handle();
            sched.spawn(async move {
                for delay in [1.0, 1.0] {
                    h.timeout(SimTime(delay)).unwrap().await.unwrap();
                    buf.put(5.0).unwrap().await.unwrap();
                }
            });
        }
        sched.run_until(SimTime(5.0)).unwrap();
        // Five units at t=1 are not enough; the second five at t=2 are.
        assert_eq!(*out.borrow(), vec!["7@2"]);
        assert_eq!(buf.level(), 3.0);
    }

    #[test]
    fn pending_get_leaves_the_level_untouched() {
        let mut sched = EventScheduler::new();
        let buf = container(&sched, &spec("tank").with_initial_level(5.0));
        {
            let buf = buf.clone();
            sched.spawn(async move {
                buf.get(7.0).unwrap().await.unwrap();
            });
        }
        sched.run_until(SimTime(1.0)).unwrap();
        assert_eq!(buf.level(), 5.0);
        assert_eq!(buf.waiting_gets(), 1);
    }

    #[test]
    fn a_large_front_get_blocks_a_small_later_one() {
        let mut sched = EventScheduler::new();
        let buf = container(&sched, &spec("tank"));
        let out = log();
        for (tag, amount) in [("large", 10.0), ("small", 1.0)] {
            let (buf, out) = (buf.clone(), out.clone());
            sched.spawn(async move {
                buf.get(amount).unwrap().await.unwrap();
                push(&out, tag);
            });
        }
        {
            let buf = buf.clone();
            let h = sched.handle();
            sched.spawn(async move {
                h.timeout(SimTime(1.0)).unwrap().await.unwrap();
                buf.put(5.0).unwrap().await.unwrap();
                h.timeout(SimTime(1.0)).unwrap().await.unwrap();
                buf.put(6.0).unwrap().await.unwrap();
            });
        }
        sched.run_until(SimTime(5.0)).unwrap();
        // The five units at t=1 could satisfy "small" but must not overtake
        // "large"; both resolve once eleven units have arrived.
        assert_eq!(*out.borrow(), vec!["large", "small"]);
        assert_eq!(buf.level(), 0.0);
    }

    #[test]
    fn put_blocks_until_room_for_the_full_amount() {
        let mut sched = EventScheduler::new();
        let buf = container(&sched, &spec("tank").with_capacity(10.0).with_initial_level(10.0));
        let out = log();
        {
            let (buf, out) = (buf.clone(), out.clone());
            let h = sched.handle();
            sched.spawn(async move {
                buf.put(3.0).unwrap().await.unwrap();
                push(&out, format!("deposited@{}", h.now().0));
            });
        }
        {
            let buf = buf.clone();
            let h = sched.handle();
            sched.spawn(async move {
                h.timeout(SimTime(1.0)).unwrap().await.unwrap();
                buf.get(5.0).unwrap().await.unwrap();
            });
        }
        sched.run_until(SimTime(3.0)).unwrap();
        assert_eq!(*out.borrow(), vec!["deposited@1"]);
        assert_eq!(buf.level(), 8.0);
        assert_eq!(buf.waiting_puts(), 0);
    }

    #[test]
    fn non_positive_and_non_finite_amounts_fail_synchronously() {
        let sched = EventScheduler::new();
        let buf = container(&sched, &spec("tank"));
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                buf.get(bad).unwrap_err(),
                FlowError::InvalidQuantity(_)
            ));
            assert!(matches!(
                buf.put(bad).unwrap_err(),
                FlowError::InvalidQuantity(_)
            ));
        }
    }

    #[test]
    fn initial_level_above_capacity_is_rejected() {
        let sched = EventScheduler::new();
        let err = ContainerBuffer::new(
            sched.handle(),
            Sink::none(),
            &spec("tank").with_capacity(5.0).with_initial_level(6.0),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }
}
