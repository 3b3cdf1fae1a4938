//! Unit tests for pl-resource.

use std::cell::RefCell;
use std::rc::Rc;

use pl_core::{FlowError, SimTime, Sink};
use pl_kernel::EventScheduler;

use crate::ResourcePool;

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn push(log: &Log, entry: impl Into<String>) {
    log.borrow_mut().push(entry.into());
}

fn pool(sched: &EventScheduler, capacity: usize) -> ResourcePool {
    ResourcePool::new(sched.handle(), Sink::none(), "machines", capacity).unwrap()
}

#[test]
fn grants_complete_immediately_while_below_capacity() {
    let mut sched = EventScheduler::new();
    let p = pool(&sched, 2);
    let out = log();
    {
        let (p, out) = (p.clone(), out.clone());
        let h = sched.handle();
        sched.spawn(async move {
            let mut a = p.request().await.unwrap();
            let mut b = p.request().await.unwrap();
            push(&out, format!("both@{}", h.now().0));
            p.release(&mut a).unwrap();
            p.release(&mut b).unwrap();
        });
    }
    sched.run_until(SimTime(1.0)).unwrap();
    assert_eq!(*out.borrow(), vec!["both@0"]);
    assert_eq!(p.held(), 0);
}

#[test]
fn a_request_past_capacity_waits_for_a_release() {
    let mut sched = EventScheduler::new();
    let p = pool(&sched, 2);
    let out = log();
    // Two holders claim both slots at t=0 and keep them until t=3.
    for _ in 0..2 {
        let p = p.clone();
        let h = sched.handle();
        sched.spawn(async move {
            let mut token = p.request().await.unwrap();
            h.timeout(SimTime(3.0)).unwrap().await.unwrap();
            p.release(&mut token).unwrap();
        });
    }
    {
        let (p, out) = (p.clone(), out.clone());
        let h = sched.handle();
        sched.spawn(async move {
            let mut token = p.request().await.unwrap();
            push(&out, format!("granted@{}", h.now().0));
            p.release(&mut token).unwrap();
        });
    }
    sched.run_until(SimTime(1.0)).unwrap();
    assert_eq!(p.held(), 2);
    assert_eq!(p.waiting(), 1);
    sched.run_until(SimTime(5.0)).unwrap();
    assert_eq!(*out.borrow(), vec!["granted@3"]);
    assert_eq!(p.held(), 0);
    assert_eq!(p.waiting(), 0);
}

#[test]
fn waiters_are_granted_in_request_order() {
    let mut sched = EventScheduler::new();
    let p = pool(&sched, 1);
    let out = log();
    {
        let p = p.clone();
        let h = sched.handle();
        sched.spawn(async move {
            let mut token = p.request().await.unwrap();
            h.timeout(SimTime(1.0)).unwrap().await.unwrap();
            p.release(&mut token).unwrap();
        });
    }
    for tag in ["first", "second", "third"] {
        let (p, out) = (p.clone(), out.clone());
        sched.spawn(async move {
            let mut token = p.request().await.unwrap();
            push(&out, tag);
            p.release(&mut token).unwrap();
        });
    }
    sched.run_until(SimTime(2.0)).unwrap();
    assert_eq!(*out.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn each_grant_mints_a_fresh_token() {
    let mut sched = EventScheduler::new();
    let p = pool(&sched, 1);
    let out = log();
    {
        let (p, out) = (p.clone(), out.clone());
        sched.spawn(async move {
            for _ in 0..3 {
                let mut token = p.request().await.unwrap();
                push(&out, format!("{}", token.id()));
                p.release(&mut token).unwrap();
            }
        });
    }
    sched.run_until(SimTime(1.0)).unwrap();
    assert_eq!(*out.borrow(), vec!["TokenId(0)", "TokenId(1)", "TokenId(2)"]);
}

#[test]
fn releasing_twice_is_an_error() {
    let mut sched = EventScheduler::new();
    let p = pool(&sched, 1);
    let out = log();
    {
        let (p, out) = (p.clone(), out.clone());
        sched.spawn(async move {
            let mut token = p.request().await.unwrap();
            p.release(&mut token).unwrap();
            match p.release(&mut token) {
                Err(FlowError::DoubleRelease) => push(&out, "rejected"),
                other => push(&out, format!("unexpected: {other:?}")),
            }
        });
    }
    sched.run_until(SimTime(1.0)).unwrap();
    assert_eq!(*out.borrow(), vec!["rejected"]);
    assert_eq!(p.held(), 0);
}

#[test]
fn zero_capacity_is_rejected() {
    let sched = EventScheduler::new();
    let err = ResourcePool::new(sched.handle(), Sink::none(), "machines", 0).unwrap_err();
    assert!(matches!(err, FlowError::Config(_)));
}
