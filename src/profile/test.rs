use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use super::{Error, Failures, Op, RawProfile, RawProfiler, Timing};
use crate::config::{Cpu, Opts, Priv, Proc, Target};
use crate::count::{Handle, Stat};
use crate::event::raw::Stall;
use crate::event::{Catalog, EventDesc};

type Calls = Rc<RefCell<Vec<(String, Op)>>>;

/// Scripted counter: fails on the listed operations, reads `stat` otherwise.
struct Fake {
    name: String,
    fails: Vec<Op>,
    stat: Stat,
    calls: Calls,
}

impl Fake {
    fn call(&self, op: Op) -> io::Result<()> {
        self.calls.borrow_mut().push((self.name.clone(), op));
        if self.fails.contains(&op) {
            Err(io::Error::other(format!("{} {}", op, self.name)))
        } else {
            Ok(())
        }
    }
}

impl Handle for Fake {
    fn enable(&self) -> io::Result<()> {
        self.call(Op::Start)
    }

    fn disable(&self) -> io::Result<()> {
        self.call(Op::Stop)
    }

    fn clear_count(&self) -> io::Result<()> {
        self.call(Op::Reset)
    }

    fn stat(&self) -> io::Result<Stat> {
        self.call(Op::Read).map(|_| self.stat)
    }

    fn close(self) -> io::Result<()> {
        self.call(Op::Close)
    }
}

#[derive(Clone, Default)]
struct Plan {
    fails: Vec<Op>,
    count: u64,
    timing: (u64, u64),
}

fn stat(count: u64, timing: (u64, u64)) -> Stat {
    Stat {
        count,
        time_enabled: timing.0,
        time_running: timing.1,
    }
}

// Events missing from `plans` fail to open.
fn open(
    catalog: &Catalog,
    plans: &HashMap<&str, Plan>,
    calls: &Calls,
) -> (RawProfiler<Fake>, Failures) {
    let target = (Proc::CURRENT, Cpu::ALL);
    RawProfiler::open_with(catalog, target, &Opts::default(), |event, _, _| {
        calls.borrow_mut().push((event.name.clone(), Op::Open));
        let plan = plans
            .get(event.name.as_str())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        Ok(Fake {
            name: event.name.clone(),
            fails: plan.fails.clone(),
            stat: stat(plan.count, plan.timing),
            calls: Rc::clone(calls),
        })
    })
}

fn ab() -> Catalog {
    Catalog::new(vec![EventDesc::raw("A", 0x10), EventDesc::raw("B", 0x20)]).unwrap()
}

fn calls_of(calls: &Calls, op: Op) -> Vec<String> {
    calls
        .borrow()
        .iter()
        .filter(|(_, it)| *it == op)
        .map(|(name, _)| name.clone())
        .collect()
}

#[test]
fn test_open_every_subset() {
    let catalog = Catalog::default();

    for mask in 0..(1u32 << Stall::ALL.len()) {
        let opened: Vec<_> = Stall::ALL
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, it)| it)
            .collect();
        let plans: HashMap<_, _> = opened
            .iter()
            .map(|it| {
                let plan = Plan {
                    count: it.config(),
                    ..Default::default()
                };
                (it.name(), plan)
            })
            .collect();

        let calls = Calls::default();
        let (profiler, failures) = open(&catalog, &plans, &calls);
        assert_eq!(profiler.len(), opened.len());
        assert_eq!(failures.len(), Stall::ALL.len() - opened.len());
        // Every event is attempted once, failures do not stop the rest.
        assert_eq!(calls_of(&calls, Op::Open).len(), Stall::ALL.len());

        if opened.is_empty() {
            assert!(matches!(profiler.profile(), Err(Error::NoProfiler)));
            continue;
        }

        let (profile, failures) = profiler.profile().unwrap();
        assert!(failures.is_empty());
        for stall in Stall::ALL {
            let expected = opened.contains(&stall).then(|| stall.config());
            assert_eq!(profile.stall(stall), expected);
        }
        assert!(profile.extra.is_empty());
    }
}

#[test]
fn test_open_forwards_target_and_opts() {
    let opts = Opts {
        exclude: Priv {
            kernel: true,
            ..Default::default()
        },
        inherit: true,
        ..Default::default()
    };
    let seen: RefCell<Vec<(String, Target, Opts)>> = RefCell::default();
    let calls = Calls::default();

    let (profiler, failures) =
        RawProfiler::open_with(&ab(), (Proc(42), Cpu(3)), &opts, |event, target, opts| {
            seen.borrow_mut()
                .push((event.name.clone(), *target, opts.clone()));
            Ok(Fake {
                name: event.name.clone(),
                fails: vec![],
                stat: stat(0, (0, 0)),
                calls: Rc::clone(&calls),
            })
        });
    assert!(failures.is_empty());
    assert_eq!(profiler.len(), 2);

    let seen = seen.into_inner();
    assert_eq!(
        seen.iter().map(|(name, ..)| name.as_str()).collect::<Vec<_>>(),
        ["A", "B"]
    );
    for (_, target, forwarded) in &seen {
        assert_eq!(target.pid(), 42);
        assert_eq!(target.cpu(), 3);
        assert_eq!(forwarded, &opts);
    }
}

#[test]
fn test_start_without_counters() {
    let calls = Calls::default();

    // Every open failed.
    let (profiler, failures) = open(&ab(), &HashMap::new(), &calls);
    assert!(profiler.is_empty());
    assert_eq!(failures.events().collect::<Vec<_>>(), ["A", "B"]);
    assert!(failures.iter().all(|it| it.op == Op::Open));
    assert!(matches!(profiler.start(), Err(Error::NoProfiler)));

    // Nothing was attempted.
    let empty = Catalog::new(vec![]).unwrap();
    let (profiler, failures) = open(&empty, &HashMap::new(), &calls);
    assert!(failures.is_empty());
    assert!(matches!(profiler.start(), Err(Error::NoProfiler)));

    assert!(calls_of(&calls, Op::Start).is_empty());
}

#[test]
fn test_lifecycle_without_counters() {
    let calls = Calls::default();
    let (mut profiler, _) = open(&ab(), &HashMap::new(), &calls);

    profiler.reset().unwrap();
    profiler.stop().unwrap();
    profiler.close().unwrap();
}

#[test]
fn test_lifecycle_fan_out() {
    let calls = Calls::default();
    let plans = HashMap::from([
        (
            "A",
            Plan {
                fails: vec![Op::Start, Op::Reset],
                ..Default::default()
            },
        ),
        (
            "B",
            Plan {
                fails: vec![Op::Reset, Op::Stop],
                ..Default::default()
            },
        ),
    ]);
    let (mut profiler, failures) = open(&ab(), &plans, &calls);
    assert!(failures.is_empty());

    match profiler.start() {
        Err(Error::Counters(failures)) => {
            assert_eq!(failures.events().collect::<Vec<_>>(), ["A"]);
        }
        _ => panic!("start should fail on A"),
    }
    // A failing does not keep B from being started.
    assert_eq!(calls_of(&calls, Op::Start), ["A", "B"]);

    match profiler.reset() {
        Err(Error::Counters(failures)) => {
            assert_eq!(failures.len(), 2);
            assert!(failures.iter().all(|it| it.op == Op::Reset));
        }
        _ => panic!("reset should fail on both"),
    }

    match profiler.stop() {
        Err(Error::Counters(failures)) => {
            assert!(failures.contains("B"));
            assert!(!failures.contains("A"));
        }
        _ => panic!("stop should fail on B"),
    }

    profiler.close().unwrap();
    assert_eq!(calls_of(&calls, Op::Close), ["A", "B"]);
}

#[test]
fn test_close_twice() {
    let calls = Calls::default();
    let plans = HashMap::from([
        (
            "A",
            Plan {
                fails: vec![Op::Close],
                ..Default::default()
            },
        ),
        ("B", Plan::default()),
    ]);
    let (mut profiler, _) = open(&ab(), &plans, &calls);

    let err = profiler.close().unwrap_err();
    assert_eq!(err.to_string(), "failed to close `A`: close A");
    assert!(profiler.is_empty());

    // Handles are released on the first close, even the one that failed.
    profiler.close().unwrap();
    assert_eq!(calls_of(&calls, Op::Close), ["A", "B"]);
    assert!(matches!(profiler.start(), Err(Error::NoProfiler)));
}

#[test]
fn test_profile_one_read_fails() {
    let calls = Calls::default();
    let plans = HashMap::from([
        (
            "A",
            Plan {
                count: 7,
                timing: (100, 100),
                ..Default::default()
            },
        ),
        (
            "B",
            Plan {
                fails: vec![Op::Read],
                ..Default::default()
            },
        ),
    ]);
    let (profiler, _) = open(&ab(), &plans, &calls);

    let (profile, failures) = profiler.profile().unwrap();
    assert_eq!(
        profile.timing,
        Some(Timing {
            enabled: 100,
            running: 100,
        })
    );
    assert_eq!(profile.get("A"), Some(7));
    assert_eq!(profile.get("B"), None);
    assert_eq!(profile.len(), 1);

    assert_eq!(failures.len(), 1);
    let failure = failures.iter().next().unwrap();
    assert_eq!(failure.event, "B");
    assert_eq!(failure.op, Op::Read);
}

#[test]
fn test_profile_all_reads_fail() {
    let calls = Calls::default();
    let fails = Plan {
        fails: vec![Op::Read],
        ..Default::default()
    };
    let plans = HashMap::from([("A", fails.clone()), ("B", fails)]);
    let (profiler, _) = open(&ab(), &plans, &calls);

    match profiler.profile() {
        Err(Error::Counters(failures)) => {
            assert_eq!(failures.events().collect::<Vec<_>>(), ["A", "B"]);
            assert_eq!(
                failures.to_string(),
                "failed to read `A`: read A; failed to read `B`: read B"
            );
        }
        _ => panic!("profile should fail when every read fails"),
    }
}

#[test]
fn test_profile_after_open_failure() {
    let calls = Calls::default();
    let plans = HashMap::from([(
        "B",
        Plan {
            count: 3,
            ..Default::default()
        },
    )]);
    let (profiler, failures) = open(&ab(), &plans, &calls);
    assert_eq!(failures.events().collect::<Vec<_>>(), ["A"]);
    assert_eq!(failures.iter().next().unwrap().op, Op::Open);
    assert!(profiler.contains("B"));
    assert!(!profiler.contains("A"));

    profiler.start().unwrap();
    assert_eq!(calls_of(&calls, Op::Start), ["B"]);

    let (profile, failures) = profiler.profile().unwrap();
    assert!(failures.is_empty());
    assert_eq!(profile.values().collect::<Vec<_>>(), [("B", 3)]);
}

#[test]
fn test_profile_timing_from_first_read() {
    let calls = Calls::default();
    let plans = HashMap::from([
        (
            "A",
            Plan {
                fails: vec![Op::Read],
                ..Default::default()
            },
        ),
        (
            "B",
            Plan {
                timing: (200, 150),
                ..Default::default()
            },
        ),
        (
            "C",
            Plan {
                timing: (300, 300),
                ..Default::default()
            },
        ),
    ]);
    let catalog = Catalog::new(vec![
        EventDesc::raw("C", 0x30),
        EventDesc::raw("B", 0x20),
        EventDesc::raw("A", 0x10),
    ])
    .unwrap();
    let (profiler, _) = open(&catalog, &plans, &calls);

    // Counters are visited by ascending config, A fails so B is the first read.
    let (profile, _) = profiler.profile().unwrap();
    assert_eq!(
        profile.timing,
        Some(Timing {
            enabled: 200,
            running: 150,
        })
    );
    assert_eq!(
        profiler.events().map(|it| it.name.as_str()).collect::<Vec<_>>(),
        ["A", "B", "C"]
    );
}

#[test]
fn test_profile_dispatch_by_name() {
    // A custom event sharing a config with a stall event must not land in its field.
    let catalog = Catalog::new(vec![
        EventDesc::raw("custom", Stall::L2Miss.config()),
        Stall::L3Miss.desc(),
    ])
    .unwrap();
    let plans = HashMap::from([
        (
            "custom",
            Plan {
                count: 1,
                ..Default::default()
            },
        ),
        (
            Stall::L3Miss.name(),
            Plan {
                count: 2,
                ..Default::default()
            },
        ),
    ]);
    let calls = Calls::default();
    let (profiler, _) = open(&catalog, &plans, &calls);

    let (profile, _) = profiler.profile().unwrap();
    let expected = RawProfile {
        timing: Some(Timing {
            enabled: 0,
            running: 0,
        }),
        cycle_activity_stalls_l3_miss: Some(2),
        extra: [("custom".to_string(), 1)].into(),
        ..Default::default()
    };
    assert_eq!(profile, expected);
}

#[test]
fn test_error_display() {
    assert_eq!(Error::NoProfiler.to_string(), "no profiler configured");
    assert_eq!(Failures::default().to_string(), "no failures");
}
