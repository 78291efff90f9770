//! Stack Machine Tests - Scenarios and Programs
//!
//! These tests drive the collector through the machine:
//! - Every demonstration scenario under several heap configurations
//! - The bundled demo programs
//! - Partial reachability through pairs

use std::path::PathBuf;
use toygc::{GcConfig, GcError, Value};
use toyvm::{run_scenario, scenario, Op, Program, Vm, VmError};

fn demo(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}

/// ============================================================================
/// SCENARIOS
/// ============================================================================

#[test]
fn test_scenarios_pass_across_thresholds() {
    for threshold in [1, 2, 3, 8, 64, 10_000] {
        for scenario in scenario::all() {
            let report = run_scenario(&scenario, GcConfig::with_initial_threshold(threshold))
                .unwrap_or_else(|e| panic!("threshold {}: {}", threshold, e));
            assert_eq!(
                report.live_objects, scenario.expected_live,
                "threshold {}: {}",
                threshold, scenario.name
            );
        }
    }
}

#[test]
fn test_scenarios_pass_without_threshold_floor() {
    let config = GcConfig {
        floor_at_initial: false,
        ..Default::default()
    };
    for scenario in scenario::all() {
        run_scenario(&scenario, config.clone())
            .unwrap_or_else(|e| panic!("{}: {}", scenario.name, e));
    }
}

#[test]
fn test_scenario_fails_when_stack_too_small() {
    let config = GcConfig {
        root_capacity: 1,
        ..Default::default()
    };
    let scenarios = scenario::all();

    let err = run_scenario(&scenarios[0], config).unwrap_err();

    assert!(matches!(
        err,
        VmError::Gc(GcError::RootStackOverflow { capacity: 1 })
    ));
}

/// ============================================================================
/// DEMO PROGRAMS
/// ============================================================================

#[test]
fn test_nested_demo() {
    let mut vm = Vm::with_threshold(8).unwrap();
    vm.run(&Program::parse(&demo("nested.vm")).unwrap()).unwrap();

    assert_eq!(vm.heap().live_object_count(), 11);
    assert_eq!(
        vm.render_stack().unwrap(),
        vec!["(((6 . 5) . (4 . 3)) . (2 . 1))"]
    );
}

#[test]
fn test_cycle_demo() {
    let program = Program::parse(&demo("cycle.vm")).unwrap();
    let (body, tail) = program.ops().split_at(program.len() - 3);
    assert_eq!(tail, &[Op::Pop, Op::Pop, Op::Collect]);

    let mut vm = Vm::with_threshold(8).unwrap();
    vm.run(&Program::new(body.to_vec())).unwrap();
    assert_eq!(
        vm.render_stack().unwrap(),
        vec!["(4 . (2 . ...))", "(2 . (4 . ...))"]
    );

    vm.run(&Program::new(tail.to_vec())).unwrap();
    assert_eq!(vm.heap().live_object_count(), 0);
}

#[test]
fn test_churn_demo() {
    let mut vm = Vm::with_threshold(8).unwrap();
    vm.run(&Program::parse(&demo("churn.vm")).unwrap()).unwrap();

    assert_eq!(vm.heap().cycle_count(), 1);
    assert_eq!(vm.heap().live_object_count(), 5);
    assert_eq!(vm.render_stack().unwrap(), vec!["13"]);
}

/// ============================================================================
/// REACHABILITY THROUGH THE MACHINE
/// ============================================================================

/// A = (C . C) and an unrelated B; dropping B keeps A and C
#[test]
fn test_partial_reachability() {
    let mut vm = Vm::with_threshold(8).unwrap();
    let c = vm.push_int(3).unwrap();
    vm.execute(Op::Dup).unwrap();
    let a = vm.push_pair().unwrap();
    let b = vm.push_int(7).unwrap();

    vm.pop().unwrap();
    let stats = vm.collect();

    assert_eq!(stats.reclaimed, 1);
    assert!(!vm.heap().is_live(b));
    assert_eq!(vm.heap().get(a).unwrap(), &Value::pair(c, c));
    assert_eq!(vm.heap().get(c).unwrap(), &Value::scalar(3));
}

#[test]
fn test_threshold_after_collect_at_least_twice_live() {
    let mut vm = Vm::with_threshold(2).unwrap();
    vm.run_source("push 1 push 2 push 3 pair push 4").unwrap();

    vm.collect();

    let live = vm.heap().live_object_count();
    assert_eq!(live, 5);
    assert!(vm.heap().threshold() >= 2 * live);

    let cycles = vm.heap().cycle_count();
    vm.push_int(5).unwrap();
    assert_eq!(vm.heap().cycle_count(), cycles, "next allocation must not collect");
}

#[test]
fn test_marks_clear_after_collect() {
    let mut vm = Vm::with_threshold(4).unwrap();
    vm.run_source("push 1 push 2 pair dup setsnd push 3 push 4 gc").unwrap();

    for handle in vm.stack() {
        assert!(!vm.heap().is_marked(*handle).unwrap());
    }
    assert!(vm.heap().verify().is_ok());
}
