//! Demonstration scenarios.
//!
//! Each scenario drives a fresh machine and states how many objects must be
//! live once it finishes. Intermediate expectations are checked inside the
//! body and reported the same way.

use crate::error::{Result, VmError};
use crate::op::Op;
use crate::vm::Vm;
use serde::Serialize;
use toygc::GcConfig;

/// A named program with a known outcome
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    /// Live objects once `body` has returned
    pub expected_live: usize,
    body: fn(&mut Vm) -> Result<()>,
}

/// Outcome of a passed scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub live_objects: usize,
    pub collections: u64,
    pub reclaimed: u64,
}

/// All scenarios, in presentation order
pub fn all() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "Objects on stack are preserved",
            description: "Two rooted scalars survive a collection",
            expected_live: 2,
            body: preserved_on_stack,
        },
        Scenario {
            name: "Unreached objects are collected",
            description: "Two scalars popped before a collection are reclaimed",
            expected_live: 0,
            body: unreached_collected,
        },
        Scenario {
            name: "Reach nested objects",
            description: "A tree of pairs survives as a whole, then is reclaimed as a whole",
            expected_live: 0,
            body: nested_objects,
        },
        Scenario {
            name: "Handle cycles",
            description: "Two pairs pointing at each other are reclaimed once unrooted",
            expected_live: 0,
            body: handle_cycles,
        },
        Scenario {
            name: "Threshold-triggered collection",
            description: "Garbage from many allocations stays bounded without explicit collections",
            expected_live: 1,
            body: threshold_triggered,
        },
    ]
}

/// Run `scenario` on a fresh machine
///
/// # Errors
/// `ScenarioFailed` when a live count differs from the expectation; any
/// machine error raised by the body.
pub fn run_scenario(scenario: &Scenario, config: GcConfig) -> Result<ScenarioReport> {
    let mut vm = Vm::new(config)?;
    (scenario.body)(&mut vm)?;

    expect_live(&vm, scenario.name, scenario.expected_live)?;
    log::debug!("scenario '{}' passed", scenario.name);

    Ok(ScenarioReport {
        name: scenario.name.to_string(),
        live_objects: vm.heap().live_object_count(),
        collections: vm.heap().cycle_count(),
        reclaimed: vm.heap().stats().total_reclaimed(),
    })
}

fn expect_live(vm: &Vm, name: &str, expected: usize) -> Result<()> {
    let actual = vm.heap().live_object_count();
    if actual == expected {
        Ok(())
    } else {
        Err(VmError::ScenarioFailed {
            name: name.to_string(),
            expected,
            actual,
        })
    }
}

fn preserved_on_stack(vm: &mut Vm) -> Result<()> {
    vm.push_int(1)?;
    vm.push_int(2)?;
    vm.collect();
    Ok(())
}

fn unreached_collected(vm: &mut Vm) -> Result<()> {
    vm.push_int(1)?;
    vm.push_int(2)?;
    vm.pop()?;
    vm.pop()?;
    vm.collect();
    Ok(())
}

fn nested_objects(vm: &mut Vm) -> Result<()> {
    vm.push_int(1)?;
    vm.push_int(2)?;
    vm.push_pair()?;
    vm.push_int(3)?;
    vm.push_int(4)?;
    vm.push_pair()?;
    vm.push_int(5)?;
    vm.push_int(6)?;
    vm.push_pair()?;
    vm.push_pair()?;
    vm.push_pair()?;

    // Six scalars, three leaf pairs, the inner pair and the outer pair
    vm.collect();
    expect_live(vm, "Reach nested objects (rooted)", 11)?;

    vm.pop()?;
    vm.collect();
    Ok(())
}

fn handle_cycles(vm: &mut Vm) -> Result<()> {
    vm.push_int(1)?;
    vm.push_int(2)?;
    let a = vm.push_pair()?;
    vm.push_int(3)?;
    vm.push_int(4)?;
    let b = vm.push_pair()?;

    vm.set_second(a, b)?;
    vm.set_second(b, a)?;

    vm.pop()?;
    vm.pop()?;
    vm.collect();
    Ok(())
}

fn threshold_triggered(vm: &mut Vm) -> Result<()> {
    let bound = vm.heap().config().initial_threshold;
    let mut peak = 0;

    for value in 0..1_000 {
        vm.execute(Op::PushInt(value))?;
        vm.execute(Op::Pop)?;
        peak = peak.max(vm.heap().live_object_count());
    }
    if peak > bound {
        return Err(VmError::ScenarioFailed {
            name: "Threshold-triggered collection (peak)".to_string(),
            expected: bound,
            actual: peak,
        });
    }

    vm.push_int(1_000)?;
    vm.collect();
    Ok(())
}
