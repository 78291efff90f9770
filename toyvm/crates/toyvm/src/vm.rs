//! Vm - the toy stack machine.
//!
//! The machine's value stack is the collector's root stack: every value the
//! program can still reach is either on it or reachable from a pair on it.
//! All instructions go through the `Heap` API, so collections happen exactly
//! when an allocation crosses the threshold or on an explicit `gc`.

use crate::error::Result;
use crate::op::{Op, Program};
use crate::printer::Printer;
use toygc::{CycleStats, GcConfig, GcError, GcSummary, Handle, Heap};

/// Toy stack machine
#[derive(Debug)]
pub struct Vm {
    heap: Heap,
    /// Instructions executed so far
    steps: u64,
}

impl Vm {
    /// Create a machine whose heap uses `config`
    pub fn new(config: GcConfig) -> Result<Self> {
        Ok(Self {
            heap: Heap::new(config)?,
            steps: 0,
        })
    }

    /// Machine with default configuration and the given initial threshold
    pub fn with_threshold(initial_threshold: usize) -> Result<Self> {
        Self::new(GcConfig::with_initial_threshold(initial_threshold))
    }

    /// Allocate a scalar and push it
    pub fn push_int(&mut self, value: i64) -> Result<Handle> {
        Ok(self.heap.push_scalar(value)?)
    }

    /// Pair the two topmost values; the top value becomes `first`
    pub fn push_pair(&mut self) -> Result<Handle> {
        Ok(self.heap.push_pair()?)
    }

    /// Drop the top value
    pub fn pop(&mut self) -> Result<Handle> {
        Ok(self.heap.pop_root()?)
    }

    /// Point `first` of `pair` at `target`
    pub fn set_first(&mut self, pair: Handle, target: Handle) -> Result<()> {
        Ok(self.heap.set_first(pair, target)?)
    }

    /// Point `second` of `pair` at `target`
    pub fn set_second(&mut self, pair: Handle, target: Handle) -> Result<()> {
        Ok(self.heap.set_second(pair, target)?)
    }

    /// Execute one instruction
    ///
    /// A failing instruction leaves the stack as it was.
    pub fn execute(&mut self, op: Op) -> Result<()> {
        log::trace!("step {}: {}", self.steps, op);

        match op {
            Op::PushInt(value) => {
                self.heap.push_scalar(value)?;
            },
            Op::PushPair => {
                self.heap.push_pair()?;
            },
            Op::Pop => {
                self.heap.pop_root()?;
            },
            Op::Dup => {
                let top = self.operand(0)?;
                self.heap.push_root(top)?;
            },
            Op::Swap => {
                let top = self.operand(0)?;
                let below = self.operand(1)?;
                self.heap.pop_root()?;
                self.heap.pop_root()?;
                self.heap.push_root(top)?;
                self.heap.push_root(below)?;
            },
            Op::Over => {
                let below = self.operand(1)?;
                self.heap.push_root(below)?;
            },
            Op::SetFirst | Op::SetSecond => {
                let value = self.operand(0)?;
                let pair = self.operand(1)?;
                if op == Op::SetFirst {
                    self.heap.set_first(pair, value)?;
                } else {
                    self.heap.set_second(pair, value)?;
                }
                self.heap.pop_root()?;
            },
            Op::Collect => {
                self.heap.collect();
            },
        }

        self.steps += 1;
        Ok(())
    }

    /// Execute every instruction of `program` in order
    ///
    /// Stops at the first failing instruction.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        for op in program.ops() {
            self.execute(*op)?;
        }
        log::debug!(
            "program finished: {} instructions, {} live objects",
            program.len(),
            self.heap.live_object_count()
        );
        Ok(())
    }

    /// Parse and run program text
    pub fn run_source(&mut self, source: &str) -> Result<()> {
        let program = Program::parse(source)?;
        self.run(&program)
    }

    /// Run a collection now
    pub fn collect(&mut self) -> CycleStats {
        self.heap.collect()
    }

    /// Value stack, bottom first
    pub fn stack(&self) -> &[Handle] {
        self.heap.roots().as_slice()
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Instructions executed so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Collector summary for this machine's heap
    pub fn summary(&self) -> GcSummary {
        self.heap.summary()
    }

    /// Render a value, e.g. `(1 . 2)`
    pub fn render(&self, handle: Handle) -> Result<String> {
        Ok(Printer::new(&self.heap).render(handle)?)
    }

    /// Render the whole stack, bottom first, one value per entry
    pub fn render_stack(&self) -> Result<Vec<String>> {
        self.stack()
            .iter()
            .map(|handle| self.render(*handle))
            .collect()
    }

    /// Handle `depth` entries below the top of the stack
    fn operand(&self, depth: usize) -> Result<Handle> {
        Ok(self
            .heap
            .roots()
            .peek_at(depth)
            .ok_or(GcError::RootStackUnderflow)?)
    }
}
