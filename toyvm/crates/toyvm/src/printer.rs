//! Printer - textual rendering of heap values.
//!
//! Scalars print as their value and pairs in dotted form, `(1 . 2)`. A pair
//! met again while it is still being printed prints as `...`, so cyclic
//! structures render finitely. Shared but acyclic values print in full at
//! every occurrence.

use std::collections::HashSet;
use toygc::{GcError, Handle, Heap, Value};

/// Default cap on rendered output, in bytes
pub const DEFAULT_RENDER_LIMIT: usize = 4096;

const ELLIPSIS: &str = "...";

enum Step {
    Enter(Handle),
    Text(&'static str),
    Leave(Handle),
}

/// Renders values of one heap
pub struct Printer<'a> {
    heap: &'a Heap,
    limit: usize,
}

impl<'a> Printer<'a> {
    pub fn new(heap: &'a Heap) -> Self {
        Self {
            heap,
            limit: DEFAULT_RENDER_LIMIT,
        }
    }

    /// Stop after roughly `limit` bytes and end the output with `...`
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Render the value behind `handle`
    ///
    /// Walks the graph with an explicit work list, so long chains do not
    /// grow the call stack.
    pub fn render(&self, handle: Handle) -> Result<String, GcError> {
        let mut out = String::new();
        let mut on_path: HashSet<Handle> = HashSet::new();
        let mut work = vec![Step::Enter(handle)];

        while let Some(step) = work.pop() {
            if out.len() > self.limit {
                out.push_str(ELLIPSIS);
                break;
            }

            match step {
                Step::Enter(handle) => {
                    if on_path.contains(&handle) {
                        out.push_str(ELLIPSIS);
                        continue;
                    }
                    match *self.heap.get(handle)? {
                        Value::Scalar(value) => out.push_str(&value.to_string()),
                        Value::Pair { first, second } => {
                            on_path.insert(handle);
                            out.push('(');
                            work.push(Step::Leave(handle));
                            work.push(Step::Text(")"));
                            work.push(Step::Enter(second));
                            work.push(Step::Text(" . "));
                            work.push(Step::Enter(first));
                        },
                    }
                },
                Step::Text(text) => out.push_str(text),
                Step::Leave(handle) => {
                    on_path.remove(&handle);
                },
            }
        }

        Ok(out)
    }
}
