/*!

  `mipstrace` is an instruction-level tracing interpreter for a fixed subset of a
  32-bit MIPS-style load/store instruction set. It exists to run small generated
  programs one instruction at a time and expose the full machine state at every
  step: each run produces a trace of state snapshots whose words serialize to the
  canonical 32-character binary-string form.

  It is deliberately not a full CPU. The opcode set covers the arithmetic,
  multiply, memory, and indirect-jump instructions a simple code generator emits;
  everything else the decoder recognizes faults cleanly instead of being
  approximated. There is no floating point, no interrupts, and no pipelining.

*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod word;
pub mod registers;
pub mod isa;
pub mod state;
pub mod machine;

pub use machine::{execute_listing, Fault, Machine, RunOutcome, StepOutcome, Trace};
pub use state::MachineState;
