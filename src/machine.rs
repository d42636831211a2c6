/*!

  The execution unit and the trace driver. `step` is the decode/execute transition
  function: it classifies the word at the current PC, applies the variant's effect,
  and reports a tagged outcome instead of raising. The driver applies `step` in a
  loop, keeping an immutable snapshot of the state per step, until the machine
  reaches the termination sentinel, faults, or hits the step ceiling.

*/

use std::fmt::{Display, Formatter};

use crate::isa::{decode, parse_listing, ListingError, Variant};
#[cfg(feature = "trace_computation")]
use crate::isa::disassemble;
use crate::registers::TERMINATION_PC;
use crate::state::MachineState;
use crate::word::{split_double_word, DoubleWord, Word};

/// Ceiling on the number of steps a `run` may take before it is cut off. A program
/// that neither halts nor faults would otherwise accumulate trace entries forever.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// A terminal condition raised by a single step. Faults end the run; they are
/// recorded in the trace outcome rather than propagated to the run's caller.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Fault {
  /// The fetched word matches no known instruction pattern.
  UnknownInstruction(Word),
  /// The word matches a recognized opcode the execution unit does not implement.
  UnsupportedInstruction(Variant),
  /// A load from an address no prior write has touched.
  UninitializedMemoryRead(Word)
}

impl Display for Fault {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Fault::UnknownInstruction(word) => {
        write!(f, "unknown instruction {}", word)
      }
      Fault::UnsupportedInstruction(variant) => {
        write!(f, "not supported: {}", variant)
      }
      Fault::UninitializedMemoryRead(address) => {
        write!(f, "read of uninitialized memory at address {}", address)
      }
    }
  }
}

/// The tagged result of one `step`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum StepOutcome {
  Continue,
  Halted,
  Faulted(Fault)
}

/// How a whole run ended.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum RunOutcome {
  Halted,
  Faulted(Fault),
  StepLimitExceeded
}

impl Display for RunOutcome {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      RunOutcome::Halted            => write!(f, "halted"),
      RunOutcome::Faulted(fault)    => write!(f, "faulted: {}", fault),
      RunOutcome::StepLimitExceeded => write!(f, "step limit exceeded")
    }
  }
}

/**
  The ordered record of one run: a snapshot of the machine state per step taken,
  ending in the final (halted or faulted) state, plus the outcome. Append-only
  while the run is live, immutable once it ends.
*/
#[derive(Clone, Debug)]
pub struct Trace {
  pub snapshots: Vec<MachineState>,
  pub outcome: RunOutcome
}

impl Trace {
  /// The number of steps the run took.
  pub fn steps(&self) -> usize {
    // The driver always appends the final state, so there is one snapshot
    // beyond the per-step ones.
    self.snapshots.len().saturating_sub(1)
  }

  /// The last state the run reached.
  pub fn final_state(&self) -> Option<&MachineState> {
    self.snapshots.last()
  }
}

impl Display for Trace {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for (i, snapshot) in self.snapshots.iter().enumerate() {
      writeln!(f, "Step {}", i)?;
      writeln!(f, "{}", snapshot)?;
    }
    write!(f, "Outcome: {}", self.outcome)
  }
}

/// The machine: the state threaded through every step, plus the run's step ceiling.
pub struct Machine {
  state: MachineState,
  step_limit: usize
}

impl Machine {

  // region Construction

  pub fn new(input1: Word, input2: Word, program: &[Word]) -> Machine {
    Machine {
      state: MachineState::initial(input1, input2, program),
      step_limit: DEFAULT_STEP_LIMIT
    }
  }

  pub fn with_step_limit(mut self, step_limit: usize) -> Machine {
    self.step_limit = step_limit;
    self
  }

  pub fn state(&self) -> &MachineState {
    &self.state
  }

  // endregion

  // region Execution

  /**
    Executes the instruction at the current PC. The PC is advanced by 4 before any
    variant-specific effect is applied, so the control-transfer variants overwrite
    the default advance. A step that faults after the advance leaves the advanced
    PC visible in the state.
  */
  pub fn step(&mut self) -> StepOutcome {
    if self.state.pc == TERMINATION_PC {
      return StepOutcome::Halted;
    }

    // An instruction fetch is a read like any other.
    let word = match self.state.memory.get(&self.state.pc) {
      Some(word) => *word,
      None       => return StepOutcome::Faulted(Fault::UninitializedMemoryRead(self.state.pc))
    };
    let instruction = decode(word);

    self.state.pc = self.state.pc.wrapping_add(4);

    match instruction.variant {

      Variant::Add => {
        self.state.registers[instruction.d] =
          self.state.registers[instruction.s].wrapping_add(self.state.registers[instruction.t]);
        StepOutcome::Continue
      }

      Variant::Sub => {
        self.state.registers[instruction.d] =
          self.state.registers[instruction.s].wrapping_sub(self.state.registers[instruction.t]);
        StepOutcome::Continue
      }

      Variant::Mult => {
        let product = (self.state.registers[instruction.s] as i32 as i64)
                    * (self.state.registers[instruction.t] as i32 as i64);
        let words = split_double_word(product as DoubleWord);
        self.state.hi = words.high;
        self.state.lo = words.low;
        StepOutcome::Continue
      }

      Variant::MultU => {
        let product = (self.state.registers[instruction.s] as DoubleWord)
                    * (self.state.registers[instruction.t] as DoubleWord);
        let words = split_double_word(product);
        self.state.hi = words.high;
        self.state.lo = words.low;
        StepOutcome::Continue
      }

      | Variant::Div
      | Variant::DivU
      | Variant::Mfhi
      | Variant::Mflo
      | Variant::Slt
      | Variant::Sltu
      | Variant::Beq
      | Variant::Bne => {
        StepOutcome::Faulted(Fault::UnsupportedInstruction(instruction.variant))
      }

      Variant::Lis => {
        // The operand is the inline data word at the already-advanced PC.
        match self.state.memory.get(&self.state.pc) {
          Some(data) => {
            self.state.registers[instruction.d] = *data;
            self.state.pc = self.state.pc.wrapping_add(4);
            StepOutcome::Continue
          }
          None => StepOutcome::Faulted(Fault::UninitializedMemoryRead(self.state.pc))
        }
      }

      Variant::Lw => {
        let address = self.state.registers[instruction.s]
                          .wrapping_add(instruction.signed_immediate() as Word);
        match self.state.memory.get(&address) {
          Some(data) => {
            self.state.registers[instruction.t] = *data;
            StepOutcome::Continue
          }
          None => StepOutcome::Faulted(Fault::UninitializedMemoryRead(address))
        }
      }

      Variant::Sw => {
        let address = self.state.registers[instruction.s]
                          .wrapping_add(instruction.signed_immediate() as Word);
        self.state.memory.insert(address, self.state.registers[instruction.t]);
        StepOutcome::Continue
      }

      Variant::Jr => {
        self.state.pc = self.state.registers[instruction.s];
        StepOutcome::Continue
      }

      Variant::Jalr => {
        // Read the target before linking: a jump through R[31] must use its old value.
        let target = self.state.registers[instruction.s];
        self.state.registers[31] = self.state.pc;
        self.state.pc = target;
        StepOutcome::Continue
      }

      Variant::Unknown => {
        StepOutcome::Faulted(Fault::UnknownInstruction(word))
      }

    } // end match on variant
  }

  /**
    Runs the machine to completion, recording a snapshot per step. The loop stops
    when the PC reaches the termination sentinel, a step faults, or the step
    ceiling is hit; a fault ends the run without being re-raised. The final state
    is always appended as the last trace entry, so a faulting run has exactly one
    entry beyond its last pre-step snapshot.
  */
  pub fn run(&mut self) -> Trace {
    let mut snapshots: Vec<MachineState> = vec![];

    let outcome = loop {
      if self.state.pc == TERMINATION_PC {
        break RunOutcome::Halted;
      }
      if snapshots.len() >= self.step_limit {
        break RunOutcome::StepLimitExceeded;
      }

      #[cfg(feature = "trace_computation")]
      {
        if let Some(word) = self.state.memory.get(&self.state.pc) {
          println!("{:>10}:  {}", self.state.pc, disassemble(*word));
        }
      }

      let snapshot = self.state.clone();
      match self.step() {

        StepOutcome::Halted => {
          break RunOutcome::Halted;
        }

        StepOutcome::Continue => {
          snapshots.push(snapshot);
          #[cfg(feature = "trace_computation")] println!("{}", self.state);
        }

        StepOutcome::Faulted(fault) => {
          snapshots.push(snapshot);
          #[cfg(feature = "trace_computation")] println!("{}", fault);
          break RunOutcome::Faulted(fault);
        }

      }
    };

    snapshots.push(self.state.clone());
    Trace { snapshots, outcome }
  }

  // endregion

}

/**
  Parses a textual program listing, loads it with the default inputs of 1 and 2,
  and runs it to completion.
*/
pub fn execute_listing(text: &str) -> Result<Trace, ListingError> {
  let program = parse_listing(text)?;
  let mut machine = Machine::new(1, 2, &program);
  Ok(machine.run())
}
