/*!

  The architectural state of the machine and the program loader that builds it.
  State is held as native integers; the 32-character bit-string form appears only
  in the `Display` rendering, which is the trace's serialization boundary.

*/

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::usize::MAX;

use prettytable::{format as TableFormat, Table};

use crate::registers::{NamedRegister, REGISTER_NAMES, STACK_TOP, TERMINATION_PC};
use crate::word::{encode_word, Word};

/**
  The aggregate machine state: program counter, the `HI`/`LO` accumulator pair, the
  32-entry register file, and word-addressed memory.

  Memory maps byte addresses to whole words. An entry exists only once the loader
  or a store has written it; reading an absent address is a fault in the execution
  unit, never an implicit zero. No register index is hardwired to zero.
*/
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MachineState {
  pub pc: Word,
  pub hi: Word,
  pub lo: Word,
  pub registers: [Word; 32],
  pub memory: HashMap<Word, Word>,
}

impl MachineState {

  /**
    Builds the initial state for a program run. All registers start at zero except
    the two general-purpose inputs, the stack pointer (parked at the top of the
    usable address space), and `R[31]`, which holds the termination sentinel so a
    conventional `jr R[31]` return from the program's outermost frame halts the
    machine. The program's words land at successive 4-byte-aligned addresses
    starting at 0.
  */
  pub fn initial(input1: Word, input2: Word, program: &[Word]) -> MachineState {
    let mut registers = [0; 32];
    registers[NamedRegister::Input1.index()]       = input1;
    registers[NamedRegister::Input2.index()]       = input2;
    registers[NamedRegister::StackPointer.index()] = STACK_TOP;
    registers[NamedRegister::SavedPc.index()]      = TERMINATION_PC;

    let mut memory = HashMap::new();
    for (i, word) in program.iter().enumerate() {
      memory.insert((i * 4) as Word, *word);
    }

    MachineState {
      pc: 0,
      hi: 0,
      lo: 0,
      registers,
      memory
    }
  }

  /// The value of the register conventionally holding the given role.
  pub fn register(&self, role: NamedRegister) -> Word {
    self.registers[role.index()]
  }

  // region Display methods

  fn make_word_table(rows: &Vec<(String, Word)>, highlight: usize) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, (label, value)) in rows.iter().enumerate() {
      match i == highlight {

        true  => {
          table.add_row(
            row![r->format!("* --> {} =", label), encode_word(*value)]
          );
        }

        false => {
          table.add_row(
            row![r->format!("{} =", label), encode_word(*value)]
          );
        }

      } // end match on highlight
    } // end for
    table
  }

  fn control_rows(&self) -> Vec<(String, Word)> {
    vec![
      ("PC".to_string(), self.pc),
      ("HI".to_string(), self.hi),
      ("LO".to_string(), self.lo),
    ]
  }

  fn register_rows(&self) -> Vec<(String, Word)> {
    self.registers
        .iter()
        .enumerate()
        .map(|(i, value)| {
          let label = match REGISTER_NAMES.get_by_right(&i) {
            Some(name) => format!("R[{}] {}", i, name),
            None       => format!("R[{}]", i)
          };
          (label, *value)
        })
        .collect()
  }

  fn memory_rows(&self) -> Vec<(String, Word)> {
    let mut addresses: Vec<Word> = self.memory.keys().cloned().collect();
    addresses.sort();
    addresses.iter()
             .map(|address| {
               (format!("M[{}]", address), *self.memory.get(address).unwrap_or(&0))
             })
             .collect()
  }

  // endregion

}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for MachineState {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let control_table  = MachineState::make_word_table(&self.control_rows(), MAX);
    let register_table = MachineState::make_word_table(&self.register_rows(), MAX);

    // Highlight the memory row the PC points at, if it exists.
    let memory_rows = self.memory_rows();
    let pc_label    = format!("M[{}]", self.pc);
    let pc_row      = memory_rows.iter()
                                 .position(|(label, _)| *label == pc_label)
                                 .unwrap_or(MAX);
    let memory_table = MachineState::make_word_table(&memory_rows, pc_row);

    let mut combined_table = table!([control_table, register_table, memory_table]);

    combined_table.set_titles(row![ub->"Machine", ub->"Registers", ub->"Memory"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(f, "{}", combined_table)
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loader_builds_the_initial_state() {
    let program = [0x00221820, 0x03E00008];
    let state = MachineState::initial(7, 9, &program);

    assert_eq!(state.pc, 0);
    assert_eq!(state.hi, 0);
    assert_eq!(state.lo, 0);
    assert_eq!(state.registers[1], 7);
    assert_eq!(state.registers[2], 9);
    assert_eq!(state.registers[30], STACK_TOP);
    assert_eq!(state.registers[31], TERMINATION_PC);
    for i in [0, 3, 4, 26, 27, 28, 29].iter() {
      assert_eq!(state.registers[*i], 0);
    }
    assert_eq!(state.memory.get(&0), Some(&0x00221820));
    assert_eq!(state.memory.get(&4), Some(&0x03E00008));
    assert_eq!(state.memory.get(&8), None);
  }

  #[test]
  fn role_accessor_reads_the_conventional_register() {
    let state = MachineState::initial(1, 2, &[]);
    assert_eq!(state.register(NamedRegister::Input2), 2);
    assert_eq!(state.register(NamedRegister::StackPointer), STACK_TOP);
  }

  #[test]
  fn display_serializes_words_as_bit_strings() {
    let state = MachineState::initial(1, 2, &[5]);
    let rendered = format!("{}", state);

    assert!(rendered.contains("00000000000000000000000000000101"));
    assert!(rendered.contains("11111110111000011101111010101101")); // R[31]
    assert!(rendered.contains("stackPointer"));
    assert!(rendered.contains("M[0]"));
  }
}
