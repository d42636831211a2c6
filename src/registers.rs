/*!

  Conventional register roles and the machine's reserved bit patterns. The register
  file itself gives no index any special meaning; the roles below are a calling
  convention established by the program loader and the code generator that produced
  the program. The execution unit treats all 32 registers alike.

*/

use std::convert::TryFrom;

use bimap::BiMap;
use num_enum::{TryFromPrimitive, IntoPrimitive};
use strum::IntoEnumIterator;
use strum_macros::{Display as StrumDisplay, IntoStaticStr, EnumIter};

use crate::word::Word;

/// The PC bit pattern reserved to signal program termination. A program returns
/// through `R[31]` to this address to halt.
pub const TERMINATION_PC: Word = 0xFEE1DEAD;

/// Top of the usable address space. The loader parks the stack pointer here.
pub const STACK_TOP: Word = 0x01000000;

/// The memory-mapped output port. Stores to this address are meant to be picked up
/// by a hosting layer as console output; the execution unit itself never watches it.
pub const PRINT_ADDR: Word = 0xFFFF000C;

/**
  The conventional role of each reserved register index. The discriminant is the
  register-file index the role occupies, so the enum doubles as an immutable
  role -> index table.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,       Hash
)]
#[repr(u8)]
pub enum NamedRegister {
  #[strum(serialize = "input1")]
  Input1           = 1,
  #[strum(serialize = "input2")]
  Input2           = 2,
  #[strum(serialize = "result")]
  Result           = 3,
  #[strum(serialize = "scratch")]
  Scratch          = 4,
  #[strum(serialize = "savedParamPtr")]
  SavedParamPtr    = 5,
  #[strum(serialize = "allocated")]
  Allocated        = 6,
  #[strum(serialize = "copyChunkScratch")]
  CopyChunkScratch = 7,
  #[strum(serialize = "targetPC")]
  TargetPc         = 8,
  #[strum(serialize = "scratchPtrForGC")]
  ScratchPtrForGc  = 9,
  #[strum(serialize = "semiSpaceTop")]
  SemiSpaceTop     = 27,
  #[strum(serialize = "heapPointer")]
  HeapPointer      = 28,
  #[strum(serialize = "framePointer")]
  FramePointer     = 29,
  #[strum(serialize = "stackPointer")]
  StackPointer     = 30,
  #[strum(serialize = "savedPC")]
  SavedPc          = 31,
}

impl NamedRegister {
  /// The register-file index this role conventionally occupies.
  pub fn index(&self) -> usize {
    Into::<u8>::into(*self) as usize
  }

  /// The role occupying the given register index, if any.
  pub fn of_index(index: usize) -> Option<NamedRegister> {
    match u8::try_from(index) {
      Ok(byte) => NamedRegister::try_from(byte).ok(),
      Err(_e)  => None
    }
  }
}

lazy_static! {
  /// Bidirectional role name <-> register index table, used when annotating
  /// register displays.
  pub static ref REGISTER_NAMES: BiMap<&'static str, usize> = {
    let mut table = BiMap::new();
    for role in NamedRegister::iter() {
      table.insert(Into::<&'static str>::into(role), role.index());
    }
    table
  };
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::word::encode_word;

  #[test]
  fn reserved_constants_are_bit_exact() {
    assert_eq!(encode_word(TERMINATION_PC), "11111110111000011101111010101101");
    assert_eq!(encode_word(STACK_TOP),      "00000001000000000000000000000000");
    assert_eq!(encode_word(PRINT_ADDR),     "11111111111111110000000000001100");
  }

  #[test]
  fn the_name_table_is_bidirectional() {
    assert_eq!(REGISTER_NAMES.get_by_left(&"stackPointer"), Some(&30));
    assert_eq!(REGISTER_NAMES.get_by_left(&"heapPointer"),  Some(&28));
    assert_eq!(REGISTER_NAMES.get_by_right(&31), Some(&"savedPC"));
    assert_eq!(REGISTER_NAMES.get_by_right(&0),  None);
    assert_eq!(REGISTER_NAMES.get_by_right(&10), None);
  }

  #[test]
  fn roles_map_to_their_indices() {
    assert_eq!(NamedRegister::Input1.index(),       1);
    assert_eq!(NamedRegister::Input2.index(),       2);
    assert_eq!(NamedRegister::SemiSpaceTop.index(), 27);
    assert_eq!(NamedRegister::StackPointer.index(), 30);
    assert_eq!(NamedRegister::SavedPc.index(),      31);
    assert_eq!(NamedRegister::of_index(29), Some(NamedRegister::FramePointer));
    assert_eq!(NamedRegister::of_index(10), None);
    assert_eq!(NamedRegister::of_index(64), None);
  }
}
