
use strum_macros::{Display as StrumDisplay, IntoStaticStr};

/**
  The fixed, closed set of instruction kinds the decoder can produce. The strum
  serializations are the display mnemonics.

  `Div` through `Bne` are recognized by the decoder but rejected by the execution
  unit; `Unknown` is the catch-all for words matching no pattern. Keeping both in
  the same enum keeps classification total.
*/
#[derive(
StrumDisplay, IntoStaticStr, Clone, Copy, Eq, PartialEq, Debug, Hash
)]
pub enum Variant {
  #[strum(serialize = "add")]
  Add,
  #[strum(serialize = "sub")]
  Sub,
  #[strum(serialize = "mult")]
  Mult,
  #[strum(serialize = "multu")]
  MultU,
  #[strum(serialize = "div")]
  Div,
  #[strum(serialize = "divu")]
  DivU,
  #[strum(serialize = "mfhi")]
  Mfhi,
  #[strum(serialize = "mflo")]
  Mflo,
  #[strum(serialize = "lis")]
  Lis,
  #[strum(serialize = "lw")]
  Lw,
  #[strum(serialize = "sw")]
  Sw,
  #[strum(serialize = "slt")]
  Slt,
  #[strum(serialize = "sltu")]
  Sltu,
  #[strum(serialize = "beq")]
  Beq,
  #[strum(serialize = "bne")]
  Bne,
  #[strum(serialize = "jr")]
  Jr,
  #[strum(serialize = "jalr")]
  Jalr,
  #[strum(serialize = "unknown")]
  Unknown,
}

/**
  A transient view over the fields of a raw instruction word. Every field is
  extracted unconditionally; which ones are meaningful depends on the variant.
  The immediate is stored raw and interpreted signed or unsigned on demand.
*/
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct DecodedInstruction {
  pub variant: Variant,
  /// Destination register index, bits 15–11.
  pub d: usize,
  /// First source register index, bits 25–21.
  pub s: usize,
  /// Second source register index, bits 20–16.
  pub t: usize,
  /// Raw 16 bit immediate, bits 15–0.
  pub i: u16,
}

impl DecodedInstruction {
  /// The immediate, sign-extended from bit 15.
  pub fn signed_immediate(&self) -> i32 {
    self.i as i16 as i32
  }

  /// The immediate as an unsigned magnitude.
  pub fn unsigned_immediate(&self) -> u32 {
    self.i as u32
  }
}
