/*!

  The instruction set. Every instruction is a single 32 bit big-endian word. Register
  operands are 5 bit fields (`s` = bits 25–21, `t` = bits 20–16, `d` = bits 15–11);
  immediate-format instructions carry a 16 bit immediate in the low half word whose
  bit 15 is the sign. Register-format instructions are disambiguated by their low
  6 bit function code.

  Classification is total: a word is matched against an ordered mask/pattern table,
  and any word no row claims is `Unknown`. The disassembler reuses the identical
  classification, so the two can never disagree about what a word is.

*/

mod assembly;
mod decode;
mod variant;

pub use assembly::{disassemble, parse_listing, ListingError};
pub use decode::{classify, decode};
pub use variant::{DecodedInstruction, Variant};
