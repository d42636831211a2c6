/*!
  The human readable textual forms of machine words. Disassembly leverages the
  `strum` derives of `Variant` to render mnemonics; listing parsing turns the
  comma-and-space-separated binary form a code generator emits back into words.
*/

use std::fmt::{Display, Formatter};

use nom::{
  character::complete::{
    char as one_char,
    line_ending,
    multispace0,
    one_of
  },
  error::ErrorKind,
  multi::{
    many0,
    many1,
    separated_list
  },
  sequence::{
    delimited,
    terminated
  }
};

use crate::word::{self, Word, WORD_WIDTH};

use super::decode::decode;
use super::variant::Variant;

/**
  Renders a raw word as mnemonic text: the operator followed by its operand fields
  in a fixed layout. Purely a display aid; it shares its classification with the
  decoder and adds no execution semantics. Recognized-but-unimplemented words render
  a diagnostic placeholder, and unknown words render their decimal value.
*/
pub fn disassemble(word: Word) -> String {
  let instruction = decode(word);
  let operator = instruction.variant;

  match operator {

    | Variant::Add
    | Variant::Sub => {
      format!("{} {} {} {}", operator, instruction.d, instruction.s, instruction.t)
    }

    | Variant::Mult
    | Variant::MultU
    | Variant::Div
    | Variant::DivU => {
      format!("{} {} {}", operator, instruction.s, instruction.t)
    }

    | Variant::Mfhi
    | Variant::Mflo => {
      format!("{}", operator)
    }

    Variant::Lis => {
      format!("{} {}", operator, instruction.d)
    }

    | Variant::Lw
    | Variant::Sw => {
      format!("{} {} {}({})", operator, instruction.t, instruction.signed_immediate(), instruction.s)
    }

    | Variant::Slt
    | Variant::Sltu
    | Variant::Beq
    | Variant::Bne => {
      "not supported".to_string()
    }

    | Variant::Jr
    | Variant::Jalr => {
      format!("{} {}", operator, instruction.s)
    }

    Variant::Unknown => {
      format!("{}", word)
    }

  }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum ListingError {
  /// The listing text failed to parse; carries the offending fragment.
  Syntax(String),
  /// The word at `index` is not exactly 32 binary digits long.
  WrongWordLength{
    index: usize,
    length: usize
  }
}

impl Display for ListingError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      ListingError::Syntax(fragment) => {
        write!(f, "Unparseable listing text at: {:?}", fragment)
      }
      ListingError::WrongWordLength{ index, length } => {
        write!(f,
          "Word {} of the listing is {} digits long but must be exactly {}.",
          index, length, WORD_WIDTH
        )
      }
    }
  }
}

/**
  Parses the textual program form: a comma-and-space-separated list of 32-character
  binary-digit words. Line breaks may be folded into the middle of a word by the
  emitting tool and are stripped.
*/
pub fn parse_listing(text: &str) -> Result<Vec<Word>, ListingError> {
  // A binary digit, swallowing any line break folded in after it.
  let bit_p = terminated(one_of("01"), many0(line_ending));
  let word_p = many1(bit_p);
  let separator_p = delimited::<&str, _, _, _, (&str, ErrorKind), _, _, _>(
    multispace0, one_char(','), multispace0
  );
  let listing_p = delimited(
    multispace0,
    separated_list(separator_p, word_p),
    multispace0
  );

  let (rest, digit_lists) = match listing_p(text) {
    Ok(parsed) => parsed,
    Err(e) => {
      return Err(ListingError::Syntax(format!("{}", e)));
    }
  };
  if !rest.is_empty() {
    return Err(ListingError::Syntax(rest.chars().take(WORD_WIDTH).collect()));
  }

  let mut program = Vec::with_capacity(digit_lists.len());
  for (index, digits) in digit_lists.iter().enumerate() {
    if digits.len() != WORD_WIDTH {
      return Err(ListingError::WrongWordLength{ index, length: digits.len() });
    }
    let bits: String = digits.iter().collect();
    match word::decode_unsigned(&bits) {
      Ok(value) => program.push(value),
      Err(e)    => return Err(ListingError::Syntax(format!("{}", e)))
    }
  }
  Ok(program)
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_register_format_layouts() {
    assert_eq!(disassemble(0x00221820), "add 3 1 2");
    assert_eq!(disassemble(0x00451022), "sub 2 2 5");
    assert_eq!(disassemble(0x00220018), "mult 1 2");
    assert_eq!(disassemble(0x00220019), "multu 1 2");
    assert_eq!(disassemble(0x0022001A), "div 1 2");
    assert_eq!(disassemble(0x0022001B), "divu 1 2");
    assert_eq!(disassemble(0x00001810), "mfhi");
    assert_eq!(disassemble(0x00001812), "mflo");
    assert_eq!(disassemble(0x00001814), "lis 3");
    assert_eq!(disassemble(0x03E00008), "jr 31");
    assert_eq!(disassemble(0x00800009), "jalr 4");
  }

  #[test]
  fn renders_memory_layouts_with_signed_immediates() {
    assert_eq!(disassemble(0x8FC3FFFC), "lw 3 -4(30)");
    assert_eq!(disassemble(0xAFC30008), "sw 3 8(30)");
  }

  #[test]
  fn renders_diagnostic_placeholders() {
    assert_eq!(disassemble(0x0022182A), "not supported"); // slt
    assert_eq!(disassemble(0x0022182B), "not supported"); // sltu
    assert_eq!(disassemble(0x10220001), "not supported"); // beq
    assert_eq!(disassemble(0x14220001), "not supported"); // bne
    assert_eq!(disassemble(0x00000001), "1");
    assert_eq!(disassemble(0x00000000), "0");
  }

  #[test]
  fn parses_a_listing() {
    let text = "00000000000000000001100000010100, \
                00000000000000000000000000000101, \
                00000011111000000000000000001000";
    assert_eq!(parse_listing(text), Ok(vec![0x00001814, 5, 0x03E00008]));
  }

  #[test]
  fn strips_line_breaks_folded_into_words() {
    let lis  = "00000000000000000001100000010100";
    let five = "00000000000000000000000000000101";
    let text = format!("{}\n{},\n{}\r\n{}", &lis[..27], &lis[27..], &five[..20], &five[20..]);
    assert_eq!(parse_listing(&text), Ok(vec![0x00001814, 5]));
  }

  #[test]
  fn parses_the_empty_listing() {
    assert_eq!(parse_listing(""), Ok(vec![]));
  }

  #[test]
  fn rejects_words_of_the_wrong_length() {
    assert_eq!(
      parse_listing("0101"),
      Err(ListingError::WrongWordLength{ index: 0, length: 4 })
    );
    assert_eq!(
      parse_listing("00000000000000000001100000010100, 01"),
      Err(ListingError::WrongWordLength{ index: 1, length: 2 })
    );
  }

  #[test]
  fn rejects_trailing_garbage() {
    match parse_listing("00000000000000000001100000010100 junk") {
      Err(ListingError::Syntax(_)) => {}
      other => panic!("expected a syntax error, got {:?}", other)
    }
  }
}
