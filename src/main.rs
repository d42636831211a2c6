use mipstrace::isa::{disassemble, parse_listing};
use mipstrace::Machine;

fn main() {

  #[cfg(feature = "trace_computation")]
  println!("Computation Tracing ENABLED");

  // lis R[3] <- 5; add R[3] <- R[3] + R[1]; return through R[31].
  let listing = "00000000000000000001100000010100, \
                 00000000000000000000000000000101, \
                 00000000011000010001100000100000, \
                 00000011111000000000000000001000";

  let program = match parse_listing(listing) {
    Ok(program) => program,
    Err(e) => {
      eprintln!("{}", e);
      return;
    }
  };

  println!("# Program");
  for (i, word) in program.iter().enumerate() {
    println!("{:>4}:  {}", i * 4, disassemble(*word));
  }
  println!();

  let mut machine = Machine::new(1, 2, &program);
  let trace = machine.run();

  println!("Ran {} steps: {}", trace.steps(), trace.outcome);
  if let Some(state) = trace.final_state() {
    println!("Final state:\n{}", state);
  }
}
