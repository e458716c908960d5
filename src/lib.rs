///
/// ## Design
///
/// * the interpreter owns every piece of machine state: RAM, registers,
///   call stack, timers, key array and the 64x32 framebuffer
/// * decode is a separate step producing a closed instruction enum, so the
///   dispatch is an exhaustive match and an unknown opcode is a typed,
///   fatal error carrying the opcode and its address
/// * the interpreter does not pace itself: the driver steps it at the
///   instruction rate and ticks the timers at 60Hz, which is also what
///   makes the Fx0A busy-poll block work
/// * display, input and sound sit behind traits so the TUI front-end can be
///   swapped out (and stubbed in tests)
/// * the random source is owned and seedable, to keep Cxnn reproducible
///   under test
///
/// Model
///
/// main (driver)
///  |-- display, input, sound
///  |-- interpreter(program image)
///  |    |-- memory map (font at 0x100, program at 0x200)
///  |    `-- instruction decode + execute
///  `-- frame loop, 60Hz
///       |-- poll input; copy key states into the interpreter
///       |-- 8 x interpreter.step()
///       |-- interpreter.decrement_timers()
///       |-- display.draw(interpreter.display())
///       `-- sound on/off from interpreter.sound_timer()
pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod sound;
