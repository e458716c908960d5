use std::env;
use std::error::Error;
use std::fs;
use std::time::{Duration, Instant};

use chip8vm::display::{Display, MonoTermDisplay};
use chip8vm::input::{Input, StdinInput};
use chip8vm::interpreter::{Chip8Interpreter, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8vm::sound::{SimpleBeep, Sound};

/// timers, display and input all tick at the vblank rate
const FRAME_RATE: u32 = 60;

/// 480 instructions per second against the 60Hz timer tick
const STEPS_PER_FRAME: u32 = 8;

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args()
        .nth(1)
        .ok_or("usage: chip8vm <program.ch8>")?;
    let program = fs::read(&path)?;

    let mut display = MonoTermDisplay::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)?;
    let mut input = StdinInput::new();
    let mut sound = SimpleBeep::new();

    let result = run(&program, &mut display, &mut input, &mut sound);

    sound.stop()?;
    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    result
}

/// The cadence loop. One pass per 60Hz frame: refresh the key states, run a
/// frame's worth of instruction steps, tick the timers, then hand the
/// framebuffer and sound timer to the presentation side.
fn run(
    program: &[u8],
    display: &mut impl Display,
    input: &mut impl Input,
    sound: &mut impl Sound,
) -> Result<(), Box<dyn Error>> {
    let mut interpreter = Chip8Interpreter::new(program)?;
    let sleeper = spin_sleep::SpinSleeper::default();
    let frame = Duration::from_secs(1) / FRAME_RATE;

    loop {
        let frame_started = Instant::now();

        // a terminal only reports presses, so a key counts as held for the
        // frame in which it arrived
        interpreter.release_keys();
        for &key in input.peek_keys()? {
            interpreter.set_key(key, true);
        }
        if input.quit_requested() {
            return Ok(());
        }
        if input.reset_requested() {
            interpreter = Chip8Interpreter::new(program)?;
        }

        for _ in 0..STEPS_PER_FRAME {
            interpreter.step()?;
        }
        interpreter.decrement_timers();

        display.draw(interpreter.display())?;
        if interpreter.sound_timer() > 0 {
            sound.beep()?;
        } else {
            sound.stop()?;
        }
        input.flush_keys()?;

        sleeper.sleep(frame.saturating_sub(frame_started.elapsed()));
    }
}
