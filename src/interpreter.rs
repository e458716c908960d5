//! The CHIP-8 machine itself: register file, call stack, framebuffer, timers
//! and the fetch-decode-execute cycle. The interpreter owns all of its state;
//! presentation, sound and input live outside and talk to it through the
//! accessors at the bottom of the impl block. It does not pace itself either:
//! the driver calls [`Chip8Interpreter::step`] at the instruction rate and
//! [`Chip8Interpreter::decrement_timers`] at the (much slower) timer rate.

use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::memory::{Chip8MemoryMap, MemoryMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
/// one byte per pixel, 0 or 1, row-major
pub const DISPLAY_CELLS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

pub const KEY_COUNT: usize = 16;

const REGISTER_COUNT: usize = 16;
const STACK_DEPTH: usize = 16;

/// VF doubles as the carry/borrow/collision flag
const FLAGS: usize = 0xf;

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    stack: [u16; STACK_DEPTH],
    v: [u8; REGISTER_COUNT],
    keys: [u8; KEY_COUNT],
    display: [u8; DISPLAY_CELLS],
    i: u16,
    pc: u16,
    sp: u8,
    delay_timer: u8,
    sound_timer: u8,
    rng: StdRng,
}

impl Chip8Interpreter {
    /// fresh machine with the program image loaded at 0x200. A reset is the
    /// same call again with the same image.
    pub fn new(program: &[u8]) -> Result<Chip8Interpreter, Chip8Error> {
        Self::with_rng(program, StdRng::from_entropy())
    }

    /// as `new`, but with a fixed random seed so Cxnn is reproducible
    pub fn with_seed(program: &[u8], seed: u64) -> Result<Chip8Interpreter, Chip8Error> {
        Self::with_rng(program, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut program: &[u8], rng: StdRng) -> Result<Chip8Interpreter, Chip8Error> {
        let mut memory = Chip8MemoryMap::new()?;
        memory.load_program(&mut program)?;
        let pc = memory.program_addr;
        Ok(Chip8Interpreter {
            memory,
            stack: [0; STACK_DEPTH],
            v: [0; REGISTER_COUNT],
            keys: [0; KEY_COUNT],
            display: [0; DISPLAY_CELLS],
            i: 0,
            pc,
            sp: 0x0f, // empty-descending
            delay_timer: 0,
            sound_timer: 0,
            rng,
        })
    }

    /// one fetch-decode-execute cycle
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        let at = self.pc;
        let opcode = self.fetch();
        let instruction =
            Instruction::decode(opcode).ok_or(Chip8Error::UnknownOpcode { opcode, pc: at })?;
        self.execute(instruction)
    }

    /// count both timers down towards zero. The driver calls this at the
    /// timer cadence, not per instruction.
    pub fn decrement_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    fn fetch(&mut self) -> u16 {
        let opcode = self.memory.get_word(self.pc);
        self.pc = self.pc.wrapping_add(2);
        opcode
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;
        match instruction {
            ClearDisplay => self.display = [0; DISPLAY_CELLS],
            Return => self.pc = self.pop_stack()?,
            Jump(nnn) => self.pc = nnn,
            Call(nnn) => {
                self.push_stack(self.pc)?;
                self.pc = nnn;
            }
            SkipEqImm { x, nn } => self.skip_if(self.v[x as usize] == nn),
            SkipNeImm { x, nn } => self.skip_if(self.v[x as usize] != nn),
            SkipEqReg { x, y } => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            SkipNeReg { x, y } => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            LoadImm { x, nn } => self.v[x as usize] = nn,
            AddImm { x, nn } => self.v[x as usize] = self.v[x as usize].wrapping_add(nn),
            Move { x, y } => self.v[x as usize] = self.v[y as usize],
            Or { x, y } => self.v[x as usize] |= self.v[y as usize],
            And { x, y } => self.v[x as usize] &= self.v[y as usize],
            Xor { x, y } => self.v[x as usize] ^= self.v[y as usize],
            Add { x, y } => self.add_reg(x, y),
            Sub { x, y } => self.sub_reg(x, y),
            SubFrom { x, y } => self.sub_from_reg(x, y),
            ShiftRight { x } => self.shift_right(x),
            ShiftLeft { x } => self.shift_left(x),
            LoadIndex(nnn) => self.i = nnn,
            JumpV0(nnn) => self.pc = nnn.wrapping_add(u16::from(self.v[0])),
            Random { x, nn } => self.v[x as usize] = self.rng.gen::<u8>() & nn,
            Draw { x, y, n } => self.draw_sprite(x, y, n),
            SkipKeyPressed { x } => self.skip_if(self.keys[self.v[x as usize] as usize] == 1),
            SkipKeyReleased { x } => self.skip_if(self.keys[self.v[x as usize] as usize] == 0),
            LoadDelay { x } => self.v[x as usize] = self.delay_timer,
            WaitKey { x } => self.wait_key(x),
            SetDelay { x } => self.delay_timer = self.v[x as usize],
            SetSound { x } => self.sound_timer = self.v[x as usize],
            AddIndex { x } => self.i = self.i.wrapping_add(u16::from(self.v[x as usize])),
            LoadGlyph { x } => self.i = self.memory.glyph_addr(self.v[x as usize]),
            StoreBcd { x } => self.store_bcd(x)?,
            StoreRegisters { x } => self.store_registers(x)?,
            LoadRegisters { x } => self.load_registers(x),
        }
        Ok(())
    }

    /// conditionally skip the instruction after the current one
    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    fn set_flag(&mut self, set: bool) {
        self.v[FLAGS] = set as u8;
    }

    fn push_stack(&mut self, value: u16) -> Result<(), Chip8Error> {
        match self.stack.get_mut(self.sp as usize) {
            Some(slot) => {
                *slot = value;
                self.sp = self.sp.wrapping_sub(1);
                Ok(())
            }
            None => Err(Chip8Error::StackOverflow {
                pc: self.pc.wrapping_sub(2),
            }),
        }
    }

    fn pop_stack(&mut self) -> Result<u16, Chip8Error> {
        match self.stack.get(self.sp.wrapping_add(1) as usize) {
            Some(&value) => {
                self.sp = self.sp.wrapping_add(1);
                Ok(value)
            }
            None => Err(Chip8Error::StackUnderflow {
                pc: self.pc.wrapping_sub(2),
            }),
        }
    }

    /// 8xy4: Vx += Vy, VF = carry out of bit 7
    fn add_reg(&mut self, x: u8, y: u8) {
        let (sum, carried) = self.v[x as usize].overflowing_add(self.v[y as usize]);
        self.v[x as usize] = sum;
        self.set_flag(carried);
    }

    /// 8xy5: Vx -= Vy, VF = 1 when no borrow was needed
    fn sub_reg(&mut self, x: u8, y: u8) {
        let (diff, borrowed) = self.v[x as usize].overflowing_sub(self.v[y as usize]);
        self.v[x as usize] = diff;
        self.set_flag(!borrowed);
    }

    /// 8xy7: Vx = Vy - Vx, VF = 1 when no borrow was needed
    fn sub_from_reg(&mut self, x: u8, y: u8) {
        let (diff, borrowed) = self.v[y as usize].overflowing_sub(self.v[x as usize]);
        self.v[x as usize] = diff;
        self.set_flag(!borrowed);
    }

    /// 8xy6: VF = old bit 0, Vx >>= 1
    fn shift_right(&mut self, x: u8) {
        let dropped = self.v[x as usize] & 0x01;
        self.v[x as usize] >>= 1;
        self.set_flag(dropped == 1);
    }

    /// 8xyE: VF = old bit 7, Vx <<= 1
    fn shift_left(&mut self, x: u8) {
        let dropped = self.v[x as usize] >> 7;
        self.v[x as usize] <<= 1;
        self.set_flag(dropped == 1);
    }

    /// Dxyn: XOR an n-row sprite from memory[I..] into the framebuffer at
    /// (Vx, Vy). Pixels past the right or bottom edge are dropped, not
    /// wrapped. VF = 1 if any lit pixel was unlit by the XOR.
    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) {
        let origin_x = self.v[x as usize] as usize;
        let origin_y = self.v[y as usize] as usize;
        let sprite = self.memory.get_ro_slice(self.i, n as usize);
        let mut collided = false;
        for (row, byte) in sprite.iter().enumerate() {
            let ty = origin_y + row;
            if ty >= DISPLAY_HEIGHT {
                continue;
            }
            for bit in 0..8 {
                let tx = origin_x + bit;
                if tx >= DISPLAY_WIDTH {
                    continue;
                }
                let px = (byte >> (7 - bit)) & 0x01;
                let cell = &mut self.display[ty * DISPLAY_WIDTH + tx];
                if px == 1 && *cell == 1 {
                    collided = true;
                }
                *cell ^= px;
            }
        }
        self.set_flag(collided);
    }

    /// Fx0A: busy-poll block. With no key down, rewind PC so the same
    /// instruction refetches next step; the driver keeps stepping at its
    /// normal cadence and updates the key array in between.
    fn wait_key(&mut self, x: u8) {
        match self.keys.iter().position(|&k| k == 1) {
            Some(key) => self.v[x as usize] = key as u8,
            None => self.pc = self.pc.wrapping_sub(2),
        }
    }

    /// Fx33: decimal digits of Vx into memory[I..I+3], most significant first
    fn store_bcd(&mut self, x: u8) -> Result<(), Chip8Error> {
        let value = self.v[x as usize];
        let digits = [value / 100, (value % 100) / 10, value % 10];
        self.memory.write(&digits, self.i, digits.len())?;
        Ok(())
    }

    /// Fx55: V0..=Vx into memory at I; I itself stays put
    fn store_registers(&mut self, x: u8) -> Result<(), Chip8Error> {
        let count = x as usize + 1;
        let (registers, memory) = (&self.v[..count], &mut self.memory);
        memory.write(registers, self.i, count)?;
        Ok(())
    }

    /// Fx65: memory at I into V0..=Vx; I itself stays put
    fn load_registers(&mut self, x: u8) {
        let count = x as usize + 1;
        let source = self.memory.get_ro_slice(self.i, count);
        self.v[..count].copy_from_slice(source);
    }

    /// the framebuffer, for the presentation side to render
    pub fn display(&self) -> &[u8] {
        &self.display
    }

    /// the sound timer, for the audio side; tone while nonzero
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// set one key down or up; the input side calls this between steps
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keys[key as usize & 0xf] = pressed as u8;
    }

    /// mark every key released
    pub fn release_keys(&mut self) {
        self.keys = [0; KEY_COUNT];
    }
}
