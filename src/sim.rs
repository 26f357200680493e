//! Simulated line, clock and scheduler for exercising the protocol code
//! without hardware.
//!
//! Time only advances when the code under test delays. The line replays a
//! scripted waveform measured from the moment it is switched to input.

use std::cell::Cell;
use std::rc::Rc;

use crate::line::{DataLine, Direction, PinLevel};
use crate::timer::{PrecisionTimer, Scheduler};

#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, us: u64) {
        self.0.set(self.0.get() + us);
    }
}

pub struct SimTimer {
    clock: SimClock,
}

impl SimTimer {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
        }
    }
}

impl PrecisionTimer for SimTimer {
    fn delay_us(&mut self, us: u32) {
        self.clock.advance(u64::from(us));
    }

    fn now_us(&mut self) -> u64 {
        self.clock.now()
    }
}

pub struct SimScheduler {
    clock: SimClock,
    pub yields: usize,
    pub sleeps_ms: Vec<u32>,
}

impl SimScheduler {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            yields: 0,
            sleeps_ms: Vec::new(),
        }
    }
}

impl Scheduler for SimScheduler {
    fn delay_ms(&mut self, ms: u32) {
        self.sleeps_ms.push(ms);
        self.clock.advance(u64::from(ms) * 1000);
    }

    fn yield_now(&mut self) {
        self.yields += 1;
    }
}

/// What the sensor side of the bus does once the host releases it.
#[derive(Debug, Clone)]
pub struct Waveform {
    segments: Vec<(PinLevel, u64)>,
    tail: PinLevel,
}

impl Waveform {
    /// Nothing on the bus: the pull-up keeps it high forever.
    pub fn silent() -> Self {
        Self::new()
    }

    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            tail: PinLevel::High,
        }
    }

    pub fn low(mut self, us: u64) -> Self {
        self.segments.push((PinLevel::Low, us));
        self
    }

    pub fn high(mut self, us: u64) -> Self {
        self.segments.push((PinLevel::High, us));
        self
    }

    /// Level held after the last segment.
    pub fn then_hold(mut self, level: PinLevel) -> Self {
        self.tail = level;
        self
    }

    /// A well behaved DHT11 answering with `bytes`: 20 us of pull-up, the
    /// 80/80 us acknowledgement, forty bits of 50 us low followed by 27 us
    /// ('0') or 70 us ('1') high, then a 50 us end-of-frame low.
    pub fn dht11(bytes: [u8; 5]) -> Self {
        Self::dht11_bits(bytes, 40).low(50)
    }

    /// Like [`Waveform::dht11`] but the sensor goes quiet, holding the line
    /// low, after the low lead-in of bit `bit` (0-based).
    pub fn dht11_stalled_at(bytes: [u8; 5], bit: usize) -> Self {
        Self::dht11_bits(bytes, bit)
            .low(50)
            .then_hold(PinLevel::Low)
    }

    fn dht11_bits(bytes: [u8; 5], bits: usize) -> Self {
        let mut waveform = Self::new().high(20).low(80).high(80);
        for index in 0..bits {
            let byte = bytes[index / 8];
            let one = byte & (0x80 >> (index % 8)) != 0;
            waveform = waveform.low(50).high(if one { 70 } else { 27 });
        }
        waveform
    }

    fn level_at(&self, offset: u64) -> PinLevel {
        let mut start = 0;
        for &(level, duration) in &self.segments {
            if offset < start + duration {
                return level;
            }
            start += duration;
        }
        self.tail
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SimLine {
    clock: SimClock,
    waveform: Waveform,
    direction: Direction,
    driven: PinLevel,
    released_at: Option<u64>,
    /// Every host write, with its timestamp.
    pub writes: Vec<(u64, PinLevel)>,
    /// Writes issued while the line was an input.
    pub stray_writes: usize,
}

impl SimLine {
    pub fn new(clock: &SimClock, waveform: Waveform) -> Self {
        Self {
            clock: clock.clone(),
            waveform,
            direction: Direction::Input,
            driven: PinLevel::High,
            released_at: None,
            writes: Vec::new(),
            stray_writes: 0,
        }
    }

    pub fn released_at(&self) -> Option<u64> {
        self.released_at
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl DataLine for SimLine {
    fn set_direction(&mut self, direction: Direction) {
        let releasing = self.direction != Direction::Input || self.released_at.is_none();
        if direction == Direction::Input && releasing {
            self.released_at = Some(self.clock.now());
        }
        self.direction = direction;
    }

    fn write(&mut self, level: PinLevel) {
        if self.direction != Direction::Output {
            self.stray_writes += 1;
            return;
        }
        self.driven = level;
        self.writes.push((self.clock.now(), level));
    }

    fn read(&mut self) -> PinLevel {
        match (self.direction, self.released_at) {
            (Direction::Output, _) => self.driven,
            (Direction::Input, Some(at)) => self.waveform.level_at(self.clock.now() - at),
            (Direction::Input, None) => self.waveform.tail,
        }
    }
}
