//! Bit-banged DHT11 receiver.
//!
//! The sensor has no clock and no framing: after a host start signal it
//! answers with an 80 us low / 80 us high acknowledgement and then forty
//! bits, each a ~50 us low lead-in followed by a high pulse whose length
//! carries the value (~27 us for '0', ~70 us for '1').

use core::fmt;

use log::{debug, warn};

use crate::edge::{wait_for_level, YieldPolicy};
use crate::line::{DataLine, Direction, PinLevel};
use crate::reading::{RawFrame, FRAME_LEN};
use crate::timer::{PrecisionTimer, Scheduler};

// Sensor timing contract. These are physical constraints of the part.
const START_LOW_MS: u32 = 20; // >= 18 ms
const START_RELEASE_US: u32 = 30; // 20-40 us
const RESPONSE_TIMEOUT_US: u32 = 85;
const PREAMBLE_POLLS: u32 = 85;
const BIT_TIMEOUT_US: u32 = 100;
// Lands after a '0' pulse has ended but well before a '1' pulse ends.
const SAMPLE_OFFSET_US: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The acknowledgement pulses never showed up.
    NoResponse,
    /// Framing was lost while receiving bit `bit` (0-based, MSB first).
    BitTimeout { bit: u8 },
    /// All forty bits arrived but the checksum byte disagrees.
    ChecksumFailed { expected: u8, actual: u8 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response from DHT11"),
            Self::BitTimeout { bit } => write!(f, "DHT11 timed out on bit {bit}"),
            Self::ChecksumFailed { expected, actual } => write!(
                f,
                "DHT11 checksum mismatch: expected {expected:02X}, got {actual:02X}"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Anything that can produce a validated frame on demand.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<RawFrame, DecodeError>;
}

pub struct Dht11<L, T, S> {
    line: L,
    timer: T,
    scheduler: S,
    policy: YieldPolicy,
}

impl<L, T, S> Dht11<L, T, S>
where
    L: DataLine,
    T: PrecisionTimer,
    S: Scheduler,
{
    pub fn new(line: L, timer: T, scheduler: S) -> Self {
        Self::with_policy(line, timer, scheduler, YieldPolicy::default())
    }

    pub fn with_policy(line: L, timer: T, scheduler: S, policy: YieldPolicy) -> Self {
        Self {
            line,
            timer,
            scheduler,
            policy,
        }
    }

    /// Run one complete transfer. Any timeout or a bad checksum aborts the
    /// whole frame; nothing partial is returned.
    pub fn read(&mut self) -> Result<RawFrame, DecodeError> {
        let started = self.timer.now_us();
        self.send_start();
        self.await_response()?;

        let mut data = [0u8; FRAME_LEN];
        for (index, byte) in data.iter_mut().enumerate() {
            for bit in 0..8 {
                *byte = (*byte << 1) | u8::from(self.read_bit(index * 8 + bit)?);
            }
        }

        debug!(
            "DHT11 frame {:02X?} in {} us",
            data,
            self.timer.now_us().saturating_sub(started)
        );
        RawFrame::from_bytes(data).map_err(|err| {
            warn!("{err}");
            err
        })
    }

    fn send_start(&mut self) {
        self.line.set_direction(Direction::Output);
        self.line.write(PinLevel::Low);
        self.scheduler.delay_ms(START_LOW_MS);
        self.line.write(PinLevel::High);
        self.timer.delay_us(START_RELEASE_US);
        self.line.set_direction(Direction::Input);
    }

    fn await_response(&mut self) -> Result<(), DecodeError> {
        if !self.wait(PinLevel::Low, RESPONSE_TIMEOUT_US) {
            return Err(DecodeError::NoResponse);
        }
        if !self.wait(PinLevel::High, RESPONSE_TIMEOUT_US) {
            return Err(DecodeError::NoResponse);
        }
        // Ride out the rest of the acknowledgement high. Running out of
        // polls here is tolerated; the first bit wait catches a dead bus.
        for _ in 0..PREAMBLE_POLLS {
            if !self.line.read().is_high() {
                break;
            }
            self.timer.delay_us(1);
        }
        Ok(())
    }

    fn read_bit(&mut self, index: usize) -> Result<bool, DecodeError> {
        let timeout = DecodeError::BitTimeout { bit: index as u8 };
        if !self.wait(PinLevel::High, BIT_TIMEOUT_US) {
            return Err(timeout);
        }
        self.timer.delay_us(SAMPLE_OFFSET_US);
        let one = self.line.read().is_high();
        if !self.wait(PinLevel::Low, BIT_TIMEOUT_US) {
            return Err(timeout);
        }
        Ok(one)
    }

    fn wait(&mut self, target: PinLevel, timeout_us: u32) -> bool {
        wait_for_level(
            &mut self.line,
            &mut self.timer,
            &mut self.scheduler,
            self.policy,
            target,
            timeout_us,
        )
    }
}

impl<L, T, S> FrameSource for Dht11<L, T, S>
where
    L: DataLine,
    T: PrecisionTimer,
    S: Scheduler,
{
    fn read_frame(&mut self) -> Result<RawFrame, DecodeError> {
        self.read()
    }
}
