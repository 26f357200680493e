//! Time sources used while talking to the sensor.
//!
//! Two very different clocks are involved: a busy-wait microsecond timer for
//! the pulse timing, and the RTOS scheduler for millisecond sleeps and
//! cooperative yields.

/// Busy-wait delays at microsecond granularity.
pub trait PrecisionTimer {
    /// Spin for at least `us` microseconds without giving up the CPU.
    fn delay_us(&mut self, us: u32);

    /// Monotonic microseconds since boot.
    fn now_us(&mut self) -> u64;
}

/// The parts of the task scheduler the sensor code needs.
pub trait Scheduler {
    /// Block the calling task for `ms` milliseconds, letting other tasks run.
    fn delay_ms(&mut self, ms: u32);

    /// Hand the CPU back to the scheduler once, resuming on the next slice.
    fn yield_now(&mut self);
}

impl<T: PrecisionTimer + ?Sized> PrecisionTimer for &mut T {
    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }

    fn now_us(&mut self) -> u64 {
        (**self).now_us()
    }
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }

    fn yield_now(&mut self) {
        (**self).yield_now()
    }
}

#[cfg(target_os = "espidf")]
pub use esp::{EspTimer, FreeRtosScheduler};

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::delay::{Ets, FreeRtos};
    use esp_idf_sys as sys;

    use super::{PrecisionTimer, Scheduler};

    /// ROM busy-wait delay plus the high resolution esp_timer.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct EspTimer;

    impl PrecisionTimer for EspTimer {
        fn delay_us(&mut self, us: u32) {
            Ets::delay_us(us);
        }

        fn now_us(&mut self) -> u64 {
            // esp_timer counts up from boot and never goes negative.
            unsafe { sys::esp_timer_get_time() as u64 }
        }
    }

    #[derive(Debug, Default, Clone, Copy)]
    pub struct FreeRtosScheduler;

    impl Scheduler for FreeRtosScheduler {
        fn delay_ms(&mut self, ms: u32) {
            FreeRtos::delay_ms(ms);
        }

        fn yield_now(&mut self) {
            esp_idf_hal::task::do_yield();
        }
    }
}
