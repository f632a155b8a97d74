//! Hardware-free stand-ins for the GPIO and shutdown capabilities.
//!
//! `DummyGpio` replays a scripted sequence of levels and falls back to a
//! fixed level once the script is exhausted. Both dummies share their
//! counters through cloneable handles, so a test can keep observing them
//! after the dummy itself has been moved into (and dropped with) a monitor.
//!
//! ```rust
//! use rppal::gpio::Level;
//! use toggle_shutdown::dummy::DummyGpio;
//! use toggle_shutdown::gpio::GpioAccess;
//!
//! let mut gpio = DummyGpio::new().with_levels([Level::Low, Level::High]);
//! gpio.configure_input(25).unwrap();
//!
//! assert_eq!(gpio.read(25).unwrap(), Level::Low);
//! assert_eq!(gpio.read(25).unwrap(), Level::High);
//! assert_eq!(gpio.read(25).unwrap(), Level::Low);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rppal::gpio::{Level, Mode};

use crate::error::{CommandError, GpioError};
use crate::gpio::{GpioAccess, NumberingMode};
use crate::pins::PinFunctions;
use crate::shutdown::Shutdown;

/// Shared call counter.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct DummyGpio {
    script: RefCell<VecDeque<Level>>,
    fallback: Level,
    configured: BTreeSet<u8>,
    functions: BTreeMap<u8, Mode>,
    unavailable: BTreeSet<u8>,
    failing_read: Option<usize>,
    reads: Counter,
    releases: Counter,
}

impl DummyGpio {
    /// A dummy whose pins read LOW forever and report `Mode::Input`.
    pub fn new() -> DummyGpio {
        DummyGpio {
            script: RefCell::new(VecDeque::new()),
            fallback: Level::Low,
            configured: BTreeSet::new(),
            functions: BTreeMap::new(),
            unavailable: BTreeSet::new(),
            failing_read: None,
            reads: Counter::default(),
            releases: Counter::default(),
        }
    }

    /// Levels returned by the next reads, in order.
    pub fn with_levels<I: IntoIterator<Item = Level>>(self, levels: I) -> DummyGpio {
        self.script.borrow_mut().extend(levels);
        self
    }

    /// Level returned once the scripted levels are used up.
    pub fn with_fallback(mut self, level: Level) -> DummyGpio {
        self.fallback = level;
        self
    }

    pub fn with_function(mut self, pin: u8, mode: Mode) -> DummyGpio {
        self.functions.insert(pin, mode);
        self
    }

    pub fn with_unavailable(mut self, pin: u8) -> DummyGpio {
        self.unavailable.insert(pin);
        self
    }

    /// Every read after the first `successful` ones fails with an I/O error.
    pub fn with_read_failure_after(mut self, successful: usize) -> DummyGpio {
        self.failing_read = Some(successful);
        self
    }

    pub fn reads(&self) -> Counter {
        self.reads.clone()
    }

    pub fn releases(&self) -> Counter {
        self.releases.clone()
    }

    pub fn is_configured(&self, pin: u8) -> bool {
        self.configured.contains(&pin)
    }
}

impl Default for DummyGpio {
    fn default() -> Self {
        DummyGpio::new()
    }
}

impl GpioAccess for DummyGpio {
    fn numbering_mode(&self) -> NumberingMode {
        NumberingMode::Bcm
    }

    fn configure_input(&mut self, pin: u8) -> Result<(), GpioError> {
        if self.unavailable.contains(&pin) {
            return Err(rppal::gpio::Error::PinUsed(pin).into());
        }

        self.configured.insert(pin);
        self.functions.insert(pin, Mode::Input);

        Ok(())
    }

    fn read(&self, pin: u8) -> Result<Level, GpioError> {
        if !self.configured.contains(&pin) {
            return Err(GpioError::NotConfigured { pin });
        }

        if self.failing_read.is_some_and(|successful| self.reads.get() >= successful) {
            let err = std::io::Error::new(std::io::ErrorKind::Other, "simulated read failure");
            return Err(rppal::gpio::Error::Io(err).into());
        }

        self.reads.increment();

        Ok(self.script.borrow_mut().pop_front().unwrap_or(self.fallback))
    }

    fn release_all(&mut self) {
        self.releases.increment();
        self.configured.clear();
    }
}

impl PinFunctions for DummyGpio {
    fn numbering_mode(&self) -> NumberingMode {
        NumberingMode::Bcm
    }

    fn function(&self, pin: u8) -> Result<Mode, GpioError> {
        if self.unavailable.contains(&pin) {
            return Err(rppal::gpio::Error::PinUsed(pin).into());
        }

        Ok(self.functions.get(&pin).copied().unwrap_or(Mode::Input))
    }
}

/// Records shutdown requests instead of powering anything off.
#[derive(Debug, Clone, Default)]
pub struct DummyShutdown {
    invocations: Counter,
}

impl DummyShutdown {
    pub fn new() -> DummyShutdown {
        DummyShutdown::default()
    }

    pub fn invocations(&self) -> Counter {
        self.invocations.clone()
    }
}

impl Shutdown for DummyShutdown {
    async fn shutdown(&mut self) -> Result<(), CommandError> {
        self.invocations.increment();
        Ok(())
    }
}
