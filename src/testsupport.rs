//! Mock transport for the unit tests.
//!
//! Every pin edge and SPI write lands in one shared event log, so a test
//! can replay the session and check the framed command/data stream the
//! way the panel would see it.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as DigitalErrorType, InputPin, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, Operation, SpiDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockError;

impl embedded_hal::digital::Error for MockError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl embedded_hal::spi::Error for MockError {
    fn kind(&self) -> embedded_hal::spi::ErrorKind {
        embedded_hal::spi::ErrorKind::Other
    }
}

/// One observable effect on the bus or a control line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Pin { name: &'static str, high: bool },
    Write(Vec<u8>),
}

/// Shared recording of everything the driver did, in order.
#[derive(Debug, Default, Clone)]
pub(crate) struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Fold the log into `(is_data, bytes)` frames according to the
    /// level of the dc line at the time of each write.
    pub fn frames(&self) -> Vec<(bool, Vec<u8>)> {
        let mut dc_high = false;
        let mut frames: Vec<(bool, Vec<u8>)> = Vec::new();
        for event in self.0.borrow().iter() {
            match event {
                Event::Pin { name: "dc", high } => dc_high = *high,
                Event::Pin { .. } => {}
                Event::Write(bytes) => match frames.last_mut() {
                    Some((is_data, data)) if *is_data == dc_high => {
                        data.extend_from_slice(bytes);
                    }
                    _ => frames.push((dc_high, bytes.clone())),
                },
            }
        }
        frames
    }

    /// Command view of the session: every command byte paired with the
    /// data bytes that followed it.
    pub fn commands(&self) -> Vec<(u8, Vec<u8>)> {
        let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
        for (is_data, bytes) in self.frames() {
            if is_data {
                if let Some((_, args)) = out.last_mut() {
                    args.extend_from_slice(&bytes);
                }
            } else {
                for byte in bytes {
                    out.push((byte, Vec::new()));
                }
            }
        }
        out
    }
}

pub(crate) struct MockSpi(pub EventLog);

impl SpiErrorType for MockSpi {
    type Error = MockError;
}

impl SpiDevice<u8> for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for op in operations {
            if let Operation::Write(data) = op {
                self.0.push(Event::Write(data.to_vec()));
            }
        }
        Ok(())
    }
}

pub(crate) struct MockOutputPin {
    pub name: &'static str,
    pub log: EventLog,
}

impl DigitalErrorType for MockOutputPin {
    type Error = MockError;
}

impl OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin {
            name: self.name,
            high: false,
        });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin {
            name: self.name,
            high: true,
        });
        Ok(())
    }
}

/// Busy line scripted as a sequence of samples; once the script runs out
/// the last level sticks.
pub(crate) struct MockBusyPin {
    levels: Vec<bool>,
    pos: usize,
}

impl MockBusyPin {
    /// Ready on the first sample.
    pub fn idle() -> Self {
        MockBusyPin {
            levels: vec![true],
            pos: 0,
        }
    }

    /// Never becomes ready.
    pub fn stuck_busy() -> Self {
        MockBusyPin {
            levels: vec![false],
            pos: 0,
        }
    }

    /// Busy for the given number of samples, then ready.
    pub fn busy_for(samples: usize) -> Self {
        let mut levels = vec![false; samples];
        levels.push(true);
        MockBusyPin { levels, pos: 0 }
    }
}

impl DigitalErrorType for MockBusyPin {
    type Error = MockError;
}

impl InputPin for MockBusyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let level = self
            .levels
            .get(self.pos)
            .or(self.levels.last())
            .copied()
            .unwrap_or(true);
        if self.pos < self.levels.len() {
            self.pos += 1;
        }
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub(crate) struct MockDelay;

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
