// src/stream/store.rs

//! Delay storage behind a commutator.
//!
//! Every store is a pair of fixed delay lines, one per [`Lane`]: a value
//! written on tick `t` is returned by `read` on tick `t + depth`. Within a
//! tick callers must `read` a lane before they `write` it, which is the
//! read-before-write ordering of a dual-port RAM.

use crate::common::Lane;
use alloc::vec;
use alloc::vec::Vec;

/// Depth at and above which [`DelayStore`] switches to the ping-pong strategy.
pub const DEFAULT_DEEP_THRESHOLD: usize = 256;

/// Per-lane delay storage used by a commutator.
pub trait BackingStore<T> {
    /// Value leaving the lane this tick.
    fn read(&self, lane: Lane) -> T;
    /// Value entering the lane this tick. Advances the lane by one slot.
    fn write(&mut self, lane: Lane, value: T);
    /// Zeroes every slot and rewinds every cursor.
    fn reset(&mut self);
    /// Delay of each lane, in ticks.
    fn depth(&self) -> usize;
}

/// Single fixed-capacity circular queue.
///
/// Also used on its own for the register chains that carry strobes and
/// pipeline data between units. A zero-length line is a wire.
#[derive(Clone, Debug)]
pub struct DelayLine<T> {
    slots: Vec<T>,
    pos: usize,
}

impl<T: Copy + Default> DelayLine<T> {
    pub fn new(depth: usize) -> Self {
        Self { slots: vec![T::default(); depth], pos: 0 }
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn front(&self) -> T {
        self.slots[self.pos]
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        self.slots[self.pos] = value;
        self.pos += 1;
        if self.pos == self.slots.len() {
            self.pos = 0;
        }
    }

    /// Pushes `value` and returns what it displaced.
    #[inline]
    pub fn shift(&mut self, value: T) -> T {
        if self.slots.is_empty() {
            return value;
        }
        let out = self.front();
        self.push(value);
        out
    }

    pub fn clear(&mut self) {
        self.slots.fill(T::default());
        self.pos = 0;
    }
}

/// Shallow strategy: one circular queue per lane, no addressing.
#[derive(Clone, Debug)]
pub struct RingStore<T> {
    lanes: [DelayLine<T>; 2],
}

impl<T: Copy + Default> RingStore<T> {
    pub fn new(depth: usize) -> Self {
        Self { lanes: [DelayLine::new(depth), DelayLine::new(depth)] }
    }
}

impl<T: Copy + Default> BackingStore<T> for RingStore<T> {
    #[inline]
    fn read(&self, lane: Lane) -> T {
        self.lanes[lane.index()].front()
    }

    #[inline]
    fn write(&mut self, lane: Lane, value: T) {
        self.lanes[lane.index()].push(value);
    }

    fn reset(&mut self) {
        for lane in &mut self.lanes {
            lane.clear();
        }
    }

    fn depth(&self) -> usize {
        self.lanes[0].depth()
    }
}

/// Two addressable banks for one lane.
#[derive(Clone, Debug)]
struct Banks<T> {
    bank: [Vec<T>; 2],
    // Bank currently being written; the other one is being read.
    active: usize,
    write_addr: usize,
    read_addr: usize,
}

impl<T: Copy + Default> Banks<T> {
    fn new(depth: usize) -> Self {
        Self {
            bank: [vec![T::default(); depth], vec![T::default(); depth]],
            active: 0,
            write_addr: 0,
            read_addr: 0,
        }
    }

    #[inline]
    fn read(&self) -> T {
        self.bank[self.active ^ 1][self.read_addr]
    }

    #[inline]
    fn write(&mut self, value: T) {
        let depth = self.bank[0].len();
        self.bank[self.active][self.write_addr] = value;

        self.write_addr += 1;
        self.read_addr += 1;
        if self.write_addr == depth {
            // The bank just filled becomes the read side for the next
            // `depth` ticks, which yields exactly `depth` ticks of delay.
            self.write_addr = 0;
            self.active ^= 1;
        }
        if self.read_addr == depth {
            self.read_addr = 0;
        }
    }

    fn clear(&mut self) {
        for bank in &mut self.bank {
            bank.fill(T::default());
        }
        self.active = 0;
        self.write_addr = 0;
        self.read_addr = 0;
    }
}

/// Deep strategy: a ping-pong pair of addressable banks per lane, with a
/// write cursor into the active bank and a read cursor into the idle one.
#[derive(Clone, Debug)]
pub struct PingPongStore<T> {
    lanes: [Banks<T>; 2],
    depth: usize,
}

impl<T: Copy + Default> PingPongStore<T> {
    pub fn new(depth: usize) -> Self {
        Self { lanes: [Banks::new(depth), Banks::new(depth)], depth }
    }
}

impl<T: Copy + Default> BackingStore<T> for PingPongStore<T> {
    #[inline]
    fn read(&self, lane: Lane) -> T {
        self.lanes[lane.index()].read()
    }

    #[inline]
    fn write(&mut self, lane: Lane, value: T) {
        self.lanes[lane.index()].write(value);
    }

    fn reset(&mut self) {
        for lane in &mut self.lanes {
            lane.clear();
        }
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

/// Which storage strategy a [`DelayStore`] ended up with.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Strategy {
    Shallow,
    Deep,
}

/// Store chosen by depth at construction time.
#[derive(Clone, Debug)]
pub enum DelayStore<T> {
    Shallow(RingStore<T>),
    Deep(PingPongStore<T>),
}

impl<T: Copy + Default> DelayStore<T> {
    pub fn for_depth(depth: usize, deep_threshold: usize) -> Self {
        if depth >= deep_threshold {
            DelayStore::Deep(PingPongStore::new(depth))
        } else {
            DelayStore::Shallow(RingStore::new(depth))
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            DelayStore::Shallow(_) => Strategy::Shallow,
            DelayStore::Deep(_) => Strategy::Deep,
        }
    }
}

impl<T: Copy + Default> BackingStore<T> for DelayStore<T> {
    #[inline]
    fn read(&self, lane: Lane) -> T {
        match self {
            DelayStore::Shallow(s) => s.read(lane),
            DelayStore::Deep(s) => s.read(lane),
        }
    }

    #[inline]
    fn write(&mut self, lane: Lane, value: T) {
        match self {
            DelayStore::Shallow(s) => s.write(lane, value),
            DelayStore::Deep(s) => s.write(lane, value),
        }
    }

    fn reset(&mut self) {
        match self {
            DelayStore::Shallow(s) => s.reset(),
            DelayStore::Deep(s) => s.reset(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            DelayStore::Shallow(s) => s.depth(),
            DelayStore::Deep(s) => s.depth(),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
