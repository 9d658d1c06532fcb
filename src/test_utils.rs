//! Testing utilities and mock implementations
//!
//! This module provides a SPI-level W5500 simulator for testing the driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use embedded_hal::spi::{self, ErrorKind, SpiBus};

use crate::constants::TOTAL_BUFFER_MEMORY;
use crate::register::{AccessMode, Block, ControlByte, HEADER_LEN, SOCKET_COUNT};
use crate::register::common::{CHIP_VERSION, MR, PHYCFGR, VERSIONR, mr};
use crate::register::socket::{
    SN_BLOCK_LEN, SN_CR, SN_IR, SN_MR, SN_RX_RD, SN_RX_RSR, SN_RX_WR, SN_RXBUF_SIZE, SN_SR,
    SN_TX_FSR, SN_TX_RD, SN_TX_WR, SN_TXBUF_SIZE,
};
use crate::socket::{Command, Interrupt, RandomSource, Status};

const SOCKETS: usize = SOCKET_COUNT as usize;
const COMMON_LEN: usize = 0x40;
const MAX_BUFFER: usize = TOTAL_BUFFER_MEMORY;
/// Countdown value that never expires
pub const NEVER: u32 = u32::MAX;

// =============================================================================
// Transactions
// =============================================================================

/// One decoded SPI frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub block: Block,
    pub address: u16,
    pub access: AccessMode,
    pub data: Vec<u8>,
}

impl Transaction {
    pub fn read(block: Block, address: u16, data: &[u8]) -> Self {
        Self {
            block,
            address,
            access: AccessMode::Read,
            data: data.to_vec(),
        }
    }

    pub fn write(block: Block, address: u16, data: &[u8]) -> Self {
        Self {
            block,
            address,
            access: AccessMode::Write,
            data: data.to_vec(),
        }
    }
}

/// Frame being clocked in while chip select is low
#[derive(Debug, Default)]
struct Frame {
    header: Vec<u8>,
    data: Vec<u8>,
    decoded: Option<(Block, u16, AccessMode)>,
}

// =============================================================================
// Simulated Chip State
// =============================================================================

#[derive(Debug)]
struct SocketSim {
    regs: [u8; SN_BLOCK_LEN],
    tx: Vec<u8>,
    rx: Vec<u8>,
    /// Sn_CR reads back the command for this many polls
    command_busy_polls: u32,
    busy_remaining: u32,
    /// CONNECT ends in this status after this many SR reads (`None` stays SYN_SENT)
    connect_polls: u32,
    connect_outcome: Option<Status>,
    connect_remaining: Option<u32>,
    /// SEND_OK appears after this many IR reads
    send_ok_polls: u32,
    send_remaining: Option<u32>,
    loopback: bool,
    sent: Vec<Vec<u8>>,
    commands: Vec<u8>,
}

impl SocketSim {
    fn new() -> Self {
        let mut regs = [0u8; SN_BLOCK_LEN];
        regs[usize::from(SN_RXBUF_SIZE)] = 2;
        regs[usize::from(SN_TXBUF_SIZE)] = 2;
        Self {
            regs,
            tx: vec![0; MAX_BUFFER],
            rx: vec![0; MAX_BUFFER],
            command_busy_polls: 0,
            busy_remaining: 0,
            connect_polls: 0,
            connect_outcome: Some(Status::Established),
            connect_remaining: None,
            send_ok_polls: 0,
            send_remaining: None,
            loopback: false,
            sent: Vec::new(),
            commands: Vec::new(),
        }
    }

    fn reg16(&self, offset: u16) -> u16 {
        let i = usize::from(offset);
        u16::from_be_bytes([self.regs[i], self.regs[i + 1]])
    }

    fn set_reg16(&mut self, offset: u16, value: u16) {
        let i = usize::from(offset);
        self.regs[i..i + 2].copy_from_slice(&value.to_be_bytes());
    }

    fn buffer_size(&self, offset: u16) -> usize {
        (usize::from(self.regs[usize::from(offset)]) * 1024).clamp(1024, MAX_BUFFER)
    }

    fn tx_mask(&self) -> usize {
        self.buffer_size(SN_TXBUF_SIZE) - 1
    }

    fn rx_mask(&self) -> usize {
        self.buffer_size(SN_RXBUF_SIZE) - 1
    }

    fn set_status(&mut self, status: Status) {
        self.regs[usize::from(SN_SR)] = status.to_raw();
    }

    fn push_rx(&mut self, data: &[u8]) {
        let wr = self.reg16(SN_RX_WR);
        let mask = self.rx_mask();
        for (i, byte) in data.iter().enumerate() {
            self.rx[(usize::from(wr) + i) & mask] = *byte;
        }
        self.set_reg16(SN_RX_WR, wr.wrapping_add(data.len() as u16));
        self.regs[usize::from(SN_IR)] |= Interrupt::RECV.bits();
    }

    fn run_command(&mut self, code: u8) {
        self.commands.push(code);
        self.regs[usize::from(SN_CR)] = code;
        self.busy_remaining = self.command_busy_polls;

        match code {
            c if c == Command::Open.code() => {
                let status = match self.regs[usize::from(SN_MR)] & 0x0F {
                    0x01 => Status::Init,
                    0x02 => Status::Udp,
                    0x04 => Status::MacRaw,
                    _ => Status::Closed,
                };
                self.set_status(status);
            }
            c if c == Command::Listen.code() => self.set_status(Status::Listen),
            c if c == Command::Connect.code() => {
                self.set_status(Status::SynSent);
                self.connect_remaining = Some(self.connect_polls);
            }
            c if c == Command::Disconnect.code() || c == Command::Close.code() => {
                self.set_status(Status::Closed);
                self.connect_remaining = None;
            }
            c if c == Command::Send.code() => {
                let rd = self.reg16(SN_TX_RD);
                let wr = self.reg16(SN_TX_WR);
                let mask = self.tx_mask();
                let len = usize::from(wr.wrapping_sub(rd));
                let payload: Vec<u8> = (0..len)
                    .map(|i| self.tx[(usize::from(rd) + i) & mask])
                    .collect();
                self.set_reg16(SN_TX_RD, wr);
                if self.loopback {
                    self.push_rx(&payload);
                }
                self.sent.push(payload);
                self.send_remaining = Some(self.send_ok_polls);
            }
            _ => {}
        }
    }

    /// Refresh dynamic registers before a read starting at `offset`
    fn before_read(&mut self, offset: u16) {
        match offset {
            SN_CR => {
                if self.busy_remaining > 0 {
                    tick(&mut self.busy_remaining);
                } else {
                    self.regs[usize::from(SN_CR)] = 0;
                }
            }
            SN_SR => {
                if let Some(remaining) = self.connect_remaining.as_mut() {
                    if *remaining > 0 {
                        tick(remaining);
                    } else if let Some(outcome) = self.connect_outcome {
                        self.set_status(outcome);
                        self.connect_remaining = None;
                    }
                }
            }
            SN_IR => {
                if let Some(remaining) = self.send_remaining.as_mut() {
                    if *remaining > 0 {
                        tick(remaining);
                    } else {
                        self.regs[usize::from(SN_IR)] |= Interrupt::SEND_OK.bits();
                        self.send_remaining = None;
                    }
                }
            }
            SN_RX_RSR => {
                let size = self.reg16(SN_RX_WR).wrapping_sub(self.reg16(SN_RX_RD));
                self.set_reg16(SN_RX_RSR, size);
            }
            SN_TX_FSR => {
                let used = self.reg16(SN_TX_WR).wrapping_sub(self.reg16(SN_TX_RD));
                let free = (self.buffer_size(SN_TXBUF_SIZE) as u16).saturating_sub(used);
                self.set_reg16(SN_TX_FSR, free);
            }
            _ => {}
        }
    }

    /// Apply a register write starting at `offset`
    fn write_regs(&mut self, offset: u16, data: &[u8]) {
        match offset {
            SN_CR => {
                if let Some(code) = data.first() {
                    self.run_command(*code);
                }
            }
            SN_IR => {
                if let Some(bits) = data.first() {
                    self.regs[usize::from(SN_IR)] &= !bits;
                }
            }
            _ => {
                for (i, byte) in data.iter().enumerate() {
                    if let Some(reg) = self.regs.get_mut(usize::from(offset) + i) {
                        *reg = *byte;
                    }
                }
            }
        }
    }
}

/// Decrement a countdown; [`NEVER`] does not move
fn tick(counter: &mut u32) {
    if *counter != NEVER {
        *counter -= 1;
    }
}

#[derive(Debug)]
struct ChipState {
    common: [u8; COMMON_LEN],
    sockets: Vec<SocketSim>,
    /// MR.RST reads back set for this many polls after a reset
    reset_polls: u32,
    reset_remaining: Option<u32>,
    /// MR bits that never latch
    mode_stuck_bits: u8,
    scripted: HashMap<(Block, u16), VecDeque<Vec<u8>>>,
    cs_low: bool,
    cs_assertions: usize,
    fail_spi: bool,
    frame: Frame,
    transactions: Vec<Transaction>,
    raw_frames: Vec<Vec<u8>>,
}

impl ChipState {
    fn new() -> Self {
        let mut common = [0u8; COMMON_LEN];
        common[usize::from(VERSIONR)] = CHIP_VERSION;
        Self {
            common,
            sockets: (0..SOCKETS).map(|_| SocketSim::new()).collect(),
            reset_polls: 0,
            reset_remaining: None,
            mode_stuck_bits: 0,
            scripted: HashMap::new(),
            cs_low: false,
            cs_assertions: 0,
            fail_spi: false,
            frame: Frame::default(),
            transactions: Vec::new(),
            raw_frames: Vec::new(),
        }
    }

    fn socket(&mut self, n: u8) -> &mut SocketSim {
        &mut self.sockets[usize::from(n)]
    }

    fn soft_reset(&mut self) {
        let version = self.common[usize::from(VERSIONR)];
        let phy = self.common[usize::from(PHYCFGR)];
        self.common = [0u8; COMMON_LEN];
        self.common[usize::from(VERSIONR)] = version;
        self.common[usize::from(PHYCFGR)] = phy;
        for socket in &mut self.sockets {
            let template = SocketSim::new();
            socket.regs = template.regs;
        }
    }

    fn read_bytes(&mut self, block: Block, address: u16, len: usize) -> Vec<u8> {
        if let Some(queue) = self.scripted.get_mut(&(block, address)) {
            if let Some(mut bytes) = queue.pop_front() {
                bytes.resize(len, 0);
                return bytes;
            }
        }

        match block {
            Block::Common => {
                if address == MR {
                    if let Some(remaining) = self.reset_remaining.as_mut() {
                        if *remaining > 0 {
                            tick(remaining);
                        } else {
                            self.reset_remaining = None;
                            self.soft_reset();
                        }
                    }
                }
                (0..len)
                    .map(|i| {
                        self.common
                            .get(usize::from(address) + i)
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect()
            }
            Block::Socket(n) => {
                let socket = self.socket(n);
                socket.before_read(address);
                (0..len)
                    .map(|i| {
                        socket
                            .regs
                            .get(usize::from(address) + i)
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect()
            }
            Block::TxBuffer(n) => {
                let socket = self.socket(n);
                let mask = socket.tx_mask();
                (0..len)
                    .map(|i| socket.tx[(usize::from(address) + i) & mask])
                    .collect()
            }
            Block::RxBuffer(n) => {
                let socket = self.socket(n);
                let mask = socket.rx_mask();
                (0..len)
                    .map(|i| socket.rx[(usize::from(address) + i) & mask])
                    .collect()
            }
        }
    }

    fn write_bytes(&mut self, block: Block, address: u16, data: &[u8]) {
        match block {
            Block::Common => {
                if address == MR {
                    if let Some(value) = data.first() {
                        if value & mr::RST != 0 {
                            self.common[usize::from(MR)] = mr::RST;
                            self.reset_remaining = Some(self.reset_polls);
                        } else {
                            self.common[usize::from(MR)] = value & !self.mode_stuck_bits;
                        }
                        return;
                    }
                }
                for (i, byte) in data.iter().enumerate() {
                    if let Some(reg) = self.common.get_mut(usize::from(address) + i) {
                        *reg = *byte;
                    }
                }
            }
            Block::Socket(n) => self.socket(n).write_regs(address, data),
            Block::TxBuffer(n) => {
                let socket = self.socket(n);
                let mask = socket.tx_mask();
                for (i, byte) in data.iter().enumerate() {
                    socket.tx[(usize::from(address) + i) & mask] = *byte;
                }
            }
            Block::RxBuffer(n) => {
                let socket = self.socket(n);
                let mask = socket.rx_mask();
                for (i, byte) in data.iter().enumerate() {
                    socket.rx[(usize::from(address) + i) & mask] = *byte;
                }
            }
        }
    }

    /// Consume header bytes; returns the bytes left for the data phase
    fn take_header<'d>(&mut self, bytes: &'d [u8]) -> &'d [u8] {
        let missing = HEADER_LEN - self.frame.header.len();
        let split = missing.min(bytes.len());
        self.frame.header.extend_from_slice(&bytes[..split]);

        if self.frame.decoded.is_none() && self.frame.header.len() == HEADER_LEN {
            let address = u16::from_be_bytes([self.frame.header[0], self.frame.header[1]]);
            let control = ControlByte::decode(self.frame.header[2]);
            if let Some(block) = Block::from_selector(control.selector) {
                self.frame.decoded = Some((block, address, control.access));
            }
        }
        &bytes[split..]
    }

    fn end_frame(&mut self) {
        let frame = core::mem::take(&mut self.frame);
        let Some((block, address, access)) = frame.decoded else {
            return;
        };

        if access == AccessMode::Write {
            self.write_bytes(block, address, &frame.data);
        }

        let mut raw = frame.header.clone();
        raw.extend_from_slice(&frame.data);
        self.raw_frames.push(raw);
        self.transactions.push(Transaction {
            block,
            address,
            access,
            data: frame.data,
        });
    }
}

// =============================================================================
// Mock Chip
// =============================================================================

/// SPI-level W5500 simulator
///
/// [`MockChip::split`] hands out a [`MockSpi`] bus and a [`MockCs`] pin that
/// share the chip state. Frames are decoded with the driver's own control
/// byte decoder. Register files, TX/RX buffer memory and the command side
/// effects are simulated closely enough to run the socket state machine.
///
/// # Example
///
/// ```ignore
/// let chip = MockChip::new();
/// let (spi, cs) = chip.split();
/// let mut w5500 = W5500::new(spi, cs);
///
/// chip.set_version(0x03);
/// assert!(w5500.configure(&DeviceConfig::new(), &mut MockDelay::new()).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockChip {
    state: Rc<RefCell<ChipState>>,
}

impl Default for MockChip {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChip {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState::new())),
        }
    }

    /// Bus and chip-select handles wired to this chip
    pub fn split(&self) -> (MockSpi, MockCs) {
        (
            MockSpi {
                state: Rc::clone(&self.state),
            },
            MockCs {
                state: Rc::clone(&self.state),
            },
        )
    }

    // -------------------------------------------------------------------------
    // Bus observation
    // -------------------------------------------------------------------------

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.borrow().transactions.clone()
    }

    pub fn clear_transactions(&self) {
        let mut state = self.state.borrow_mut();
        state.transactions.clear();
        state.raw_frames.clear();
    }

    /// Header plus data phase of every complete frame
    pub fn raw_frames(&self) -> Vec<Vec<u8>> {
        self.state.borrow().raw_frames.clone()
    }

    pub fn cs_idle(&self) -> bool {
        !self.state.borrow().cs_low
    }

    pub fn cs_assertions(&self) -> usize {
        self.state.borrow().cs_assertions
    }

    /// Make every SPI transfer fail
    pub fn fail_spi(&self, fail: bool) {
        self.state.borrow_mut().fail_spi = fail;
    }

    /// Queue a value returned by the next read at `(block, address)`
    pub fn script_read(&self, block: Block, address: u16, data: &[u8]) {
        self.state
            .borrow_mut()
            .scripted
            .entry((block, address))
            .or_default()
            .push_back(data.to_vec());
    }

    // -------------------------------------------------------------------------
    // Common registers
    // -------------------------------------------------------------------------

    pub fn set_version(&self, version: u8) {
        self.state.borrow_mut().common[usize::from(VERSIONR)] = version;
    }

    /// MR.RST stays set for `polls` reads after a reset ([`NEVER`] for a hung chip)
    pub fn set_reset_polls(&self, polls: u32) {
        self.state.borrow_mut().reset_polls = polls;
    }

    /// Mode register bits that do not latch
    pub fn set_mode_stuck_bits(&self, bits: u8) {
        self.state.borrow_mut().mode_stuck_bits = bits;
    }

    pub fn set_common(&self, address: u16, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let start = usize::from(address);
        state.common[start..start + data.len()].copy_from_slice(data);
    }

    pub fn common_bytes(&self, address: u16, len: usize) -> Vec<u8> {
        let start = usize::from(address);
        self.state.borrow().common[start..start + len].to_vec()
    }

    /// First byte of every write to a common register
    pub fn common_writes(&self, address: u16) -> Vec<u8> {
        self.transactions()
            .into_iter()
            .filter(|t| {
                t.block == Block::Common && t.address == address && t.access == AccessMode::Write
            })
            .filter_map(|t| t.data.first().copied())
            .collect()
    }

    /// Number of reads of a common register
    pub fn common_reads(&self, address: u16) -> usize {
        self.reads_of(Block::Common, address)
    }

    // -------------------------------------------------------------------------
    // Sockets
    // -------------------------------------------------------------------------

    /// Number of reads starting at `(block, address)`
    pub fn reads_of(&self, block: Block, address: u16) -> usize {
        self.state
            .borrow()
            .transactions
            .iter()
            .filter(|t| t.block == block && t.address == address && t.access == AccessMode::Read)
            .count()
    }

    pub fn socket_reg(&self, n: u8, offset: u16) -> u8 {
        self.state.borrow().sockets[usize::from(n)].regs[usize::from(offset)]
    }

    pub fn socket_u16(&self, n: u8, offset: u16) -> u16 {
        self.state.borrow().sockets[usize::from(n)].reg16(offset)
    }

    pub fn set_socket_u16(&self, n: u8, offset: u16, value: u16) {
        self.state.borrow_mut().socket(n).set_reg16(offset, value);
    }

    pub fn status(&self, n: u8) -> Status {
        Status::from_raw(self.socket_reg(n, SN_SR))
    }

    pub fn set_status(&self, n: u8, status: Status) {
        self.state.borrow_mut().socket(n).set_status(status);
    }

    /// Sn_CR reads back the command for `polls` reads ([`NEVER`] to hang)
    pub fn set_command_busy_polls(&self, n: u8, polls: u32) {
        self.state.borrow_mut().socket(n).command_busy_polls = polls;
    }

    /// CONNECT settles in `outcome` after `polls` status reads; `None` stays in SYN_SENT
    pub fn set_connect_result(&self, n: u8, polls: u32, outcome: Option<Status>) {
        let mut state = self.state.borrow_mut();
        let socket = state.socket(n);
        socket.connect_polls = polls;
        socket.connect_outcome = outcome;
    }

    /// SEND_OK is raised after `polls` interrupt reads ([`NEVER`] to hang)
    pub fn set_send_ok_polls(&self, n: u8, polls: u32) {
        self.state.borrow_mut().socket(n).send_ok_polls = polls;
    }

    /// Copy every sent payload back into the socket's RX buffer
    pub fn set_loopback(&self, n: u8, enabled: bool) {
        self.state.borrow_mut().socket(n).loopback = enabled;
    }

    /// Deliver bytes into the socket's RX buffer
    pub fn push_rx(&self, n: u8, data: &[u8]) {
        self.state.borrow_mut().socket(n).push_rx(data);
    }

    /// Raw command codes written to Sn_CR
    pub fn commands(&self, n: u8) -> Vec<u8> {
        self.state.borrow().sockets[usize::from(n)].commands.clone()
    }

    /// Payloads handed to the wire by SEND
    pub fn sent(&self, n: u8) -> Vec<Vec<u8>> {
        self.state.borrow().sockets[usize::from(n)].sent.clone()
    }

    /// TX buffer memory at `offset`, wrapping at the buffer size
    pub fn tx_memory(&self, n: u8, offset: u16, len: usize) -> Vec<u8> {
        let state = self.state.borrow();
        let socket = &state.sockets[usize::from(n)];
        let mask = socket.tx_mask();
        (0..len)
            .map(|i| socket.tx[(usize::from(offset) + i) & mask])
            .collect()
    }
}

// =============================================================================
// Mock SPI Bus and Chip Select
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSpiError;

impl spi::Error for MockSpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// SPI bus half of a [`MockChip`]
#[derive(Debug)]
pub struct MockSpi {
    state: Rc<RefCell<ChipState>>,
}

impl spi::ErrorType for MockSpi {
    type Error = MockSpiError;
}

impl SpiBus for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), MockSpiError> {
        let mut state = self.state.borrow_mut();
        if state.fail_spi || !state.cs_low {
            return Err(MockSpiError);
        }
        let Some((block, address, AccessMode::Read)) = state.frame.decoded else {
            words.fill(0);
            return Ok(());
        };
        let start = address.wrapping_add(state.frame.data.len() as u16);
        let bytes = state.read_bytes(block, start, words.len());
        words.copy_from_slice(&bytes);
        state.frame.data.extend_from_slice(&bytes);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), MockSpiError> {
        let mut state = self.state.borrow_mut();
        if state.fail_spi || !state.cs_low {
            return Err(MockSpiError);
        }
        let rest = state.take_header(words);
        if !rest.is_empty() {
            state.frame.data.extend_from_slice(rest);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), MockSpiError> {
        self.write(write)?;
        read.fill(0);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), MockSpiError> {
        self.write(words)?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MockSpiError> {
        Ok(())
    }
}

/// Chip-select half of a [`MockChip`]
#[derive(Debug)]
pub struct MockCs {
    state: Rc<RefCell<ChipState>>,
}

impl embedded_hal::digital::ErrorType for MockCs {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockCs {
    fn set_low(&mut self) -> Result<(), Infallible> {
        let mut state = self.state.borrow_mut();
        if !state.cs_low {
            state.cs_low = true;
            state.cs_assertions += 1;
            state.frame = Frame::default();
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut state = self.state.borrow_mut();
        if state.cs_low {
            state.cs_low = false;
            state.end_frame();
        }
        Ok(())
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }

    /// Reset the delay counter
    pub fn reset(&self) {
        *self.total_ns.borrow_mut() = 0;
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }
}

// =============================================================================
// Deterministic Ports
// =============================================================================

/// [`RandomSource`] that replays a fixed sequence
#[derive(Debug, Clone)]
pub struct SequencePorts {
    values: Vec<u16>,
    next: usize,
}

impl SequencePorts {
    pub fn new(values: &[u16]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for SequencePorts {
    fn next_u16(&mut self) -> u16 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

// =============================================================================
// Tests for Mock Implementations
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::OutputPin;

    fn frame(spi: &mut MockSpi, cs: &mut MockCs, bytes: &[u8]) {
        cs.set_low().unwrap();
        spi.write(bytes).unwrap();
        cs.set_high().unwrap();
    }

    #[test]
    fn mock_chip_decodes_write_frames() {
        let chip = MockChip::new();
        let (mut spi, mut cs) = chip.split();

        frame(&mut spi, &mut cs, &[0x00, 0x0F, 0x04, 10, 0, 0, 1]);

        assert_eq!(chip.common_bytes(0x000F, 4), [10, 0, 0, 1]);
        assert_eq!(
            chip.transactions(),
            vec![Transaction::write(Block::Common, 0x000F, &[10, 0, 0, 1])]
        );
    }

    #[test]
    fn mock_chip_runs_open_command() {
        let chip = MockChip::new();
        let (mut spi, mut cs) = chip.split();

        // Sn_MR = TCP, Sn_CR = OPEN on socket 2 (selector 9)
        frame(&mut spi, &mut cs, &[0x00, 0x00, 0x4C, 0x21]);
        frame(&mut spi, &mut cs, &[0x00, 0x01, 0x4C, 0x01]);

        assert_eq!(chip.status(2), Status::Init);
        assert_eq!(chip.commands(2), [0x01]);
    }

    #[test]
    fn mock_chip_scripted_reads_take_precedence() {
        let chip = MockChip::new();
        chip.script_read(Block::Common, VERSIONR, &[0x99]);
        let (mut spi, mut cs) = chip.split();

        let mut read_version = || {
            let mut buf = [0u8];
            cs.set_low().unwrap();
            spi.write(&[0x00, 0x39, 0x00]).unwrap();
            spi.read(&mut buf).unwrap();
            cs.set_high().unwrap();
            buf[0]
        };

        assert_eq!(read_version(), 0x99);
        assert_eq!(read_version(), CHIP_VERSION);
    }

    #[test]
    fn mock_chip_rx_memory_wraps() {
        let chip = MockChip::new();
        chip.set_socket_u16(0, SN_RX_WR, 0x07FE);
        chip.set_socket_u16(0, SN_RX_RD, 0x07FE);

        chip.push_rx(0, &[1, 2, 3, 4]);

        assert_eq!(chip.socket_u16(0, SN_RX_WR), 0x0802);
        let (mut spi, mut cs) = chip.split();
        let mut buf = [0u8; 4];
        cs.set_low().unwrap();
        // RX block of socket 0 (selector 3), read
        spi.write(&[0xC7, 0xFE, 0x18]).unwrap();
        spi.read(&mut buf).unwrap();
        cs.set_high().unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn mock_delay_accumulates() {
        let mut delay = MockDelay::new();

        embedded_hal::delay::DelayNs::delay_ns(&mut delay, 1000);
        embedded_hal::delay::DelayNs::delay_ns(&mut delay, 2000);

        assert_eq!(delay.total_ns(), 3000);
        assert_eq!(delay.total_ms(), 0); // Less than 1ms

        embedded_hal::delay::DelayNs::delay_ns(&mut delay, 1_000_000);
        assert_eq!(delay.total_ms(), 1);
    }

    #[test]
    fn sequence_ports_cycle() {
        let mut ports = SequencePorts::new(&[5, 7]);
        assert_eq!(ports.next_u16(), 5);
        assert_eq!(ports.next_u16(), 7);
        assert_eq!(ports.next_u16(), 5);
    }
}
