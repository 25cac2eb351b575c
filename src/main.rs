//! Beacon Transmitter Main Application
//!
//! Entry point for the STM32G474-based WSPR/FT8 beacon firmware.
//! Initializes hardware and spawns the two execution contexts: the
//! control task (scheduler polls, watchdog) and the RF task (per-symbol
//! pipeline service). The bit-level codec and the synthesis primitive
//! are wired in at their seams; until then the bring-up encoder loads a
//! carrier-only test pattern.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::mode::Async;
use embassy_stm32::usart::{self, UartRx};
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use beacon_firmware::beacon::{
    service_transmission, BeaconContext, EncodeError, MessageEncoder, ScheduleConfig,
    SymbolPipeline, TickOutcome, ToneSequence,
};
use beacon_firmware::command::{BeaconCommand, CommandParser};
use beacon_firmware::config::{
    CONTROL_POLL_INTERVAL_MS, DEFAULT_CARRIER_SHIFT_HZ, DEFAULT_DIAL_FREQUENCY_HZ,
    DEFAULT_SLOT_SKIP, RF_SERVICE_INTERVAL_US, WATCHDOG_TIMEOUT_US,
};
use beacon_firmware::gpstime::TimeSolution;
use beacon_firmware::osc::ToneOscillator;
use beacon_firmware::types::{BeaconIdentity, BeaconProtocol, DialFrequency, RfChannel, Tone};

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    USART2 => usart::InterruptHandler<peripherals::USART2>;
});

/// Single symbol pipeline instance shared by the two contexts.
/// Each side takes short critical sections and never holds one across a wait.
static PIPELINE: Mutex<CriticalSectionRawMutex, RefCell<SymbolPipeline>> =
    Mutex::new(RefCell::new(SymbolPipeline::new()));

/// Single oscillator control handle: control gates start/stop, RF retunes.
static OSCILLATOR: Mutex<CriticalSectionRawMutex, RefCell<Option<DcoHandle>>> =
    Mutex::new(RefCell::new(None));

/// Time solution snapshot, refreshed by the GPS adapter, read by control.
static SOLUTION: Mutex<CriticalSectionRawMutex, RefCell<TimeSolution>> =
    Mutex::new(RefCell::new(TimeSolution {
        unix_time_s: 0,
        solution_active: false,
        last_update_monotonic_us: 0,
        update_count: 0,
        position: None,
    }));

/// Parsed serial commands, command task to control task
static COMMANDS: Channel<CriticalSectionRawMutex, BeaconCommand, 4> = Channel::new();

/// Bring-up encoder: carrier-only test pattern (all tone 0)
///
/// Stands in at the codec seam until the WSPR/FT8 bit-level encoder is
/// wired in.
struct TestPatternEncoder {
    protocol: BeaconProtocol,
}

impl MessageEncoder for TestPatternEncoder {
    fn encode_structured(
        &mut self,
        _message: &str,
        tones: &mut ToneSequence,
    ) -> Result<(), EncodeError> {
        tones.clear();
        tones
            .resize(self.protocol.symbol_count(), 0)
            .map_err(|()| EncodeError::MessageTooLong)
    }

    fn encode_free_text(
        &mut self,
        message: &str,
        tones: &mut ToneSequence,
    ) -> Result<(), EncodeError> {
        self.encode_structured(message, tones)
    }
}

/// Oscillator handle over the digital synthesis primitive
///
/// The per-symbol frequency arithmetic lives in the synthesis layer; this
/// handle gates the output stage and forwards retune commands.
struct DcoHandle {
    enable: Output<'static>,
}

impl ToneOscillator for DcoHandle {
    fn start(&mut self, channel: RfChannel) {
        info!("DCO start on {}", channel);
        self.enable.set_high();
    }

    fn stop(&mut self, channel: RfChannel) {
        info!("DCO stop on {}", channel);
        self.enable.set_low();
    }

    fn set_tone(&mut self, dial: DialFrequency, tone: Tone) {
        // Retune command for the synthesis primitive
        defmt::trace!("retune {} + tone {}", dial, tone);
    }
}

/// Forwarder giving each task mutable access to the shared handle
///
/// Critical sections are per-call and never held across a wait.
struct SharedDco;

impl ToneOscillator for SharedDco {
    fn start(&mut self, channel: RfChannel) {
        OSCILLATOR.lock(|osc| {
            if let Some(osc) = osc.borrow_mut().as_mut() {
                osc.start(channel);
            }
        });
    }

    fn stop(&mut self, channel: RfChannel) {
        OSCILLATOR.lock(|osc| {
            if let Some(osc) = osc.borrow_mut().as_mut() {
                osc.stop(channel);
            }
        });
    }

    fn set_tone(&mut self, dial: DialFrequency, tone: Tone) {
        OSCILLATOR.lock(|osc| {
            if let Some(osc) = osc.borrow_mut().as_mut() {
                osc.set_tone(dial, tone);
            }
        });
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Beacon firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // Wiring per config::pins
    let led = Output::new(p.PA5, Level::Low, Speed::Low); // pins::LED_STATUS
    let rf_enable = Output::new(p.PA8, Level::Low, Speed::VeryHigh); // pins::RF_OUT
    OSCILLATOR.lock(|osc| {
        osc.borrow_mut().replace(DcoHandle { enable: rf_enable });
    });

    let watchdog = IndependentWatchdog::new(p.IWDG, WATCHDOG_TIMEOUT_US);

    // Serial control channel, RX only (pins::CMD_RX)
    let cmd_rx = match UartRx::new(p.USART2, Irqs, p.PA3, p.DMA1_CH1, usart::Config::default()) {
        Ok(rx) => Some(rx),
        Err(_) => {
            warn!("control UART unavailable, running schedule-only");
            None
        }
    };

    let identity = BeaconIdentity::new("N0CALL", "AA00", 10);
    let schedule = ScheduleConfig::new()
        .with_slot_skip(DEFAULT_SLOT_SKIP)
        .with_stale_fallback(true);
    let protocol = BeaconProtocol::Ft8;
    let dial = DialFrequency::from_hz(DEFAULT_DIAL_FREQUENCY_HZ)
        .expect("default dial frequency is in range");
    let channel = RfChannel::new(0);

    let mut context = BeaconContext::new(
        identity,
        schedule,
        protocol,
        TestPatternEncoder { protocol },
        dial,
        channel,
    );
    if !context.set_carrier_shift_hz(DEFAULT_CARRIER_SHIFT_HZ) {
        warn!("default carrier shift out of range, using dial directly");
    }

    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(rf_task()).unwrap();
    spawner.spawn(control_task(context, watchdog)).unwrap();
    if let Some(rx) = cmd_rx {
        spawner.spawn(command_task(rx)).unwrap();
    }
    // GPS adapter task (NMEA/PPS) plugs in here and refreshes SOLUTION.

    info!("Tasks spawned");
}

/// Control context: scheduler polls, command handling, watchdog
///
/// Not timing-critical at sub-second granularity. The watchdog is petted
/// on every iteration, including while waiting out a pending transmission.
#[embassy_executor::task]
async fn control_task(
    mut context: BeaconContext<TestPatternEncoder>,
    mut watchdog: IndependentWatchdog<'static, embassy_stm32::peripherals::IWDG>,
) {
    watchdog.unleash();

    let mut oscillator = SharedDco;

    loop {
        watchdog.pet();

        let now_us = Instant::now().as_micros();
        let solution = SOLUTION.lock(|s| *s.borrow());

        let outcome = PIPELINE.lock(|pipeline| {
            let mut pipeline = pipeline.borrow_mut();
            context.tick(now_us, &solution, &mut pipeline, &mut oscillator)
        });

        match outcome {
            TickOutcome::Fired { slot, packing } => {
                info!("TX start, slot {} ({})", slot, packing);
            }
            TickOutcome::EncodeFailed(err) => warn!("encode failed: {}", err),
            TickOutcome::NoTimeSource => defmt::debug!("waiting for GPS receiver"),
            _ => {}
        }

        while let Ok(cmd) = COMMANDS.try_receive() {
            handle_command(&mut context, &cmd, now_us, &solution, &mut oscillator);
        }

        Timer::after(Duration::from_millis(CONTROL_POLL_INTERVAL_MS)).await;
    }
}

/// Apply one serial command inside the control context
fn handle_command(
    context: &mut BeaconContext<TestPatternEncoder>,
    cmd: &BeaconCommand,
    now_us: u64,
    solution: &TimeSolution,
    oscillator: &mut SharedDco,
) {
    match cmd {
        BeaconCommand::SetMessage(msg) => {
            context.set_message(msg);
            info!("message set: {}", msg.as_str());
        }
        BeaconCommand::SetFrequencyOffset(hz) => {
            if context.set_carrier_shift_hz(*hz) {
                info!("carrier shift set: {} Hz", hz);
            } else {
                warn!("carrier shift {} Hz leaves the supported range", hz);
            }
        }
        BeaconCommand::ForceTransmit => {
            let outcome = PIPELINE.lock(|pipeline| {
                context.force_transmit(now_us, solution, &mut pipeline.borrow_mut(), oscillator)
            });
            info!("forced TX: {}", outcome);
        }
        BeaconCommand::DumpDiagnostics => {
            let diag =
                PIPELINE.lock(|pipeline| context.diagnostics(now_us, solution, &pipeline.borrow()));
            info!("{}", diag);
        }
        BeaconCommand::Unknown(letter) => warn!("unknown command '{}'", letter),
    }
}

/// Serial command channel: bytes in, parsed commands out
#[embassy_executor::task]
async fn command_task(mut rx: UartRx<'static, Async>) {
    let mut parser = CommandParser::new();
    let mut byte = [0u8; 1];

    loop {
        match rx.read(&mut byte).await {
            Ok(()) => {
                if let Some(cmd) = parser.feed(byte[0]) {
                    COMMANDS.send(cmd).await;
                }
            }
            Err(_) => {
                warn!("control UART error, resyncing");
                parser.clear();
            }
        }
    }
}

/// RF context: services the symbol pipeline at a fine cadence
///
/// Must never block on anything but its own tick; the service interval is
/// a small fraction of the shortest symbol period.
#[embassy_executor::task]
async fn rf_task() {
    let mut oscillator = SharedDco;

    loop {
        let now_us = Instant::now().as_micros();
        PIPELINE.lock(|pipeline| {
            service_transmission(&mut pipeline.borrow_mut(), &mut oscillator, now_us);
        });

        Timer::after(Duration::from_micros(RF_SERVICE_INTERVAL_US)).await;
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
