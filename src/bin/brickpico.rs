//! BrickPico firmware for Raspberry Pi Pico 2 W
//!
//! Boot sequence (core 0):
//!
//! 1. open the persistent memory block and bring up the logger
//! 2. report the previous session (uptime, saved time, watchdog reset)
//! 3. plan the PWM frequency and set up every output slice
//! 4. start core 1 with the output control loop
//! 5. run the persistent-memory refresh on core 0
//!
//! Any PWM setup failure halts the board before an output is driven.

#![no_std]
#![no_main]

use core::ptr::addr_of_mut;

use brickpico::config::default_config;
use brickpico::core::logging::{ChannelRemoteSink, REMOTE_LOG};
use brickpico::core::tasks::{control_loop_task, persistent_refresh_task};
use brickpico::platform::rp2350::{
    take_persistent_block, DefmtConsole, EmbassyTime, FirmwareLogger, FirmwareState,
    FirmwareStore, Rp2350PwmSlices, SioCoreId,
};
use brickpico::platform::setup_outputs;
use brickpico::{log_crit, log_notice, log_warn};
use brickpico_core::log::{Logger, PersistentLogStore};
use brickpico_core::output::{BrickpicoState, OutputController};
use brickpico_core::pwm::PinMap;
use brickpico_core::traits::SpinState;
use cortex_m_rt::entry;
use embassy_executor::Executor;
use embassy_rp::block::ImageDef;
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::watchdog::{ResetReason, Watchdog};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

static mut CORE1_STACK: Stack<8192> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

static STORE: StaticCell<FirmwareStore> = StaticCell::new();
static STATE: StaticCell<FirmwareState> = StaticCell::new();
static LOGGER: StaticCell<FirmwareLogger> = StaticCell::new();

#[entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    let clock = EmbassyTime;
    let config = default_config();

    // Persistent memory and logger
    let block = match take_persistent_block() {
        Ok(block) => block,
        Err(e) => panic!("{}", e),
    };
    let store = PersistentLogStore::open(block);
    let previous_invalid = store.previous_state_invalid();
    let prev_uptime = store.prev_uptime();
    let saved_time = store.saved_time();

    let store: &'static FirmwareStore = STORE.init(SpinState::new(store, clock));
    let logger: &'static FirmwareLogger = LOGGER.init(Logger::new(
        DefmtConsole,
        store,
        ChannelRemoteSink::new(&REMOTE_LOG),
        clock,
        SioCoreId,
    ));
    logger.set_log_level(config.log_level);
    logger.set_syslog_level(config.syslog_level);
    logger.set_debug_level(config.debug_level);

    log_notice!(logger, "BrickPico v{} starting", env!("CARGO_PKG_VERSION"));

    // Previous session
    let watchdog = Watchdog::new(p.WATCHDOG);
    if previous_invalid {
        log_warn!(logger, "Persistent memory invalid: re-initialized");
    } else {
        log_notice!(
            logger,
            "Previous uptime: {}.{:06} s",
            prev_uptime / 1_000_000,
            prev_uptime % 1_000_000
        );
        if let Some(time) = saved_time {
            log_notice!(logger, "Saved time: {}", time);
        }
    }
    match watchdog.reset_reason() {
        Some(ResetReason::TimedOut) => log_warn!(logger, "Rebooted by watchdog (timeout)"),
        Some(ResetReason::Forced) => log_notice!(logger, "Rebooted by watchdog (forced)"),
        None => {}
    }

    // PWM outputs: GPIO 2k/2k+1 on slice k
    let mut slices = Rp2350PwmSlices::new();
    slices.insert(0, Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, PwmConfig::default()));
    slices.insert(1, Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, PwmConfig::default()));
    slices.insert(2, Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, PwmConfig::default()));
    slices.insert(3, Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, PwmConfig::default()));
    slices.insert(4, Pwm::new_output_ab(p.PWM_SLICE4, p.PIN_8, p.PIN_9, PwmConfig::default()));
    slices.insert(5, Pwm::new_output_ab(p.PWM_SLICE5, p.PIN_10, p.PIN_11, PwmConfig::default()));
    slices.insert(6, Pwm::new_output_ab(p.PWM_SLICE6, p.PIN_12, p.PIN_13, PwmConfig::default()));
    slices.insert(7, Pwm::new_output_ab(p.PWM_SLICE7, p.PIN_14, p.PIN_15, PwmConfig::default()));

    let driver = match setup_outputs(slices, PinMap::BRICKPICO, config.outputs.len(), config.pwm_freq)
    {
        Ok(driver) => driver,
        Err(e) => {
            log_crit!(logger, "{}", e);
            panic!("PWM setup failed");
        }
    };
    let plan = *driver.plan();
    log_notice!(
        logger,
        "PWM Frequency: {} Hz (clk_div={}, top={}, levels={})",
        plan.requested_hz,
        plan.clk_div,
        plan.top,
        plan.levels()
    );
    log_notice!(logger, "Outputs: {}", driver.output_count());

    let state: &'static FirmwareState =
        STATE.init(SpinState::new(BrickpicoState::new(&config.outputs), clock));
    let controller = OutputController::new(driver, &config.outputs, state, clock);

    // Core 1: output control
    spawn_core1(
        p.CORE1,
        unsafe { &mut *addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| {
                if spawner.spawn(control_loop_task(controller, logger)).is_err() {
                    panic!("failed to spawn control loop");
                }
            })
        },
    );

    // Core 0: persistent memory refresh
    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        if spawner
            .spawn(persistent_refresh_task(store, logger, watchdog))
            .is_err()
        {
            panic!("failed to spawn persistent refresh");
        }
    })
}
