//! ClockTimerEmulator - Main entry point
//!
//! 1. Bring up log UART, buttons, console UART
//! 2. Start the potentiometer sampler on Core 1 (unless `CLOCK_FREQ` is fixed)
//! 3. Start the 50 ms console poll timer
//! 4. Run the pulse loop on the main task, forever

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!(
        "{}: firmware for ESP32-S3 (target_os = \"espidf\"). Use `cargo test` on the host.",
        clock_timer_emulator::config::VERSION
    );
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::thread;
    use std::time::Duration;

    use esp_idf_svc::hal::adc::ADC1;
    use esp_idf_svc::hal::cpu::Core;
    use esp_idf_svc::hal::delay::{Delay, FreeRtos};
    use esp_idf_svc::hal::gpio::{Gpio1, OutputPin as _};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::task::thread::ThreadSpawnConfiguration;
    use esp_idf_svc::sys::{self as esp_idf_sys, EspError};
    use esp_idf_svc::timer::EspTaskTimerService;

    use clock_timer_emulator::config::{CONSOLE_POLL_MS, FIXED_FREQUENCY_HZ, STARTUP_SETTLE_MS, TRACE_CYCLES, VERSION};
    use clock_timer_emulator::console::{ConsoleSession, PollEvent};
    use clock_timer_emulator::hal::{
        button_input, install_button_interrupts, now_us, pulse_output, EspSystem, Potentiometer,
        UartConsole,
    };
    use clock_timer_emulator::log_drain::{init_log_uart, log_drain_task};
    use clock_timer_emulator::sampler::FrequencySampler;
    use clock_timer_emulator::{ring_debug, ring_error, ring_info, ring_warn};
    use clock_timer_emulator::{Cycle, PulseEngine, LOG_RING, STATE};

    fn spawn_failed(_: std::io::Error) -> EspError {
        EspError::from_infallible::<{ esp_idf_sys::ESP_FAIL }>()
    }

    pub fn run() -> Result<(), EspError> {
        esp_idf_sys::link_patches();

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        // Diagnostic log on UART1
        let mut log_uart = init_log_uart(peripherals.uart1, pins.gpio6)?;
        thread::Builder::new()
            .name("log-drain".into())
            .stack_size(4096)
            .spawn(move || log_drain_task(&mut log_uart))
            .map_err(spawn_failed)?;

        ring_info!(LOG_RING, now_us(), "{} starting", VERSION);

        // Buttons: drivers must outlive the ISR
        let _mode_button = button_input(pins.gpio14)?;
        let _step_button = button_input(pins.gpio15)?;
        install_button_interrupts()?;

        // Frequency source
        match FIXED_FREQUENCY_HZ {
            Some(hz) => ring_info!(LOG_RING, now_us(), "fixed frequency {} Hz", hz),
            None => {
                ThreadSpawnConfiguration {
                    name: Some(b"sampler\0"),
                    pin_to_core: Some(Core::Core1),
                    ..Default::default()
                }
                .set()?;

                let adc1 = peripherals.adc1;
                let pot_pin = pins.gpio1;
                thread::Builder::new()
                    .stack_size(4096)
                    .spawn(move || sampler_task(adc1, pot_pin))
                    .map_err(spawn_failed)?;

                ThreadSpawnConfiguration::default().set()?;
            }
        }

        // Console
        let mut port = UartConsole::new(peripherals.uart0, pins.gpio43, pins.gpio44)?;
        let mut system = EspSystem;
        let mut session = ConsoleSession::new();
        session.start(&mut port, &STATE, &system);

        let timer_service = EspTaskTimerService::new()?;
        let console_timer = timer_service.timer(move || {
            if let PollEvent::Dispatched(cmd, result) = session.poll(&mut port, &STATE, &mut system) {
                ring_info!(LOG_RING, now_us(), "console {:?} -> {:?}", cmd, result);
            }
        })?;
        console_timer.every(Duration::from_millis(CONSOLE_POLL_MS))?;

        // Give the sampler its first reading
        FreeRtos::delay_ms(STARTUP_SETTLE_MS);

        let clock = pulse_output(pins.gpio17.downgrade_output())?;
        let led = pulse_output(pins.gpio16.downgrade_output())?;
        let mut engine = PulseEngine::new(&STATE, clock, led, Delay::new_default());

        loop {
            match engine.run_once() {
                Ok(cycle) => {
                    if TRACE_CYCLES {
                        trace_cycle(&cycle);
                    }
                    // Let the idle task (and its watchdog) run when nothing slept
                    if !cycle.slept() {
                        FreeRtos::delay_ms(1);
                    }
                }
                Err(e) => {
                    ring_error!(LOG_RING, now_us(), "pulse output: {:?}", e);
                    FreeRtos::delay_ms(1);
                }
            }
        }
    }

    fn sampler_task(adc1: ADC1, pin: Gpio1) {
        let pot = match Potentiometer::new(adc1, pin) {
            Ok(pot) => pot,
            Err(e) => {
                ring_error!(LOG_RING, now_us(), "ADC init failed: {:?}", e);
                return;
            }
        };
        let mut sampler = FrequencySampler::new(pot, FreeRtos);

        loop {
            match sampler.update(&STATE) {
                Ok(hz) => ring_debug!(LOG_RING, now_us(), "sampled {} Hz", hz),
                Err(e) => ring_warn!(LOG_RING, now_us(), "ADC read failed: {:?}", e),
            }
        }
    }

    fn trace_cycle(cycle: &Cycle) {
        if let Some(t) = cycle.timing() {
            ring_debug!(
                LOG_RING,
                now_us(),
                "{} freq {} Hz duty {}% high {} ms low {} ms",
                cycle.as_str(),
                STATE.frequency_hz(),
                STATE.duty_cycle(),
                t.high_ms,
                t.low_ms
            );
        }
    }
}
