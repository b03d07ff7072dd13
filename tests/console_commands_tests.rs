//! Command handler tests

use clock_timer_emulator::console::commands::{execute, STEP_HINT};
use clock_timer_emulator::console::{command_names, parse, Command, System, COMMANDS};
use clock_timer_emulator::state::Defaults;
use clock_timer_emulator::{ClockError, GeneratorState, Mode, TimerKind};

const RPT: Defaults = Defaults {
    frequency_hz: 10,
    duty_cycle: 50,
    mode: Mode::Astable,
    pulse_enabled: true,
    timer_kind: TimerKind::Repeating,
};

const PWM: Defaults = Defaults { timer_kind: TimerKind::Pwm, ..RPT };

fn run(line: &str, state: &GeneratorState) -> (Result<(), ClockError>, TestOutput, TestSystem) {
    let mut output = TestOutput::new();
    let mut system = TestSystem::default();
    let cmd = parse(line, state.mode());
    let result = execute(&cmd, state, &mut system, &mut output);
    (result, output, system)
}

#[test]
fn test_command_registry_has_all_commands() {
    let expected = ["?", "start", "stop", "step", "freq", "duty", "reset", "reboot", "clear", "exit"];

    assert_eq!(command_names().collect::<Vec<_>>(), expected);
    assert_eq!(COMMANDS.len(), expected.len());
}

#[test]
fn test_help_lists_every_command() {
    let state = GeneratorState::new(RPT);
    let (result, output, _) = run("?", &state);

    assert_eq!(result, Ok(()));
    for c in COMMANDS {
        assert!(output.contains(c.usage), "help should mention '{}'", c.usage);
        assert!(output.contains(c.brief));
    }
}

#[test]
fn test_start_stop() {
    let state = GeneratorState::new(RPT);

    let (result, output, _) = run("stop", &state);
    assert_eq!(result, Ok(()));
    assert!(output.contains("* Clock stopped"));
    assert!(!state.pulse_enabled());

    let (result, output, _) = run("start", &state);
    assert_eq!(result, Ok(()));
    assert!(output.contains("* Clock started"));
    assert!(state.pulse_enabled());
}

#[test]
fn test_set_frequency() {
    let state = GeneratorState::new(RPT);
    let (result, output, _) = run("freq 1000", &state);

    assert_eq!(result, Ok(()));
    assert_eq!(state.frequency_hz(), 1000);
    assert!(output.contains("Sys Clock:\t240000000 Hz"));
    assert!(output.contains("Out Clock:\t1000 Hz"));
}

#[test]
fn test_frequency_out_of_range() {
    let state = GeneratorState::new(RPT);

    let (result, output, _) = run("freq 200000000", &state);
    assert_eq!(result, Err(ClockError::FrequencyTooHigh));
    assert_eq!(result.unwrap_err().message(), "Frequency cannot be greater than 125000000");
    assert!(output.is_empty());

    let (result, _, _) = run("freq 125000001", &state);
    assert_eq!(result, Err(ClockError::FrequencyTooHigh));

    let (result, _, _) = run("freq 0", &state);
    assert_eq!(result, Err(ClockError::FrequencyTooLow));

    assert_eq!(state.frequency_hz(), 10);
}

#[test]
fn test_invalid_numbers_rejected() {
    let state = GeneratorState::new(PWM);

    for line in ["freq", "freq -3", "freq abc", "duty", "duty -1"] {
        let (result, _, _) = run(line, &state);
        assert_eq!(result, Err(ClockError::InvalidValue), "line {:?}", line);
    }
    assert_eq!(state.frequency_hz(), 10);
    assert_eq!(state.duty_cycle(), 50);
}

#[test]
fn test_duty_requires_pwm() {
    let state = GeneratorState::new(RPT);
    let (result, _, _) = run("duty 70", &state);

    assert_eq!(result, Err(ClockError::DutyRequiresPwm));
    assert_eq!(
        ClockError::DutyRequiresPwm.to_string(),
        "Duty cycle can only be set in PWM mode"
    );
    assert_eq!(state.duty_cycle(), 50);
}

#[test]
fn test_duty_checks_timer_before_argument() {
    let state = GeneratorState::new(RPT);

    for line in ["duty", "duty abc", "duty -5", "duty 101"] {
        let (result, _, _) = run(line, &state);
        assert_eq!(result, Err(ClockError::DutyRequiresPwm), "line {:?}", line);
    }
    assert_eq!(state.duty_cycle(), 50);
}

#[test]
fn test_duty_in_pwm_shows_divider() {
    let state = GeneratorState::new(PWM);
    let (result, output, _) = run("duty 70", &state);

    assert_eq!(result, Ok(()));
    assert_eq!(state.duty_cycle(), 70);
    assert!(output.contains("Timer:\t\tPWM"));
    assert!(output.contains("Divider:\t"));
    assert!(output.contains("Duty Cycle:\t70%"));

    let (result, _, _) = run("duty 101", &state);
    assert_eq!(result, Err(ClockError::DutyTooHigh));
    assert_eq!(state.duty_cycle(), 70);
}

#[test]
fn test_step_in_astable() {
    let state = GeneratorState::new(RPT);
    let (result, output, _) = run("step", &state);

    assert_eq!(result, Ok(()));
    assert!(state.step_pending());
    assert!(output.contains("* Stepped"));
    assert!(output.contains("Mode:\t\tAstable"));
}

#[test]
fn test_step_in_monostable_prints_hint() {
    let state = GeneratorState::new(RPT);
    state.toggle_mode();
    let (result, output, _) = run("step", &state);

    assert_eq!(result, Ok(()));
    assert!(state.step_pending());
    assert!(output.contains(STEP_HINT));
}

#[test]
fn test_implicit_step_and_exit() {
    let state = GeneratorState::new(RPT);
    state.toggle_mode();

    let (result, output, _) = run("anything", &state);
    assert_eq!(result, Ok(()));
    assert!(output.contains("..."));
    assert!(state.pulse_enabled());

    let (result, output, _) = run("exit", &state);
    assert_eq!(result, Ok(()));
    assert!(!state.pulse_enabled());
    assert_eq!(state.mode(), Mode::Monostable);
    assert!(output.contains("Pulse:\t\tOff"));
}

#[test]
fn test_unknown_in_astable() {
    let state = GeneratorState::new(RPT);
    let (result, output, _) = run("foobar", &state);

    assert_eq!(result, Err(ClockError::UnknownCommand));
    assert!(output.is_empty());
    assert!(state.pulse_enabled());
}

#[test]
fn test_reset_restores_defaults_and_prints_banner() {
    let state = GeneratorState::new(PWM);
    state.set_frequency(777).unwrap();
    state.set_duty_cycle(5).unwrap();
    state.toggle_mode();

    let (result, output, _) = run("reset", &state);

    assert_eq!(result, Ok(()));
    assert_eq!(state.snapshot().frequency_hz, 10);
    assert_eq!(state.duty_cycle(), 50);
    assert_eq!(state.mode(), Mode::Astable);
    assert!(output.contains("\x1b[2J"));
    assert!(output.contains("Pico Clock/Timer Emulator"));
    assert!(output.contains("Type '?' for help"));
}

#[test]
fn test_clear_keeps_state() {
    let state = GeneratorState::new(RPT);
    state.set_frequency(42).unwrap();

    let (result, output, _) = run("clear", &state);

    assert_eq!(result, Ok(()));
    assert_eq!(state.frequency_hz(), 42);
    assert!(output.contains("Out Clock:\t42 Hz"));
}

#[test]
fn test_reboot_enters_download_mode() {
    let state = GeneratorState::new(RPT);
    let (result, output, system) = run("reboot", &state);

    assert_eq!(result, Ok(()));
    assert_eq!(system.download_mode_requests, 1);
    assert!(output.contains("* Rebooting to download mode"));
}

#[test]
fn test_execute_by_variant() {
    let state = GeneratorState::new(RPT);
    let mut output = TestOutput::new();
    let mut system = TestSystem::default();

    let result = execute(&Command::Frequency(Some(3)), &state, &mut system, &mut output);

    assert_eq!(result, Ok(()));
    assert_eq!(state.frequency_hz(), 3);
}

// Test system
#[derive(Default)]
struct TestSystem {
    download_mode_requests: u32,
}

impl System for TestSystem {
    fn sys_clock_hz(&self) -> u32 {
        240_000_000
    }

    fn enter_download_mode(&mut self) {
        self.download_mode_requests += 1;
    }
}

// Test output buffer
struct TestOutput {
    buf: String,
}

impl TestOutput {
    fn new() -> Self {
        Self { buf: String::new() }
    }

    fn contains(&self, s: &str) -> bool {
        self.buf.contains(s)
    }

    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl core::fmt::Write for TestOutput {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}
