use motor::{
    Actuator, ActuatorError, Command, Level, Line, LineStates, Lines, MemoryLines, MotorState,
};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const ALL: [Command; 5] = [
    Command::Forward,
    Command::Left,
    Command::Right,
    Command::Backward,
    Command::Stop,
];

#[test]
fn every_command_returns_to_idle() {
    for command in ALL {
        for duration in [Duration::ZERO, Duration::from_millis(5)] {
            let lines = MemoryLines::new();
            let mut actuator = Actuator::new(lines.clone());
            actuator.actuate(command, duration).unwrap();
            assert_eq!(actuator.state(), MotorState::Idle, "{command}");
            assert!(lines.levels().is_idle(), "{command} left lines active");
        }
    }
}

#[test]
fn command_levels_are_applied_before_the_stop() {
    let lines = MemoryLines::new();
    let mut actuator = Actuator::new(lines.clone());
    actuator.actuate(Command::Forward, Duration::ZERO).unwrap();

    let writes = lines.writes();
    // start-up idle, forward, stop
    assert_eq!(writes.len(), 18);
    let forward = LineStates::for_command(Command::Forward);
    for (line, level) in &writes[6..12] {
        assert_eq!(*level, forward.level(*line));
    }
    assert!(writes[12..].iter().all(|(_, level)| *level == Level::Low));
}

#[test]
fn line_table_matches_the_wiring() {
    let left = LineStates::for_command(Command::Left);
    assert_eq!(left.level(Line::Ena), Level::Low);
    assert_eq!(left.level(Line::Enb), Level::High);
    assert_eq!(left.level(Line::In4), Level::High);

    let right = LineStates::for_command(Command::Right);
    assert_eq!(right.level(Line::Ena), Level::High);
    assert_eq!(right.level(Line::In2), Level::High);
    assert_eq!(right.level(Line::Enb), Level::Low);

    let back = LineStates::for_command(Command::Backward);
    assert_eq!(back.level(Line::In1), Level::High);
    assert_eq!(back.level(Line::In2), Level::Low);

    assert!(LineStates::for_command(Command::Stop).is_idle());
    assert_eq!(Line::Ena.bcm(), 17);
    assert_eq!(Line::In4.bcm(), 5);
}

#[test]
fn actuate_blocks_for_the_hold() {
    let mut actuator = Actuator::new(MemoryLines::new());
    let start = Instant::now();
    actuator.actuate(Command::Left, Duration::from_millis(30)).unwrap();
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn stop_is_immediate_and_idempotent() {
    let lines = MemoryLines::new();
    let mut actuator = Actuator::new(lines.clone());
    let start = Instant::now();
    actuator.actuate(Command::Stop, Duration::from_secs(5)).unwrap();
    assert!(start.elapsed() < Duration::from_secs(1));
    actuator.stop().unwrap();
    actuator.stop().unwrap();
    assert!(lines.levels().is_idle());
}

#[test]
fn stop_handle_halts_a_running_hold() {
    let lines = MemoryLines::new();
    let mut actuator = Actuator::new(lines.clone());
    let handle = actuator.stop_handle();

    let worker = thread::spawn(move || {
        actuator.actuate(Command::Forward, Duration::from_millis(500)).unwrap();
        actuator
    });
    let deadline = Instant::now() + Duration::from_secs(5);
    while lines.levels().is_idle() {
        assert!(Instant::now() < deadline, "forward never started");
        thread::sleep(Duration::from_millis(1));
    }
    handle.stop().unwrap();
    assert!(lines.levels().is_idle(), "handle did not cut the lines");

    let actuator = worker.join().unwrap();
    assert_eq!(actuator.state(), MotorState::Idle);
}

#[test]
fn stop_handle_latches_until_resumed() {
    let lines = MemoryLines::new();
    let mut actuator = Actuator::new(lines.clone());
    actuator.stop_handle().stop().unwrap();
    assert!(actuator.is_halted());
    let before = lines.writes().len();

    assert_eq!(
        actuator.actuate(Command::Forward, Duration::from_millis(1)),
        Err(ActuatorError::Halted)
    );
    assert_eq!(lines.writes().len(), before);
    assert_eq!(actuator.state(), MotorState::Idle);
    // stopping is still allowed while halted
    actuator.actuate(Command::Stop, Duration::ZERO).unwrap();

    actuator.resume();
    assert!(!actuator.is_halted());
    actuator.actuate(Command::Forward, Duration::from_millis(1)).unwrap();
    assert!(lines.writes().iter().any(|&(_, level)| level == Level::High));
}

#[test]
fn dropping_the_actuator_idles_the_lines() {
    let lines = MemoryLines::new();
    let actuator = Actuator::new(lines.clone());
    let before = lines.writes().len();
    drop(actuator);
    assert_eq!(lines.writes().len(), before + 6);
    assert!(lines.levels().is_idle());
}

/// Lines whose enable pin for motor A is broken.
#[derive(Clone, Default)]
struct FaultyLines(Arc<Mutex<Vec<(Line, Level)>>>);

impl Lines for FaultyLines {
    fn set(&mut self, line: Line, level: Level) -> Result<(), ActuatorError> {
        self.0.lock().unwrap().push((line, level));
        if line == Line::Ena && level == Level::High {
            return Err(ActuatorError::Driver("ENA stuck".into()));
        }
        Ok(())
    }
}

#[test]
fn driver_fault_still_ends_idle() {
    let lines = FaultyLines::default();
    let mut actuator = Actuator::new(lines.clone());
    let err = actuator
        .actuate(Command::Forward, Duration::from_secs(5))
        .unwrap_err();
    assert_eq!(err, ActuatorError::Driver("ENA stuck".into()));
    assert_eq!(actuator.state(), MotorState::Idle);

    let writes = lines.0.lock().unwrap();
    // the failed drive still wrote every line, then all went low
    assert_eq!(writes.len(), 18);
    assert!(writes[12..].iter().all(|(_, level)| *level == Level::Low));
}
