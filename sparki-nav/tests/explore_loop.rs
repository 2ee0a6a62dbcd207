//! Control loop scenarios against a simulated robot.

use approx::assert_relative_eq;
use sparki_link::{LinkConfig, MockTransport, SparkiLink, WheelSteps};
use sparki_map::NullSink;
use sparki_nav::{
    CycleOutcome, ExploreController, ExploreState, Reading, RobotLink, SparkiConfig, TurnConfig,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Ping,
    Wheels,
    Forward,
    Left,
    Stop,
    Delay(u64),
}

/// Robot whose left wheel advances a fixed number of steps per forward
/// command and per turning delay.
struct SimulatedRobot {
    pings: VecDeque<Option<u32>>,
    left_steps: i32,
    forward_steps: i32,
    turn_steps_per_poll: i32,
    turning: bool,
    failing_wheel_reads: usize,
    commands: Vec<Command>,
    /// Cleared after this many pings, when set
    shutdown: Option<(Arc<AtomicBool>, usize)>,
}

impl SimulatedRobot {
    fn new(forward_steps: i32, turn_steps_per_poll: i32) -> Self {
        Self {
            pings: VecDeque::new(),
            left_steps: 0,
            forward_steps,
            turn_steps_per_poll,
            turning: false,
            failing_wheel_reads: 0,
            commands: Vec::new(),
            shutdown: None,
        }
    }

    fn with_pings(mut self, pings: &[Option<u32>]) -> Self {
        self.pings = pings.iter().copied().collect();
        self
    }

    fn count(&self, command: Command) -> usize {
        self.commands.iter().filter(|c| **c == command).count()
    }
}

impl RobotLink for SimulatedRobot {
    fn request_ping(&mut self) -> sparki_link::Result<u32> {
        self.commands.push(Command::Ping);
        if let Some((flag, remaining)) = self.shutdown.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                flag.store(false, Ordering::SeqCst);
            }
        }
        match self.pings.pop_front() {
            Some(Some(cm)) => Ok(cm),
            Some(None) => Err(sparki_link::Error::Timeout),
            None => Ok(100),
        }
    }

    fn request_wheels(&mut self) -> sparki_link::Result<WheelSteps> {
        self.commands.push(Command::Wheels);
        if self.failing_wheel_reads > 0 {
            self.failing_wheel_reads -= 1;
            return Err(sparki_link::Error::Timeout);
        }
        Ok(WheelSteps {
            left: self.left_steps,
            right: self.left_steps,
        })
    }

    fn move_forward(&mut self) {
        self.commands.push(Command::Forward);
        self.turning = false;
        self.left_steps += self.forward_steps;
    }

    fn move_left(&mut self) {
        self.commands.push(Command::Left);
        self.turning = true;
    }

    fn stop(&mut self) {
        self.commands.push(Command::Stop);
        self.turning = false;
    }

    fn delay(&mut self, time: Duration) {
        self.commands.push(Command::Delay(time.as_millis() as u64));
        if self.turning {
            // Left turn spins the left wheel backwards
            self.left_steps -= self.turn_steps_per_poll;
        }
    }
}

fn controller() -> ExploreController {
    ExploreController::from_config(&SparkiConfig::default())
}

fn steps_per_cm() -> f64 {
    4000.0 / (5.0 * std::f64::consts::PI)
}

#[test]
fn test_clear_path_advances_along_heading() {
    let mut robot = SimulatedRobot::new(4000, 0);
    let mut nav = controller();

    let outcome = nav.step(&mut robot, &mut NullSink);

    assert_eq!(outcome.reading(), Some(Reading::Distance(100)));
    assert_relative_eq!(outcome.moved_cm(), 5.0 * std::f64::consts::PI, epsilon = 1e-9);
    assert_relative_eq!(nav.pose().x, 250.0 + 5.0 * std::f64::consts::PI, epsilon = 1e-9);
    assert_relative_eq!(nav.pose().y, 250.0, epsilon = 1e-9);
    assert_eq!(nav.state(), ExploreState::Explore);
    assert_eq!(nav.estimator().baseline(), 4000.0);
    assert_eq!(
        robot.commands,
        vec![Command::Ping, Command::Forward, Command::Wheels]
    );
}

#[test]
fn test_reading_is_mapped_before_moving() {
    let mut robot = SimulatedRobot::new(0, 0).with_pings(&[Some(30)]);
    let mut nav = controller();

    let outcome = nav.step(&mut robot, &mut NullSink);

    let CycleOutcome::Explored {
        sweep: Some(stats), ..
    } = &outcome
    else {
        panic!("expected a mapped explore cycle, got {:?}", outcome);
    };
    assert_eq!(stats.passes, 15);
    assert_eq!(nav.grid().frames(), 15);
    assert!(nav.grid().get(280, 250).unwrap() > 1.0);
    assert_eq!(nav.grid().get(200, 250), Some(1.0));
}

#[test]
fn test_obstacle_triggers_turn() {
    // 100 steps per poll is ~5.29° measured; 11 polls lands at ~58.2°
    let mut robot = SimulatedRobot::new(1000, 100).with_pings(&[Some(20)]);
    let mut nav = controller();

    let first = nav.step(&mut robot, &mut NullSink);
    assert_eq!(first.reading(), Some(Reading::Distance(20)));
    assert_eq!(nav.state(), ExploreState::Avoid);
    robot.commands.clear();

    let second = nav.step(&mut robot, &mut NullSink);
    let turn = second.turn().expect("turn outcome").clone();
    assert!(turn.completed);
    assert_eq!(turn.polls, 11);
    assert!(turn.turned_deg >= 55.0 && turn.turned_deg <= 59.0);
    assert_eq!(nav.state(), ExploreState::Explore);
    assert_relative_eq!(nav.pose().heading_deg, 90.0);

    // Baseline follows the wheels after the turn
    assert_eq!(nav.estimator().baseline(), f64::from(robot.left_steps));

    // Every poll stops the motors
    let mut expected = vec![Command::Left];
    for _ in 0..11 {
        expected.extend([
            Command::Left,
            Command::Delay(200),
            Command::Wheels,
            Command::Stop,
        ]);
    }
    expected.extend([Command::Stop, Command::Wheels]);
    assert_eq!(robot.commands, expected);
}

#[test]
fn test_threshold_is_strict() {
    let mut robot = SimulatedRobot::new(0, 100).with_pings(&[Some(25)]);
    let mut nav = controller();

    nav.step(&mut robot, &mut NullSink);
    assert_eq!(nav.state(), ExploreState::Explore);
}

#[test]
fn test_four_turns_return_heading_to_zero() {
    let mut robot =
        SimulatedRobot::new(500, 100).with_pings(&[Some(10), Some(10), Some(10), Some(10)]);
    let mut nav = controller();

    let mut headings = Vec::new();
    for _ in 0..4 {
        nav.step(&mut robot, &mut NullSink);
        nav.step(&mut robot, &mut NullSink);
        headings.push(nav.pose().heading_deg);
    }
    assert_eq!(headings, vec![90.0, 180.0, 270.0, 0.0]);
    assert_eq!(nav.cycles(), 8);
}

#[test]
fn test_missing_ping_holds_position() {
    let mut robot = SimulatedRobot::new(4000, 0).with_pings(&[None]);
    let mut nav = controller();

    let outcome = nav.step(&mut robot, &mut NullSink);

    assert_eq!(
        outcome,
        CycleOutcome::Explored {
            reading: Reading::Missing,
            moved_cm: 0.0,
            sweep: None,
        }
    );
    assert_eq!(outcome.reading().map(|r| r.as_sentinel()), Some(-1));
    assert_eq!(nav.state(), ExploreState::Explore);
    assert_eq!(nav.grid().frames(), 0);
    assert_eq!(nav.pose().x, 250.0);
    assert_eq!(robot.commands, vec![Command::Ping, Command::Stop]);
}

#[test]
fn test_failed_wheel_read_credits_no_progress() {
    let mut robot = SimulatedRobot::new(4000, 0);
    robot.failing_wheel_reads = 1;
    let mut nav = controller();

    let outcome = nav.step(&mut robot, &mut NullSink);
    assert_eq!(outcome.moved_cm(), 0.0);
    assert_eq!(nav.estimator().baseline(), 0.0);
    assert_eq!(nav.pose().x, 250.0);

    // The next good read credits both moves
    nav.step(&mut robot, &mut NullSink);
    assert_relative_eq!(nav.pose().x, 250.0 + 8000.0 / steps_per_cm(), epsilon = 1e-9);
}

#[test]
fn test_stuck_turn_gives_up() {
    let config = SparkiConfig {
        turn: TurnConfig {
            max_polls: 5,
            ..TurnConfig::default()
        },
        ..SparkiConfig::default()
    };
    let mut robot = SimulatedRobot::new(0, 0).with_pings(&[Some(5)]);
    let mut nav = ExploreController::from_config(&config);

    nav.step(&mut robot, &mut NullSink);
    let outcome = nav.step(&mut robot, &mut NullSink);
    let turn = outcome.turn().expect("turn outcome");

    assert!(!turn.completed);
    assert_eq!(turn.polls, 5);
    assert_eq!(turn.turned_deg, 0.0);
    assert_eq!(nav.pose().heading_deg, 90.0);
    assert_eq!(nav.state(), ExploreState::Explore);
}

#[test]
fn test_sync_baseline_uses_current_count() {
    let mut robot = SimulatedRobot::new(0, 0);
    robot.left_steps = 123_456;
    let mut nav = controller();

    assert!(nav.sync_baseline(&mut robot));
    assert_eq!(nav.estimator().baseline(), 123_456.0);

    robot.failing_wheel_reads = 1;
    assert!(!nav.sync_baseline(&mut robot));
    assert_eq!(nav.estimator().baseline(), 123_456.0);
}

#[test]
fn test_run_until_flag_cleared() {
    let running = Arc::new(AtomicBool::new(true));
    let mut robot = SimulatedRobot::new(100, 0);
    robot.shutdown = Some((running.clone(), 3));
    let mut nav = controller();

    let cycles = nav.run(&mut robot, &mut NullSink, &running);

    assert_eq!(cycles, 3);
    assert_eq!(robot.count(Command::Ping), 3);
    assert_eq!(robot.commands.last(), Some(&Command::Stop));
}

#[test]
fn test_run_with_cleared_flag_only_stops() {
    let running = AtomicBool::new(false);
    let mut robot = SimulatedRobot::new(100, 0);
    let mut nav = controller();

    assert_eq!(nav.run(&mut robot, &mut NullSink, &running), 0);
    assert_eq!(robot.commands, vec![Command::Stop]);
}

#[test]
fn test_cycle_over_serial_link() {
    let mock = MockTransport::new();
    let mut link = SparkiLink::new(mock.clone(), LinkConfig::default());
    mock.inject_response("100");
    mock.inject_response("400 400");

    let mut nav = controller();
    let outcome = nav.step(&mut link, &mut NullSink);

    assert_eq!(outcome.reading(), Some(Reading::Distance(100)));
    assert_relative_eq!(outcome.moved_cm(), 400.0 / steps_per_cm(), epsilon = 1e-9);
    assert_eq!(mock.get_written(), vec![6, 1, 7]);
}

#[test]
fn test_ping_timeout_over_serial_link() {
    let mock = MockTransport::new();
    let mut link = SparkiLink::new(mock.clone(), LinkConfig::default());
    mock.inject_timeout();

    let mut nav = controller();
    let outcome = nav.step(&mut link, &mut NullSink);

    assert_eq!(outcome.reading(), Some(Reading::Missing));
    assert_eq!(mock.get_written(), vec![6, 8]);
}
