//! Full link sessions over a scripted transport.

use sparki_link::{Error, LinkConfig, MockTransport, SparkiLink, Transport, NO_READING};

fn session() -> (SparkiLink<MockTransport>, MockTransport) {
    let mock = MockTransport::new();
    let mut link = SparkiLink::new(mock.clone(), LinkConfig::for_port("/dev/null"));
    link.connect().unwrap();
    (link, mock)
}

#[test]
fn test_connect_centers_servo() {
    let (link, mock) = session();
    assert_eq!(mock.get_written(), vec![5, 90]);
    assert_eq!(link.servo_angle(), 0);
    assert!(link.is_connected());
}

#[test]
fn test_scan_sweep_then_drive() {
    let (mut link, mock) = session();
    mock.clear_written();

    // Look left, ahead and right, one ping each
    let mut distances = Vec::new();
    for (angle, reply) in [(90, "40"), (0, "12"), (-90, "77")] {
        mock.inject_response(reply);
        link.servo(angle).unwrap();
        distances.push(link.ping());
    }
    assert_eq!(distances, vec![40, 12, 77]);
    assert_eq!(link.servo_angle(), -90);

    mock.inject_response("1200 1187");
    link.move_forward();
    let steps = link.total_travel();
    link.stop();

    assert_eq!((steps.left, steps.right), (1200, 1187));
    assert_eq!(
        mock.get_written(),
        vec![5, 0, 6, 5, 90, 6, 5, 180, 6, 1, 7, 8]
    );
    assert_eq!(mock.pending_reads(), 0);
}

#[test]
fn test_degraded_replies_keep_the_session_alive() {
    let (mut link, mock) = session();

    // Partial frame, then a hard read error, then garbage
    mock.inject_read(b"3");
    mock.inject_timeout();
    assert_eq!(link.ping(), NO_READING);

    mock.inject_read_failure();
    assert_eq!(link.total_travel().left, 0);

    mock.inject_response("far");
    assert!(matches!(
        link.request_ping(),
        Err(Error::InvalidResponse(_))
    ));

    // A good reply afterwards parses normally
    mock.inject_response("18");
    assert_eq!(link.ping(), 18);
}

#[test]
fn test_invalid_servo_angle_writes_nothing() {
    let (mut link, mock) = session();
    mock.clear_written();

    assert!(matches!(link.servo(91), Err(Error::InvalidParameter(_))));
    assert!(matches!(link.servo(-91), Err(Error::InvalidParameter(_))));
    assert!(mock.get_written().is_empty());
    assert_eq!(link.servo_angle(), 0);
}

#[test]
fn test_drop_stops_motors() {
    let (mut link, mock) = session();
    link.move_left();
    drop(link);

    let written = mock.get_written();
    assert_eq!(&written[written.len() - 2..], &[3, 8]);
}

#[test]
fn test_mock_write_all() {
    let mut mock = MockTransport::new();
    mock.write_all(&[1, 2, 3]).unwrap();
    assert_eq!(mock.get_written(), vec![1, 2, 3]);
}
