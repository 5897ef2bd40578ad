//! Timing utility tests

use std::time::Duration;

use apphost_infrastructure::TimedOperation;

#[test]
fn test_elapsed_grows() {
    let timer = TimedOperation::start();
    std::thread::sleep(Duration::from_millis(5));

    assert!(timer.elapsed() >= Duration::from_millis(5));
    assert!(timer.elapsed_ms() >= 5);
}
