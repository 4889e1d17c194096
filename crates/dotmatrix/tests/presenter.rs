use std::time::Duration;

use dotmatrix::prelude::*;
use pretty_assertions::assert_eq;

fn presenter(interval_ms: u64) -> Presenter<MemoryDisplay> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dotmatrix=debug")
        .with_test_writer()
        .try_init();
    let canvas = Canvas::new(MemoryDisplay::new(8, 8, ColorMode::Format1bpp));
    Presenter::new(
        canvas,
        PresenterConfig {
            min_frame_interval: Duration::from_millis(interval_ms),
        },
    )
}

fn presents(presenter: &Presenter<MemoryDisplay>) -> usize {
    presenter.with_canvas(|canvas| canvas.display().presents())
}

#[tokio::test(start_paused = true)]
async fn burst_collapses_into_one_deferred_frame() {
    let presenter = presenter(16);

    let first = tokio::spawn({
        let presenter = presenter.clone();
        async move { presenter.show_throttled().await }
    });
    tokio::task::yield_now().await;
    assert_eq!(presents(&presenter), 1);

    for _ in 0..5 {
        assert_eq!(
            presenter.show_throttled().await.unwrap(),
            PresentOutcome::Deferred
        );
    }

    assert_eq!(first.await.unwrap().unwrap(), PresentOutcome::Presented);
    assert_eq!(presents(&presenter), 2);
}

#[tokio::test(start_paused = true)]
async fn lone_request_presents_once() {
    let presenter = presenter(16);
    assert_eq!(
        presenter.show_throttled().await.unwrap(),
        PresentOutcome::Presented
    );
    assert_eq!(presents(&presenter), 1);

    // The window has closed, so the next request presents again
    assert_eq!(
        presenter.show_throttled().await.unwrap(),
        PresentOutcome::Presented
    );
    assert_eq!(presents(&presenter), 2);
}

#[tokio::test(start_paused = true)]
async fn frames_are_spaced_by_the_interval() {
    let presenter = presenter(40);
    let start = tokio::time::Instant::now();

    let first = tokio::spawn({
        let presenter = presenter.clone();
        async move { presenter.show_throttled().await }
    });
    tokio::task::yield_now().await;
    presenter.show_throttled().await.unwrap();
    first.await.unwrap().unwrap();

    // present, wait, deferred present, wait
    assert!(start.elapsed() >= Duration::from_millis(80));
    assert_eq!(presents(&presenter), 2);
}

#[tokio::test(start_paused = true)]
async fn dropped_request_does_not_stall_later_frames() {
    let presenter = presenter(16);

    // Give up on the first request while it is waiting out the interval
    let first = tokio::time::timeout(Duration::from_millis(1), presenter.show_throttled()).await;
    assert!(first.is_err());
    assert_eq!(presents(&presenter), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        presenter.show_throttled().await.unwrap(),
        PresentOutcome::Presented
    );
    assert_eq!(presents(&presenter), 2);
}

#[tokio::test(start_paused = true)]
async fn deferred_frame_survives_a_dropped_request() {
    let presenter = presenter(16);

    let first = tokio::time::timeout(Duration::from_millis(1), presenter.show_throttled()).await;
    assert!(first.is_err());
    assert_eq!(
        presenter.show_throttled().await.unwrap(),
        PresentOutcome::Deferred
    );

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(presents(&presenter), 2);
}

#[test]
fn drawing_through_the_presenter() {
    let presenter = presenter(16);
    presenter.with_canvas(|canvas| canvas.draw_line(0, 0, 7, 7, Color::WHITE));
    assert_eq!(presenter.show().unwrap(), PresentOutcome::Presented);
    assert!(!presenter.is_busy());

    let canvas = presenter.canvas();
    let canvas = canvas.lock().unwrap();
    let frame = canvas.display().presented_frame().unwrap();
    assert_eq!(frame.get_pixel(3, 3), Color::WHITE);
}
