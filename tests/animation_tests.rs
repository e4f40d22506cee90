use canvasview::animation::animator::duration_from_ms;
use canvasview::prelude::*;
use std::cell::{Cell, RefCell};

/// Animation lifecycle driven by a deterministic frame clock
#[cfg(test)]
mod animation_tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn zoomed(scale: f64) -> CanvasTransform {
        CanvasTransform::from_viewport(&Viewport {
            scale,
            ..Viewport::new(800.0, 600.0)
        })
    }

    #[test]
    fn test_same_key_replaces_running_animation() {
        init_logging();
        let (animator, scheduler) = TransformAnimator::with_manual_scheduler();
        let first_completed = Rc::new(Cell::new(false));
        let second_completed = Rc::new(Cell::new(0u32));

        let flag = first_completed.clone();
        animator.animate(
            "k",
            TransformAnimation::new(zoomed(1.0), zoomed(2.0))
                .with_duration(duration_from_ms(100.0))
                .on_complete(move |_| flag.set(true)),
        );
        scheduler.advance_by(16.0);

        let count = second_completed.clone();
        animator.animate(
            "k",
            TransformAnimation::new(zoomed(1.0), zoomed(3.0))
                .with_duration(duration_from_ms(100.0))
                .on_complete(move |_| count.set(count.get() + 1)),
        );
        assert_eq!(animator.get_active_animations(), vec!["k".to_string()]);

        scheduler.run_until_idle(16.0, 100);
        assert!(!first_completed.get());
        assert_eq!(second_completed.get(), 1);
        assert!(!animator.is_animating("k"));
    }

    #[test]
    fn test_updates_end_exactly_on_target() {
        let (animator, scheduler) = TransformAnimator::with_manual_scheduler();
        let scales = Rc::new(RefCell::new(Vec::new()));
        let sink = scales.clone();

        animator.animate(
            "zoom",
            TransformAnimation::new(zoomed(1.0), zoomed(5.0))
                .with_duration(duration_from_ms(200.0))
                .with_easing(Easing::EaseInOutCubic)
                .on_update(move |transform| sink.borrow_mut().push(transform.scale)),
        );
        scheduler.run_until_idle(16.0, 100);

        let scales = scales.borrow();
        assert!(scales.len() > 2);
        assert!(scales.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(scales.last(), Some(&5.0));
    }

    #[test]
    fn test_frames_feed_back_into_manager() {
        let (animator, scheduler) = TransformAnimator::with_manual_scheduler();
        let manager = Rc::new(RefCell::new(ViewportManager::new(800.0, 600.0)));
        let from = manager.borrow().get_transform();

        let target = manager.clone();
        zoom_to(
            &animator,
            &from,
            50.0,
            None,
            TransitionOptions::new().with_duration(duration_from_ms(120.0)),
            move |transform| target.borrow_mut().apply_transform(transform),
        );
        scheduler.run_until_idle(16.0, 100);

        // The transition overshoots the default max scale; the manager clamps it.
        assert_eq!(manager.borrow().get_viewport().scale, 10.0);
    }

    #[test]
    fn test_cancel_all_stops_everything() {
        let (animator, scheduler) = TransformAnimator::with_manual_scheduler();
        let updates = Rc::new(Cell::new(0u32));
        for key in ["a", "b", "c"] {
            let counter = updates.clone();
            animator.animate(
                key,
                TransformAnimation::new(zoomed(1.0), zoomed(2.0))
                    .with_duration(duration_from_ms(100.0))
                    .on_update(move |_| counter.set(counter.get() + 1)),
            );
        }
        assert_eq!(animator.active_count(), 3);

        animator.cancel_all();
        scheduler.run_until_idle(16.0, 100);
        assert_eq!(updates.get(), 0);
        assert_eq!(animator.active_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_resolves_with_final_transform() {
        let (animator, scheduler) = TransformAnimator::with_manual_scheduler();
        let handle = pan_to(
            &animator,
            &zoomed(1.0),
            Point::new(40.0, -20.0),
            TransitionOptions::new().with_duration(duration_from_ms(80.0)),
            |_| {},
        );
        scheduler.run_until_idle(16.0, 100);

        let finished = handle.await.unwrap();
        assert_eq!(finished.viewport.offset(), Point::new(40.0, -20.0));
    }

    #[tokio::test]
    async fn test_cancelled_handle_rejects() {
        let (animator, _scheduler) = TransformAnimator::with_manual_scheduler();
        let handle = rotate_to(
            &animator,
            &zoomed(1.0),
            1.0,
            None,
            TransitionOptions::new().with_key("spin"),
            |_| {},
        );
        assert!(animator.cancel("spin"));

        match handle.await {
            Err(ViewError::Cancelled { id }) => assert_eq!(id, "spin"),
            other => panic!("expected cancellation, got {:?}", other),
        }
    }
}
