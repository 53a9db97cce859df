use blind_jump_system_easing::{ease_in, ease_out};

const DURATIONS: [f32; 6] = [1.0, 16.0, 250.0, 500.0, 640.0, 3_000.0];
const STEPS: u32 = 200;

fn samples(duration: f32) -> impl Iterator<Item = f32> {
    (0..=STEPS).map(move |step| duration * step as f32 / STEPS as f32)
}

fn check_laws<In, Out>(ease_in: In, ease_out: Out)
where
    In: Fn(f32, f32) -> f32,
    Out: Fn(f32, f32) -> f32,
{
    for duration in DURATIONS {
        assert_eq!(ease_in(0.0, duration), 0.0);
        assert_eq!(ease_out(0.0, duration), 0.0);
        assert!((ease_in(duration, duration) - 1.0).abs() < 1e-6);
        assert!((ease_out(duration, duration) - 1.0).abs() < 1e-6);

        let mut previous_in = 0.0;
        let mut previous_out = 0.0;
        for elapsed in samples(duration) {
            let eased_in = ease_in(elapsed, duration);
            let eased_out = ease_out(elapsed, duration);
            assert!((0.0..=1.0).contains(&eased_in), "{eased_in} at {elapsed}/{duration}");
            assert!((0.0..=1.0).contains(&eased_out), "{eased_out} at {elapsed}/{duration}");
            assert!(eased_in + 1e-6 >= previous_in, "ease_in decreased at {elapsed}");
            assert!(eased_out + 1e-6 >= previous_out, "ease_out decreased at {elapsed}");
            previous_in = eased_in;
            previous_out = eased_out;

            let mirrored = ease_in(duration - elapsed, duration);
            assert!(
                (eased_out - (1.0 - mirrored)).abs() < 1e-4,
                "duality broken at {elapsed}/{duration}"
            );
        }
    }
}

#[test]
fn first_order_curves_obey_easing_laws() {
    check_laws(ease_in::<1>, ease_out::<1>);
}

#[test]
fn second_order_curves_obey_easing_laws() {
    check_laws(ease_in::<2>, ease_out::<2>);
}

#[test]
fn third_order_curves_obey_easing_laws() {
    check_laws(ease_in::<3>, ease_out::<3>);
}

#[test]
fn higher_orders_ease_in_more_slowly() {
    for elapsed in samples(500.0) {
        assert!(ease_in::<2>(elapsed, 500.0) <= ease_in::<1>(elapsed, 500.0) + 1e-6);
        assert!(ease_out::<2>(elapsed, 500.0) + 1e-6 >= ease_out::<1>(elapsed, 500.0));
    }
}
