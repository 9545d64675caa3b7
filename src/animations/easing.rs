use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

pub trait Easing {
    fn ease(&self, t: f32) -> f32;
}

macro_rules! define_easing {
    ($name:ident, $func:expr) => {
        pub struct $name;

        impl Easing for $name {
            fn ease(&self, t: f32) -> f32 {
                $func(t)
            }
        }
    };
}

define_easing!(Linear, |t: f32| t);

// from manim
define_easing!(Smooth, |t: f32| t * t * t * (10. + 6. * t * t - 15. * t));
define_easing!(RushInto, |t: f32| 2. * Smooth.ease(0.5 * t));
define_easing!(RushFrom, |t: f32| 2. * Smooth.ease(0.5 * (t + 1.)) - 1.);
define_easing!(SlowInto, |t: f32| (1. - (1. - t).powi(2)).sqrt());
define_easing!(DoubleSmooth, |t: f32| match t {
    ..0.5 => 0.5 * Smooth.ease(2. * t),
    _ => 0.5 * (1. + Smooth.ease(2. * t - 1.)),
});
define_easing!(ThereAndBack, |t: f32| Smooth.ease(1. - (2. * t - 1.).abs()));

// from https://easings.net/
define_easing!(EaseInOutSine, |t: f32| -((PI * t).cos() - 1.) / 2.);
define_easing!(EaseInOutCubic, |t: f32| match t {
    ..0.5 => 4. * t * t * t,
    _ => (t - 1.).powi(3) * 4. + 1.,
});
define_easing!(EaseOutBack, |t: f32| 1.
    + (t - 1.).powi(2) * (2.70158 * (t - 1.) + 1.70158));

/// Rate functions selectable from the command line and config file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum RateFunc {
    Linear,
    #[default]
    Smooth,
    RushInto,
    RushFrom,
    SlowInto,
    DoubleSmooth,
    ThereAndBack,
    EaseInOutSine,
    EaseInOutCubic,
    EaseOutBack,
}

impl RateFunc {
    fn easing(self) -> &'static dyn Easing {
        match self {
            RateFunc::Linear => &Linear,
            RateFunc::Smooth => &Smooth,
            RateFunc::RushInto => &RushInto,
            RateFunc::RushFrom => &RushFrom,
            RateFunc::SlowInto => &SlowInto,
            RateFunc::DoubleSmooth => &DoubleSmooth,
            RateFunc::ThereAndBack => &ThereAndBack,
            RateFunc::EaseInOutSine => &EaseInOutSine,
            RateFunc::EaseInOutCubic => &EaseInOutCubic,
            RateFunc::EaseOutBack => &EaseOutBack,
        }
    }
}

impl Easing for RateFunc {
    fn ease(&self, t: f32) -> f32 {
        self.easing().ease(t.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RateFunc; 10] = [
        RateFunc::Linear,
        RateFunc::Smooth,
        RateFunc::RushInto,
        RateFunc::RushFrom,
        RateFunc::SlowInto,
        RateFunc::DoubleSmooth,
        RateFunc::ThereAndBack,
        RateFunc::EaseInOutSine,
        RateFunc::EaseInOutCubic,
        RateFunc::EaseOutBack,
    ];

    #[test]
    fn rate_functions_start_at_zero() {
        for f in ALL {
            assert!(f.ease(0.0).abs() < 1e-5, "{f:?}");
        }
    }

    #[test]
    fn rate_functions_end_at_one_except_there_and_back() {
        for f in ALL.into_iter().filter(|f| *f != RateFunc::ThereAndBack) {
            assert!((f.ease(1.0) - 1.0).abs() < 1e-5, "{f:?}");
        }
        assert!(RateFunc::ThereAndBack.ease(1.0).abs() < 1e-5);
        assert!((RateFunc::ThereAndBack.ease(0.5) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn smooth_is_symmetric() {
        assert!((Smooth.ease(0.5) - 0.5).abs() < 1e-6);
        assert!((Smooth.ease(0.25) + Smooth.ease(0.75) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(RateFunc::Linear.ease(-1.0), 0.0);
        assert_eq!(RateFunc::Linear.ease(2.0), 1.0);
    }
}
