use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::{Result, ViewError};

/// Period of the elastic curves
const ELASTIC_PERIOD: f64 = 0.3;

/// Named easing curves.
///
/// Every curve maps `0 → 0` and `1 → 1` exactly; input outside `[0, 1]` is
/// clamped. Elastic curves overshoot in between.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
    /// Closed-form damped spring, see [`create_spring_animation`]
    Spring(SpringEasing),
}

impl Easing {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInElastic => elastic_in(t),
            Easing::EaseOutElastic => 1.0 - elastic_in(1.0 - t),
            Easing::EaseInOutElastic => {
                if t < 0.5 {
                    elastic_in(2.0 * t) / 2.0
                } else {
                    1.0 - elastic_in(2.0 - 2.0 * t) / 2.0
                }
            }
            Easing::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Easing::EaseOutBounce => bounce_out(t),
            Easing::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            Easing::Spring(spring) => spring.ease(t),
        }
    }

    /// Every named curve, in declaration order
    pub fn all() -> &'static [Easing] {
        &[
            Easing::Linear,
            Easing::EaseInQuad,
            Easing::EaseOutQuad,
            Easing::EaseInOutQuad,
            Easing::EaseInCubic,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
            Easing::EaseInQuart,
            Easing::EaseOutQuart,
            Easing::EaseInOutQuart,
            Easing::EaseInElastic,
            Easing::EaseOutElastic,
            Easing::EaseInOutElastic,
            Easing::EaseInBounce,
            Easing::EaseOutBounce,
            Easing::EaseInOutBounce,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseInElastic => "easeInElastic",
            Easing::EaseOutElastic => "easeOutElastic",
            Easing::EaseInOutElastic => "easeInOutElastic",
            Easing::EaseInBounce => "easeInBounce",
            Easing::EaseOutBounce => "easeOutBounce",
            Easing::EaseInOutBounce => "easeInOutBounce",
            Easing::Spring(_) => "spring",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        Easing::all()
            .iter()
            .find(|easing| easing.name() == s)
            .copied()
            .ok_or_else(|| ViewError::UnknownEasing(s.to_string()))
    }
}

/// Elastic ease-in with period `p = 0.3`
fn elastic_in(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let s = ELASTIC_PERIOD / 4.0;
    let t = t - 1.0;
    -(2.0_f64.powf(10.0 * t) * ((t - s) * 2.0 * PI / ELASTIC_PERIOD).sin())
}

/// Four-segment parabolic bounce
fn bounce_out(t: f64) -> f64 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

/// Damped harmonic oscillator settling from 0 to 1.
///
/// [`value_at`](Self::value_at) takes physical seconds. As an easing the run
/// is stretched over [`settling_time`](Self::settling_time), and whatever
/// displacement is still left at the end is blended out linearly so the
/// curve reaches 1 without a jump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringEasing {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

/// Residual amplitude at which a spring counts as settled
const SPRING_SETTLE_RESIDUAL: f64 = 1e-3;

/// Longest run, in undamped periods, a spring easing is stretched over
const SPRING_MAX_PERIODS: f64 = 8.0;

/// Which closed-form solution a spring uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpringRegime {
    UnderDamped,
    CriticallyDamped,
    OverDamped,
}

impl SpringEasing {
    /// `ω0 = √(k/m)`
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// `ζ = c / (2√(km))`
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    pub fn regime(&self) -> SpringRegime {
        let zeta = self.damping_ratio();
        if (zeta - 1.0).abs() < 1e-9 {
            SpringRegime::CriticallyDamped
        } else if zeta < 1.0 {
            SpringRegime::UnderDamped
        } else {
            SpringRegime::OverDamped
        }
    }

    /// Seconds until the envelope decays to [`SPRING_SETTLE_RESIDUAL`], capped
    /// at [`SPRING_MAX_PERIODS`] undamped periods so weak or zero damping
    /// still yields a finite run.
    pub fn settling_time(&self) -> f64 {
        let omega0 = self.natural_frequency();
        let zeta = self.damping_ratio();
        // The slowest pole sets the decay rate.
        let decay = if zeta >= 1.0 {
            omega0 * (zeta - (zeta * zeta - 1.0).sqrt())
        } else {
            zeta * omega0
        };
        let cap = SPRING_MAX_PERIODS * TAU / omega0;
        if decay > 0.0 {
            (-SPRING_SETTLE_RESIDUAL.ln() / decay).min(cap)
        } else {
            cap
        }
    }

    /// Eased value at normalised `progress`: 0 at 0, exactly continuous up to
    /// 1 at 1.
    pub fn ease(&self, progress: f64) -> f64 {
        let total = self.settling_time();
        let residual = 1.0 - self.value_at(total);
        self.value_at(progress * total) + progress * residual
    }

    /// Displacement towards the target at time `t`, without clamping.
    pub fn value_at(&self, t: f64) -> f64 {
        let omega0 = self.natural_frequency();
        let zeta = self.damping_ratio();

        match self.regime() {
            SpringRegime::UnderDamped => {
                let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
                let envelope = (-zeta * omega0 * t).exp();
                1.0 - envelope * ((omega_d * t).cos() + (zeta * omega0 / omega_d) * (omega_d * t).sin())
            }
            SpringRegime::CriticallyDamped => 1.0 - (-omega0 * t).exp() * (1.0 + omega0 * t),
            SpringRegime::OverDamped => {
                let root = (zeta * zeta - 1.0).sqrt();
                let r1 = -omega0 * (zeta - root);
                let r2 = -omega0 * (zeta + root);
                1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
            }
        }
    }
}

/// Builds a spring curve from physical constants.
///
/// Stiffness and mass must be positive and damping non-negative.
pub fn create_spring_animation(stiffness: f64, damping: f64, mass: f64) -> Result<SpringEasing> {
    if !(stiffness > 0.0 && mass > 0.0 && damping >= 0.0) {
        return Err(ViewError::Config(format!(
            "invalid spring constants: stiffness={stiffness}, damping={damping}, mass={mass}"
        )));
    }
    Ok(SpringEasing {
        stiffness,
        damping,
        mass,
    })
}
