//! 大小随时间变化
//!
//! 默认保持初始大小。`Pulse` 以发射器运行时间驱动正弦脉动，
//! `OverLifetime` 以粒子生命进度采样分段线性曲线。

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::error::{ensure_finite, ParticleError, ParticleResult};

/// 粒子大小下限，保证 `size > 0`
pub const MIN_SIZE: f32 = 1.0e-3;

/// 自定义大小函数
pub type SizeFn = Arc<dyn Fn(&SizeSample) -> f32 + Send + Sync>;

/// 采样输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeSample {
    /// 粒子初始大小
    pub start_size: f32,
    /// 发射器运行时间（秒）
    pub runtime: f32,
    /// 生命进度（0 = 刚生成，1 = 到期）
    pub life_fraction: f32,
}

/// 大小曲线类型
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SizeOverTime {
    /// 恒定为初始大小
    #[default]
    Constant,
    /// `start_size + amplitude * sin(runtime * frequency)`
    Pulse { amplitude: f32, frequency: f32 },
    /// `start_size * curve(life_fraction)`，点为 `(t, scale)` 且按 t 升序
    OverLifetime { points: Vec<(f32, f32)> },
    /// 调用方提供的函数，不参与序列化
    #[serde(skip)]
    Custom(SizeFn),
}

impl fmt::Debug for SizeOverTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => f.write_str("Constant"),
            Self::Pulse {
                amplitude,
                frequency,
            } => f
                .debug_struct("Pulse")
                .field("amplitude", amplitude)
                .field("frequency", frequency)
                .finish(),
            Self::OverLifetime { points } => f
                .debug_struct("OverLifetime")
                .field("points", points)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl SizeOverTime {
    /// 包装自定义函数
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&SizeSample) -> f32 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// 采样大小
    pub fn sample(&self, sample: &SizeSample) -> f32 {
        let size = match self {
            Self::Constant => sample.start_size,
            Self::Pulse {
                amplitude,
                frequency,
            } => sample.start_size + amplitude * (sample.runtime * frequency).sin(),
            Self::OverLifetime { points } => {
                sample.start_size * sample_curve(points, sample.life_fraction)
            }
            Self::Custom(f) => f(sample),
        };

        if size.is_finite() {
            size.max(MIN_SIZE)
        } else {
            sample.start_size
        }
    }

    /// 验证
    pub fn validate(&self) -> ParticleResult<()> {
        match self {
            Self::Constant | Self::Custom(_) => Ok(()),
            Self::Pulse {
                amplitude,
                frequency,
            } => {
                ensure_finite("size_over_time.amplitude", *amplitude)?;
                ensure_finite("size_over_time.frequency", *frequency)
            }
            Self::OverLifetime { points } => {
                for &(t, scale) in points {
                    ensure_finite("size_over_time.t", t)?;
                    ensure_finite("size_over_time.scale", scale)?;
                }
                if points.windows(2).any(|w| w[0].0 > w[1].0) {
                    return Err(ParticleError::invalid(
                        "size_over_time points must be sorted by t",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// 曲线采样
fn sample_curve(points: &[(f32, f32)], t: f32) -> f32 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 1.0,
    };

    let t = t.clamp(0.0, 1.0);
    if t <= first.0 {
        return first.1;
    }

    for pair in points.windows(2) {
        let (t0, v0) = pair[0];
        let (t1, v1) = pair[1];
        if t >= t0 && t <= t1 {
            if t1 == t0 {
                return v1;
            }
            let local_t = (t - t0) / (t1 - t0);
            return v0 + (v1 - v0) * local_t;
        }
    }

    last.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(runtime: f32, life_fraction: f32) -> SizeSample {
        SizeSample {
            start_size: 100.0,
            runtime,
            life_fraction,
        }
    }

    #[test]
    fn test_constant_keeps_start_size() {
        let size = SizeOverTime::default();
        assert_eq!(size.sample(&at(0.0, 0.0)), 100.0);
        assert_eq!(size.sample(&at(42.0, 0.9)), 100.0);
    }

    #[test]
    fn test_pulse_follows_runtime() {
        let size = SizeOverTime::Pulse {
            amplitude: 30.0,
            frequency: 1.0,
        };
        assert!((size.sample(&at(0.0, 0.0)) - 100.0).abs() < 1e-4);
        let quarter = std::f32::consts::FRAC_PI_2;
        assert!((size.sample(&at(quarter, 0.0)) - 130.0).abs() < 1e-3);
    }

    #[test]
    fn test_over_lifetime_curve() {
        let size = SizeOverTime::OverLifetime {
            points: vec![(0.0, 1.0), (1.0, 0.0)],
        };
        assert!((size.sample(&at(0.0, 0.5)) - 50.0).abs() < 1e-4);
        // 终点被钳制到下限
        assert_eq!(size.sample(&at(0.0, 1.0)), MIN_SIZE);
    }

    #[test]
    fn test_custom_and_non_finite_fallback() {
        let doubled = SizeOverTime::custom(|s| s.start_size * 2.0);
        assert_eq!(doubled.sample(&at(0.0, 0.0)), 200.0);

        let broken = SizeOverTime::custom(|_| f32::NAN);
        assert_eq!(broken.sample(&at(0.0, 0.0)), 100.0);
        assert_eq!(format!("{:?}", broken), "Custom(..)");
    }

    #[test]
    fn test_sample_curve_edges() {
        assert_eq!(sample_curve(&[], 0.3), 1.0);
        assert_eq!(sample_curve(&[(0.0, 2.0)], 0.7), 2.0);
        assert_eq!(sample_curve(&[(0.2, 2.0), (0.8, 4.0)], 0.0), 2.0);
        assert_eq!(sample_curve(&[(0.2, 2.0), (0.8, 4.0)], 1.0), 4.0);
    }

    #[test]
    fn test_validate_unsorted_points() {
        let size = SizeOverTime::OverLifetime {
            points: vec![(0.5, 1.0), (0.1, 0.0)],
        };
        assert!(size.validate().is_err());
    }
}
