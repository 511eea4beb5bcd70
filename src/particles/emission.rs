//! 发射节奏策略
//!
//! 决定发射器每一步自动生成多少粒子。

use serde::{Deserialize, Serialize};

use crate::core::error::{ensure_non_negative, ParticleError, ParticleResult};

/// 爆发间隔下限（秒），0 除外
pub const MIN_BURST_INTERVAL: f32 = 1.0e-3;

/// 速率上限（每秒粒子数）
pub const MAX_EMISSION_RATE: f32 = 1.0e6;

/// 单步自动发射数量上限，超出部分丢弃
pub const MAX_EMISSION_PER_STEP: usize = 100_000;

/// 发射策略
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmissionPolicy {
    /// 不自动发射，由调用方调用 `Emitter::spawn`
    #[default]
    Manual,
    /// 每秒固定数量，小数部分累积到下一帧
    Rate { per_second: f32 },
    /// 运行时间为 0 时发射一批，之后每隔 `interval` 秒再发射一批
    ///
    /// `interval` 为 0 表示只发射一次。
    Burst { count: u32, interval: f32 },
}

impl EmissionPolicy {
    /// 验证
    pub fn validate(&self) -> ParticleResult<()> {
        match *self {
            EmissionPolicy::Manual => Ok(()),
            EmissionPolicy::Rate { per_second } => {
                ensure_non_negative("emission.per_second", per_second)?;
                if per_second > MAX_EMISSION_RATE {
                    return Err(ParticleError::invalid(format!(
                        "emission.per_second must not exceed {MAX_EMISSION_RATE}, got {per_second}"
                    )));
                }
                Ok(())
            }
            EmissionPolicy::Burst { interval, .. } => {
                ensure_non_negative("emission.interval", interval)?;
                if interval > 0.0 && interval < MIN_BURST_INTERVAL {
                    return Err(ParticleError::invalid(format!(
                        "emission.interval must be 0 or at least {MIN_BURST_INTERVAL}, got {interval}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// 发射累积状态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmissionState {
    /// 速率模式下的小数累积
    pub accumulator: f32,
    /// 已触发的爆发次数
    pub bursts_fired: u64,
}

impl EmissionState {
    /// 计算本帧应发射的粒子数
    ///
    /// `runtime` 为本帧推进后的发射器运行时间。结果不超过
    /// [`MAX_EMISSION_PER_STEP`]。
    pub fn particles_to_emit(
        &mut self,
        policy: &EmissionPolicy,
        runtime: f32,
        delta_time: f32,
    ) -> usize {
        match *policy {
            EmissionPolicy::Manual => 0,
            EmissionPolicy::Rate { per_second } => {
                self.accumulator += per_second * delta_time;
                let whole = self.accumulator.floor();
                self.accumulator = if whole.is_finite() {
                    self.accumulator - whole
                } else {
                    0.0
                };
                clamp_per_step(whole as u64)
            }
            EmissionPolicy::Burst { count, interval } => {
                // 第 k 次爆发发生在 k * interval，按运行时间直接求已到期次数
                let due = if interval > 0.0 {
                    ((runtime / interval).floor() as u64).saturating_add(1)
                } else {
                    1
                };
                let pending = due.saturating_sub(self.bursts_fired);
                self.bursts_fired = self.bursts_fired.max(due);
                clamp_per_step(pending.saturating_mul(u64::from(count)))
            }
        }
    }

    /// 重置累积状态
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clamp_per_step(count: u64) -> usize {
    usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(MAX_EMISSION_PER_STEP)
}
