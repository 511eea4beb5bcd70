//! 发射器配置
//!
//! 可序列化的发射器模板，作为 `Emitter::new` 的输入。

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::error::{
    ensure_finite, ensure_finite_vec2, ensure_non_negative, ParticleError, ParticleResult,
};
use crate::impl_default;
use crate::particles::{DragMode, EmissionPolicy, Rect, SizeOverTime};

/// 发射器配置
///
/// 同时作为粒子模板：生成时复制速度、旋转、角速度、大小和寿命，
/// 重力和阻力则在每帧从发射器实时读取。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// 发射区域参考点
    pub origin: Vec2,
    /// 发射区域
    pub spawn_rect: Rect,
    /// 发射区域是否相对 `origin`
    pub relative_to_origin: bool,
    /// 初始速度
    pub initial_velocity: Vec2,
    /// 初始旋转
    pub initial_rotation: f32,
    /// 重力加速度
    pub gravity: Vec2,
    /// 角速度
    pub angular_velocity: f32,
    /// 阻力系数，取值 [0, 1)
    pub drag: f32,
    /// 阻力模式
    pub drag_mode: DragMode,
    /// 初始大小
    pub start_size: f32,
    /// 大小随时间变化
    pub size_over_time: SizeOverTime,
    /// 发射持续时间（秒）
    pub duration: f32,
    /// 粒子寿命（秒）
    pub particle_lifetime: f32,
    /// 持续时间结束后是否继续发射
    pub repeat: bool,
    /// 发射策略
    pub emission: EmissionPolicy,
    /// 随机种子（None = 系统熵）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl_default!(EmitterConfig {
    origin: Vec2::ZERO,
    spawn_rect: Rect::default(),
    relative_to_origin: true,
    initial_velocity: Vec2::ZERO,
    initial_rotation: 0.0,
    gravity: Vec2::ZERO,
    angular_velocity: 0.0,
    drag: 0.0,
    drag_mode: DragMode::PerStep,
    start_size: 100.0,
    size_over_time: SizeOverTime::Constant,
    duration: 10.0,
    particle_lifetime: 10.0,
    repeat: true,
    emission: EmissionPolicy::Manual,
    seed: None,
});

impl EmitterConfig {
    /// 设置重力
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// 设置初始速度
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.initial_velocity = velocity;
        self
    }

    /// 设置阻力
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// 设置发射区域
    pub fn with_spawn_rect(mut self, rect: Rect) -> Self {
        self.spawn_rect = rect;
        self
    }

    /// 设置粒子寿命
    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.particle_lifetime = lifetime;
        self
    }

    /// 设置发射策略
    pub fn with_emission(mut self, emission: EmissionPolicy) -> Self {
        self.emission = emission;
        self
    }

    /// 设置随机种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 验证配置
    pub fn validate(&self) -> ParticleResult<()> {
        ensure_finite_vec2("origin", self.origin)?;
        self.spawn_rect.validate()?;
        ensure_finite_vec2("initial_velocity", self.initial_velocity)?;
        ensure_finite("initial_rotation", self.initial_rotation)?;
        ensure_finite_vec2("gravity", self.gravity)?;
        ensure_finite("angular_velocity", self.angular_velocity)?;
        validate_drag(self.drag)?;
        validate_start_size(self.start_size)?;
        self.size_over_time.validate()?;
        ensure_non_negative("duration", self.duration)?;
        ensure_non_negative("particle_lifetime", self.particle_lifetime)?;
        self.emission.validate()?;
        Ok(())
    }
}

pub(crate) fn validate_drag(drag: f32) -> ParticleResult<()> {
    if !(0.0..1.0).contains(&drag) {
        return Err(ParticleError::invalid(format!(
            "drag must be in [0, 1), got {drag}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_start_size(size: f32) -> ParticleResult<()> {
    ensure_finite("start_size", size)?;
    if size <= 0.0 {
        return Err(ParticleError::invalid(format!(
            "start_size must be positive, got {size}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EmitterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.start_size, 100.0);
        assert_eq!(config.duration, 10.0);
        assert!(config.repeat);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            EmitterConfig::default().with_drag(1.0),
            EmitterConfig::default().with_drag(-0.1),
            EmitterConfig::default().with_drag(f32::NAN),
            EmitterConfig::default().with_lifetime(-1.0),
            EmitterConfig::default().with_gravity(Vec2::new(f32::INFINITY, 0.0)),
            EmitterConfig::default().with_velocity(Vec2::new(0.0, f32::NAN)),
            EmitterConfig {
                start_size: 0.0,
                ..Default::default()
            },
            EmitterConfig {
                duration: -2.0,
                ..Default::default()
            },
            EmitterConfig::default().with_emission(EmissionPolicy::Rate { per_second: -5.0 }),
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(ParticleError::InvalidConfiguration(_))),
                "accepted {:?}",
                config
            );
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EmitterConfig = toml::from_str(
            r#"
            gravity = [0.0, -10.0]
            drag = 0.1
            emission = { type = "rate", per_second = 25.0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.gravity, Vec2::new(0.0, -10.0));
        assert_eq!(config.emission, EmissionPolicy::Rate { per_second: 25.0 });
        assert_eq!(config.particle_lifetime, 10.0);
        assert!(config.seed.is_none());
    }
}
