//! 单个粒子
//!
//! 粒子只持有自己的运动学状态。重力、阻力、运行时间等共享参数由所属发射器
//! 在每次更新时通过 [`ParticleEnv`] 传入，因此总是读取发射器的最新值。

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::size::{SizeOverTime, SizeSample};
use crate::config::EmitterConfig;
use crate::core::error::RenderResult;
use crate::render::{BindingHandle, Renderer, SpriteTransform};

/// 阻力模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    /// 每步乘以 `1 - drag`，与步长无关（帧率相关）
    #[default]
    PerStep,
    /// 每秒衰减 `1 - drag`，即每步乘以 `(1 - drag)^dt`
    PerSecond,
}

impl DragMode {
    /// 本步速度缩放系数
    pub fn factor(&self, drag: f32, delta_time: f32) -> f32 {
        match self {
            DragMode::PerStep => 1.0 - drag,
            DragMode::PerSecond => (1.0 - drag).powf(delta_time),
        }
    }
}

/// 发射器共享给粒子的只读参数
#[derive(Debug, Clone, Copy)]
pub struct ParticleEnv<'a> {
    pub gravity: Vec2,
    pub drag: f32,
    pub drag_mode: DragMode,
    /// 发射器运行时间
    pub runtime: f32,
    pub size_over_time: &'a SizeOverTime,
}

/// 粒子
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    /// 冲量累积，每次更新后清零
    acceleration: Vec2,
    rotation: f32,
    angular_velocity: f32,
    start_size: f32,
    size: f32,
    /// 生成时的阻力快照；积分使用发射器的实时值
    drag: f32,
    lifetime: f32,
    remaining_life: f32,
    binding: Option<BindingHandle>,
}

impl Particle {
    /// 以发射器模板在给定位置创建粒子
    pub fn new(position: Vec2, template: &EmitterConfig) -> Self {
        Self {
            position,
            velocity: template.initial_velocity,
            acceleration: Vec2::ZERO,
            rotation: template.initial_rotation,
            angular_velocity: template.angular_velocity,
            start_size: template.start_size,
            size: template.start_size,
            drag: template.drag,
            lifetime: template.particle_lifetime,
            remaining_life: template.particle_lifetime,
            binding: None,
        }
    }

    pub(crate) fn bind(&mut self, handle: BindingHandle) {
        self.binding = Some(handle);
    }

    /// 累积一次性冲量，在下一次更新中消耗
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// 推进一步并把变换推送给渲染器
    ///
    /// `delta_time == 0` 时不做积分，仅重新上报变换。
    /// 渲染失败不会回滚已完成的积分。
    pub fn update<R: Renderer + ?Sized>(
        &mut self,
        delta_time: f32,
        env: &ParticleEnv<'_>,
        renderer: &mut R,
    ) -> RenderResult<()> {
        if delta_time > 0.0 {
            self.integrate(delta_time, env);
        }

        self.size = env.size_over_time.sample(&SizeSample {
            start_size: self.start_size,
            runtime: env.runtime,
            life_fraction: self.life_fraction(),
        });

        self.render(renderer)
    }

    /// 积分顺序固定：重力 → 冲量 → 阻力 → 位置 → 旋转 → 寿命
    fn integrate(&mut self, delta_time: f32, env: &ParticleEnv<'_>) {
        self.velocity += env.gravity * delta_time;

        self.velocity += self.acceleration * delta_time;
        self.acceleration = Vec2::ZERO;

        self.velocity *= env.drag_mode.factor(env.drag, delta_time);

        self.position += self.velocity * delta_time;
        self.rotation += self.angular_velocity * delta_time;
        self.remaining_life -= delta_time;
    }

    /// 上报当前变换
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> RenderResult<()> {
        match self.binding {
            Some(handle) => renderer.set_transform(handle, &self.transform()),
            None => Ok(()),
        }
    }

    pub fn transform(&self) -> SpriteTransform {
        SpriteTransform {
            position: self.position,
            rotation: self.rotation,
            size: self.size,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_life <= 0.0
    }

    /// 生命进度，0 = 刚生成，1 = 到期
    pub fn life_fraction(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining_life / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn drag(&self) -> f32 {
        self.drag
    }

    pub fn remaining_life(&self) -> f32 {
        self.remaining_life
    }

    pub fn binding(&self) -> Option<BindingHandle> {
        self.binding
    }
}
