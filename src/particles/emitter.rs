//! 粒子发射器
//!
//! 发射器拥有模板配置和全部存活粒子。每帧由宿主调用 [`Emitter::update`]：
//!
//! 1. 推进运行时间
//! 2. 仍在发射期内（`repeat` 或 `runtime < duration`）时按发射策略生成粒子
//! 3. 更新每个存活粒子（包括本帧新生成的）
//! 4. 移除寿命耗尽的粒子并释放其渲染绑定
//!
//! 时间只来自调用方传入的 `delta_time`，随机数来自可播种的 `StdRng`，
//! 因此相同种子和相同步长序列得到相同结果。

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::emission::{EmissionPolicy, EmissionState};
use super::particle::{Particle, ParticleEnv};
use super::size::SizeOverTime;
use super::spawn::Rect;
use crate::config::emitter::{validate_drag, validate_start_size};
use crate::config::EmitterConfig;
use crate::core::error::{
    ensure_finite, ensure_finite_vec2, ensure_non_negative, ParticleResult, RenderError,
};
use crate::render::{NullRenderer, Renderer};

/// 发射器统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EmitterStats {
    /// 当前存活粒子数
    pub alive_count: usize,
    /// 总发射数
    pub total_spawned: u64,
    /// 总过期数
    pub total_expired: u64,
    /// 渲染调用失败次数
    pub render_failures: u64,
}

/// 单帧更新结果
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateReport {
    /// 本帧自动发射数
    pub spawned: usize,
    /// 本帧移除数
    pub expired: usize,
    /// 更新后存活数
    pub alive: usize,
    /// 本帧（及之前手动发射时）累积的渲染错误
    pub render_errors: Vec<RenderError>,
}

impl UpdateReport {
    /// 没有渲染错误
    pub fn is_clean(&self) -> bool {
        self.render_errors.is_empty()
    }
}

/// 粒子发射器
pub struct Emitter<R: Renderer = NullRenderer> {
    config: EmitterConfig,
    runtime: f32,
    emission: EmissionState,
    rng: StdRng,
    particles: Vec<Particle>,
    renderer: R,
    render_errors: Vec<RenderError>,
    stats: EmitterStats,
}

impl Emitter<NullRenderer> {
    /// 创建不输出画面的发射器
    pub fn new(config: EmitterConfig) -> ParticleResult<Self> {
        Self::with_renderer(config, NullRenderer::default())
    }
}

impl<R: Renderer> Emitter<R> {
    /// 创建发射器，配置非法时返回 `InvalidConfiguration`
    pub fn with_renderer(config: EmitterConfig, renderer: R) -> ParticleResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::debug!(
            target: "particles",
            seed = ?config.seed,
            emission = ?config.emission,
            lifetime = config.particle_lifetime,
            "Emitter created"
        );

        Ok(Self {
            config,
            runtime: 0.0,
            emission: EmissionState::default(),
            rng,
            particles: Vec::new(),
            renderer,
            render_errors: Vec::new(),
            stats: EmitterStats::default(),
        })
    }

    /// 设置模板运动学参数
    pub fn configure(
        &mut self,
        initial_velocity: Vec2,
        gravity: Vec2,
        angular_velocity: f32,
    ) -> ParticleResult<()> {
        ensure_finite_vec2("initial_velocity", initial_velocity)?;
        ensure_finite_vec2("gravity", gravity)?;
        ensure_finite("angular_velocity", angular_velocity)?;

        self.config.initial_velocity = initial_velocity;
        self.config.gravity = gravity;
        self.config.angular_velocity = angular_velocity;
        Ok(())
    }

    pub fn set_origin(&mut self, origin: Vec2) -> ParticleResult<()> {
        ensure_finite_vec2("origin", origin)?;
        self.config.origin = origin;
        Ok(())
    }

    pub fn set_spawn_rect(&mut self, rect: Rect, relative_to_origin: bool) -> ParticleResult<()> {
        rect.validate()?;
        self.config.spawn_rect = rect;
        self.config.relative_to_origin = relative_to_origin;
        Ok(())
    }

    pub fn set_drag(&mut self, drag: f32) -> ParticleResult<()> {
        validate_drag(drag)?;
        self.config.drag = drag;
        Ok(())
    }

    /// 只影响之后生成的粒子
    pub fn set_start_size(&mut self, size: f32) -> ParticleResult<()> {
        validate_start_size(size)?;
        self.config.start_size = size;
        Ok(())
    }

    pub fn set_size_over_time(&mut self, size_over_time: SizeOverTime) -> ParticleResult<()> {
        size_over_time.validate()?;
        self.config.size_over_time = size_over_time;
        Ok(())
    }

    /// 切换发射策略并清空累积状态
    pub fn set_emission(&mut self, emission: EmissionPolicy) -> ParticleResult<()> {
        emission.validate()?;
        self.config.emission = emission;
        self.emission.reset();
        Ok(())
    }

    pub fn set_duration(&mut self, duration: f32, repeat: bool) -> ParticleResult<()> {
        ensure_non_negative("duration", duration)?;
        self.config.duration = duration;
        self.config.repeat = repeat;
        Ok(())
    }

    /// 只影响之后生成的粒子
    pub fn set_particle_lifetime(&mut self, lifetime: f32) -> ParticleResult<()> {
        ensure_non_negative("particle_lifetime", lifetime)?;
        self.config.particle_lifetime = lifetime;
        Ok(())
    }

    /// 实际采样区域（相对模式下已加上 origin）
    pub fn spawn_area(&self) -> Rect {
        if self.config.relative_to_origin {
            self.config.spawn_rect.translated(self.config.origin)
        } else {
            self.config.spawn_rect
        }
    }

    /// 生成 `count` 个粒子，返回生成数
    ///
    /// 渲染绑定创建失败时粒子仍然生成并参与模拟，错误在下一次
    /// [`update`](Self::update) 的报告中返回。
    pub fn spawn(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }

        let area = self.spawn_area();
        self.particles.reserve(count);

        for _ in 0..count {
            let mut particle = Particle::new(area.sample(&mut self.rng), &self.config);
            match self.renderer.create_binding(particle.size()) {
                Ok(handle) => {
                    particle.bind(handle);
                    if let Err(err) = particle.render(&mut self.renderer) {
                        self.record_render_error(err);
                    }
                }
                Err(err) => self.record_render_error(err),
            }
            self.particles.push(particle);
        }

        self.stats.total_spawned += count as u64;
        self.stats.alive_count = self.particles.len();
        tracing::debug!(
            target: "particles",
            count,
            alive = self.particles.len(),
            runtime = self.runtime,
            "Particles spawned"
        );
        count
    }

    /// 推进一帧
    ///
    /// `delta_time` 为负或非有限值时返回错误且不修改任何状态。
    pub fn update(&mut self, delta_time: f32) -> ParticleResult<UpdateReport> {
        ensure_non_negative("delta_time", delta_time)?;

        self.runtime += delta_time;

        let mut report = UpdateReport::default();
        if self.is_emitting() {
            let count =
                self.emission
                    .particles_to_emit(&self.config.emission, self.runtime, delta_time);
            report.spawned = self.spawn(count);
        }

        let env = ParticleEnv {
            gravity: self.config.gravity,
            drag: self.config.drag,
            drag_mode: self.config.drag_mode,
            runtime: self.runtime,
            size_over_time: &self.config.size_over_time,
        };
        for particle in &mut self.particles {
            if let Err(err) = particle.update(delta_time, &env, &mut self.renderer) {
                self.stats.render_failures += 1;
                self.render_errors.push(err);
            }
        }

        report.expired = self.remove_expired();
        report.alive = self.particles.len();
        report.render_errors = std::mem::take(&mut self.render_errors);

        if let Some(first) = report.render_errors.first() {
            tracing::warn!(
                target: "particles",
                failures = report.render_errors.len(),
                error = %first,
                "Renderer failures during update"
            );
        }
        tracing::trace!(
            target: "particles",
            delta_time,
            runtime = self.runtime,
            alive = report.alive,
            "Emitter updated"
        );

        Ok(report)
    }

    /// 对所有存活粒子施加一次性冲量
    pub fn apply_force(&mut self, force: Vec2) {
        for particle in &mut self.particles {
            particle.apply_force(force);
        }
    }

    /// 清空粒子并把时钟归零
    pub fn reset(&mut self) {
        let released = self.release_all();
        self.runtime = 0.0;
        self.emission.reset();
        tracing::debug!(target: "particles", released, "Emitter reset");
    }

    /// 仍处于发射期
    pub fn is_emitting(&self) -> bool {
        self.config.repeat || self.runtime < self.config.duration
    }

    /// 发射期结束且没有存活粒子
    pub fn is_finished(&self) -> bool {
        !self.is_emitting() && self.particles.is_empty()
    }

    /// 取出尚未上报的渲染错误
    pub fn take_render_errors(&mut self) -> Vec<RenderError> {
        std::mem::take(&mut self.render_errors)
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn runtime(&self) -> f32 {
        self.runtime
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn stats(&self) -> EmitterStats {
        self.stats
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn record_render_error(&mut self, err: RenderError) {
        tracing::debug!(target: "particles", error = %err, "Renderer call failed");
        self.stats.render_failures += 1;
        self.render_errors.push(err);
    }

    fn remove_expired(&mut self) -> usize {
        let before = self.particles.len();
        let renderer = &mut self.renderer;
        let errors = &mut self.render_errors;
        let failures = &mut self.stats.render_failures;

        self.particles.retain(|particle| {
            if !particle.is_expired() {
                return true;
            }
            if let Some(handle) = particle.binding() {
                if let Err(err) = renderer.release(handle) {
                    *failures += 1;
                    errors.push(err);
                }
            }
            false
        });

        let expired = before - self.particles.len();
        self.stats.total_expired += expired as u64;
        self.stats.alive_count = self.particles.len();
        if expired > 0 {
            tracing::debug!(
                target: "particles",
                expired,
                alive = self.particles.len(),
                "Expired particles removed"
            );
        }
        expired
    }

    fn release_all(&mut self) -> usize {
        let count = self.particles.len();
        for particle in self.particles.drain(..) {
            if let Some(handle) = particle.binding() {
                if let Err(err) = self.renderer.release(handle) {
                    self.stats.render_failures += 1;
                    self.render_errors.push(err);
                }
            }
        }
        self.stats.alive_count = 0;
        count
    }
}

impl<R: Renderer> Drop for Emitter<R> {
    fn drop(&mut self) {
        let released = self.release_all();
        if !self.render_errors.is_empty() {
            tracing::warn!(
                target: "particles",
                failures = self.render_errors.len(),
                "Emitter dropped with unreported renderer failures"
            );
        }
        tracing::trace!(target: "particles", released, "Emitter dropped");
    }
}
