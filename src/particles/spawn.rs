//! 发射区域
//!
//! 轴对齐矩形，宽高为零时退化为单点。采样约定为 `[x, x + width) × [y, y + height)`。

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{ensure_finite, ParticleError, ParticleResult};

/// 轴对齐发射矩形
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// 左下角 x
    pub x: f32,
    /// 左下角 y
    pub y: f32,
    /// 宽度（非负）
    pub width: f32,
    /// 高度（非负）
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 退化为单点的矩形
    pub const fn point(position: Vec2) -> Self {
        Self::new(position.x, position.y, 0.0, 0.0)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// 面积为零（点或线段）
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// 平移后的矩形
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// 闭区间包含测试
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// 在矩形内均匀采样，两轴独立抽取
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let u1: f32 = rng.gen();
        let u2: f32 = rng.gen();
        Vec2::new(self.x + self.width * u1, self.y + self.height * u2)
    }

    /// 验证
    pub fn validate(&self) -> ParticleResult<()> {
        ensure_finite("spawn_rect.x", self.x)?;
        ensure_finite("spawn_rect.y", self.y)?;
        ensure_finite("spawn_rect.width", self.width)?;
        ensure_finite("spawn_rect.height", self.height)?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ParticleError::invalid(format!(
                "spawn_rect size must not be negative, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
