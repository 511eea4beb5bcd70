//! 统一错误处理模块
//!
//! 提供粒子模拟范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析和验证失败
//! - **渲染错误** (`RenderError`): 渲染器绑定创建、更新或释放失败，对模拟本身不致命
//! - **模拟错误** (`ParticleError`): 汇总以上两类，并包含参数校验失败
//!
//! `ParticleError` 可以同时承载配置层和渲染层的错误。

use crate::config::ConfigError;
use crate::render::BindingHandle;
use thiserror::Error;

/// 粒子模拟核心错误类型
#[derive(Error, Debug)]
pub enum ParticleError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// 渲染器协作方错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Failed to create binding: {0}")]
    BindingCreation(String),

    #[error("Unknown binding: {0}")]
    UnknownBinding(BindingHandle),

    #[error("Renderer backend error: {0}")]
    Backend(String),
}

/// 模拟结果类型别名
pub type ParticleResult<T> = Result<T, ParticleError>;
pub type RenderResult<T> = Result<T, RenderError>;

impl ParticleError {
    /// 构造参数校验错误
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// 校验标量为有限值
pub(crate) fn ensure_finite(name: &str, value: f32) -> ParticleResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParticleError::invalid(format!("{name} must be finite, got {value}")))
    }
}

/// 校验二维向量各分量为有限值
pub(crate) fn ensure_finite_vec2(name: &str, value: glam::Vec2) -> ParticleResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParticleError::invalid(format!("{name} must be finite, got {value}")))
    }
}

/// 校验标量为非负有限值
pub(crate) fn ensure_non_negative(name: &str, value: f32) -> ParticleResult<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(ParticleError::invalid(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}
