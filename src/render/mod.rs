//! 渲染协作方接口
//!
//! 模拟核心不绑定任何图形工具包：宿主注入一个 [`Renderer`]，
//! 每个粒子持有一个 [`BindingHandle`]，每帧通过 `set_transform` 推送变换。
//!
//! ## 架构设计
//!
//! ```text
//! ┌──────────────┐  create_binding / set_transform / release  ┌──────────────┐
//! │   Emitter    │ ─────────────────────────────────────────▶ │   Renderer   │
//! │  + Particle  │ ◀───────────────── BindingHandle ───────── │ (宿主实现)    │
//! └──────────────┘                                             └──────────────┘
//! ```
//!
//! 渲染器从不回写模拟状态；失败只被上报，不影响积分。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use crate::core::error::RenderResult;

pub mod headless;
pub mod instance;

pub use headless::{NullRenderer, RecordingRenderer};
pub use instance::{InstanceRenderer, SpriteInstance};

/// 渲染绑定句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingHandle(pub u64);

impl BindingHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BindingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding#{}", self.0)
    }
}

/// 粒子的可视变换
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteTransform {
    /// 位置
    pub position: Vec2,
    /// 旋转（与角速度同单位）
    pub rotation: f32,
    /// 边长
    pub size: f32,
}

/// 渲染器接口
pub trait Renderer {
    /// 分配一个绘制对象
    fn create_binding(&mut self, initial_size: f32) -> RenderResult<BindingHandle>;

    /// 更新绘制对象的变换，必须幂等
    fn set_transform(
        &mut self,
        handle: BindingHandle,
        transform: &SpriteTransform,
    ) -> RenderResult<()>;

    /// 释放绘制对象
    fn release(&mut self, handle: BindingHandle) -> RenderResult<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn create_binding(&mut self, initial_size: f32) -> RenderResult<BindingHandle> {
        (**self).create_binding(initial_size)
    }

    fn set_transform(
        &mut self,
        handle: BindingHandle,
        transform: &SpriteTransform,
    ) -> RenderResult<()> {
        (**self).set_transform(handle, transform)
    }

    fn release(&mut self, handle: BindingHandle) -> RenderResult<()> {
        (**self).release(handle)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn create_binding(&mut self, initial_size: f32) -> RenderResult<BindingHandle> {
        (**self).create_binding(initial_size)
    }

    fn set_transform(
        &mut self,
        handle: BindingHandle,
        transform: &SpriteTransform,
    ) -> RenderResult<()> {
        (**self).set_transform(handle, transform)
    }

    fn release(&mut self, handle: BindingHandle) -> RenderResult<()> {
        (**self).release(handle)
    }
}

/// 多个发射器共享同一个渲染器
impl<R: Renderer + ?Sized> Renderer for Rc<RefCell<R>> {
    fn create_binding(&mut self, initial_size: f32) -> RenderResult<BindingHandle> {
        self.borrow_mut().create_binding(initial_size)
    }

    fn set_transform(
        &mut self,
        handle: BindingHandle,
        transform: &SpriteTransform,
    ) -> RenderResult<()> {
        self.borrow_mut().set_transform(handle, transform)
    }

    fn release(&mut self, handle: BindingHandle) -> RenderResult<()> {
        self.borrow_mut().release(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_display() {
        assert_eq!(BindingHandle::new(3).to_string(), "binding#3");
        assert_eq!(BindingHandle::new(3).as_u64(), 3);
    }

    #[test]
    fn test_shared_renderer_sees_all_bindings() {
        let shared = Rc::new(RefCell::new(RecordingRenderer::new()));
        let mut a = Rc::clone(&shared);
        let mut b = Rc::clone(&shared);

        let ha = a.create_binding(10.0).unwrap();
        let hb = b.create_binding(20.0).unwrap();
        assert_ne!(ha, hb);
        assert_eq!(shared.borrow().live_count(), 2);
    }

    #[test]
    fn test_boxed_dyn_renderer() {
        let mut boxed: Box<dyn Renderer> = Box::new(NullRenderer::default());
        let handle = boxed.create_binding(1.0).unwrap();
        assert!(boxed
            .set_transform(handle, &SpriteTransform::default())
            .is_ok());
        assert!(boxed.release(handle).is_ok());
    }
}
