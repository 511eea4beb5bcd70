//! 无窗口渲染器
//!
//! `NullRenderer` 丢弃所有变换；`RecordingRenderer` 记录每个存活绑定的最后变换，
//! 供测试和无头宿主检查。

use std::collections::HashMap;

use super::{BindingHandle, Renderer, SpriteTransform};
use crate::core::error::{RenderError, RenderResult};

/// 空渲染器
#[derive(Debug, Default)]
pub struct NullRenderer {
    next_id: u64,
}

impl Renderer for NullRenderer {
    fn create_binding(&mut self, _initial_size: f32) -> RenderResult<BindingHandle> {
        let handle = BindingHandle::new(self.next_id);
        self.next_id += 1;
        Ok(handle)
    }

    fn set_transform(
        &mut self,
        _handle: BindingHandle,
        _transform: &SpriteTransform,
    ) -> RenderResult<()> {
        Ok(())
    }

    fn release(&mut self, _handle: BindingHandle) -> RenderResult<()> {
        Ok(())
    }
}

/// 渲染调用统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordingStats {
    pub created: u64,
    pub updated: u64,
    pub released: u64,
}

/// 记录型渲染器
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub(crate) next_id: u64,
    pub(crate) live: HashMap<BindingHandle, SpriteTransform>,
    pub(crate) stats: RecordingStats,
    /// 为真时 `create_binding` 失败
    pub fail_create: bool,
    /// 为真时 `set_transform` 失败
    pub fail_update: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 存活绑定数
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: BindingHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// 绑定最后一次收到的变换
    pub fn transform(&self, handle: BindingHandle) -> Option<&SpriteTransform> {
        self.live.get(&handle)
    }

    pub fn stats(&self) -> RecordingStats {
        self.stats
    }
}

impl Renderer for RecordingRenderer {
    fn create_binding(&mut self, initial_size: f32) -> RenderResult<BindingHandle> {
        if self.fail_create {
            return Err(RenderError::BindingCreation(
                "recording renderer configured to fail".to_string(),
            ));
        }

        let handle = BindingHandle::new(self.next_id);
        self.next_id += 1;
        self.live.insert(
            handle,
            SpriteTransform {
                size: initial_size,
                ..Default::default()
            },
        );
        self.stats.created += 1;
        Ok(handle)
    }

    fn set_transform(
        &mut self,
        handle: BindingHandle,
        transform: &SpriteTransform,
    ) -> RenderResult<()> {
        if self.fail_update {
            return Err(RenderError::Backend("surface lost".to_string()));
        }

        let slot = self
            .live
            .get_mut(&handle)
            .ok_or(RenderError::UnknownBinding(handle))?;
        *slot = *transform;
        self.stats.updated += 1;
        Ok(())
    }

    fn release(&mut self, handle: BindingHandle) -> RenderResult<()> {
        self.live
            .remove(&handle)
            .ok_or(RenderError::UnknownBinding(handle))?;
        self.stats.released += 1;
        Ok(())
    }
}
