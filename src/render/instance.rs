//! 精灵实例缓冲
//!
//! 为每个存活绑定维护一个紧凑的 `#[repr(C)]` 实例，外部 GPU 层可直接上传
//! [`InstanceRenderer::as_bytes`]。释放时使用 swap_remove 保持缓冲连续。

use std::collections::HashMap;

use super::{BindingHandle, Renderer, SpriteTransform};
use crate::core::error::{RenderError, RenderResult};

/// GPU 精灵实例（对应着色器中的实例属性）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    /// 位置
    pub position: [f32; 2],
    /// 旋转
    pub rotation: f32,
    /// 大小
    pub size: f32,
}

impl From<&SpriteTransform> for SpriteInstance {
    fn from(transform: &SpriteTransform) -> Self {
        Self {
            position: transform.position.to_array(),
            rotation: transform.rotation,
            size: transform.size,
        }
    }
}

/// 实例缓冲渲染器
#[derive(Debug, Default)]
pub struct InstanceRenderer {
    next_id: u64,
    instances: Vec<SpriteInstance>,
    /// 与 `instances` 一一对应
    owners: Vec<BindingHandle>,
    slots: HashMap<BindingHandle, usize>,
}

impl InstanceRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            owners: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// 实例数
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    /// 按字节视图，用于上传
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn instance(&self, handle: BindingHandle) -> Option<&SpriteInstance> {
        self.slots.get(&handle).map(|&i| &self.instances[i])
    }
}

impl Renderer for InstanceRenderer {
    fn create_binding(&mut self, initial_size: f32) -> RenderResult<BindingHandle> {
        let handle = BindingHandle::new(self.next_id);
        self.next_id += 1;

        self.slots.insert(handle, self.instances.len());
        self.owners.push(handle);
        self.instances.push(SpriteInstance {
            size: initial_size,
            ..Default::default()
        });
        Ok(handle)
    }

    fn set_transform(
        &mut self,
        handle: BindingHandle,
        transform: &SpriteTransform,
    ) -> RenderResult<()> {
        let index = *self
            .slots
            .get(&handle)
            .ok_or(RenderError::UnknownBinding(handle))?;
        self.instances[index] = SpriteInstance::from(transform);
        Ok(())
    }

    fn release(&mut self, handle: BindingHandle) -> RenderResult<()> {
        let index = self
            .slots
            .remove(&handle)
            .ok_or(RenderError::UnknownBinding(handle))?;

        self.instances.swap_remove(index);
        self.owners.swap_remove(index);
        if let Some(&moved) = self.owners.get(index) {
            self.slots.insert(moved, index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 16);
    }

    #[test]
    fn test_release_keeps_buffer_packed() {
        let mut renderer = InstanceRenderer::with_capacity(4);
        let a = renderer.create_binding(1.0).unwrap();
        let b = renderer.create_binding(2.0).unwrap();
        let c = renderer.create_binding(3.0).unwrap();

        let moved = SpriteTransform {
            position: Vec2::new(5.0, 6.0),
            rotation: 1.0,
            size: 3.5,
        };
        renderer.set_transform(c, &moved).unwrap();

        renderer.release(a).unwrap();
        assert_eq!(renderer.len(), 2);
        // c 被移动到 a 原来的槽位
        assert_eq!(renderer.instances()[0], SpriteInstance::from(&moved));
        assert_eq!(renderer.instance(c), Some(&SpriteInstance::from(&moved)));
        assert_eq!(renderer.instance(b).map(|i| i.size), Some(2.0));

        renderer.release(c).unwrap();
        renderer.release(b).unwrap();
        assert!(renderer.is_empty());
        assert!(renderer.as_bytes().is_empty());
    }

    #[test]
    fn test_unknown_binding() {
        let mut renderer = InstanceRenderer::new();
        let ghost = BindingHandle::new(99);
        assert_eq!(
            renderer.set_transform(ghost, &SpriteTransform::default()),
            Err(RenderError::UnknownBinding(ghost))
        );
        assert!(renderer.release(ghost).is_err());
    }

    #[test]
    fn test_bytes_view_length() {
        let mut renderer = InstanceRenderer::new();
        renderer.create_binding(1.0).unwrap();
        renderer.create_binding(1.0).unwrap();
        assert_eq!(renderer.as_bytes().len(), 32);
    }
}
