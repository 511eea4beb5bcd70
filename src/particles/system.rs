//! 粒子系统管理器
//!
//! 宿主持有的发射器集合，取代全局注册表。按插入顺序统一更新。

use std::fmt;

use super::emitter::{Emitter, UpdateReport};
use crate::core::error::{ensure_non_negative, ParticleResult};
use crate::render::{NullRenderer, Renderer};

/// 发射器ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub u64);

impl EmitterId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "emitter#{}", self.0)
    }
}

/// 粒子系统管理器
///
/// 管理多个发射器，提供统一的更新接口。
pub struct ParticleSystemManager<R: Renderer = NullRenderer> {
    /// 发射器列表（插入顺序）
    systems: Vec<(EmitterId, Emitter<R>)>,
    /// 下一个ID
    next_id: u64,
    /// 最大系统数
    max_systems: usize,
}

impl<R: Renderer> ParticleSystemManager<R> {
    /// 创建新的粒子系统管理器
    ///
    /// # 参数
    ///
    /// * `max_systems` - 最大发射器数
    pub fn new(max_systems: usize) -> Self {
        Self {
            systems: Vec::with_capacity(max_systems),
            next_id: 0,
            max_systems,
        }
    }

    /// 添加发射器
    ///
    /// # 返回
    ///
    /// 返回发射器ID；已满时返回 `None`，传入的发射器被丢弃并释放其渲染绑定。
    pub fn add(&mut self, emitter: Emitter<R>) -> Option<EmitterId> {
        if self.systems.len() >= self.max_systems {
            tracing::warn!(
                target: "particles",
                max_systems = self.max_systems,
                "Particle system manager is full, emitter dropped"
            );
            return None;
        }

        let id = EmitterId(self.next_id);
        self.next_id += 1;
        self.systems.push((id, emitter));
        tracing::debug!(target: "particles", %id, count = self.systems.len(), "Emitter added");
        Some(id)
    }

    pub fn get(&self, id: EmitterId) -> Option<&Emitter<R>> {
        self.systems
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, emitter)| emitter)
    }

    pub fn get_mut(&mut self, id: EmitterId) -> Option<&mut Emitter<R>> {
        self.systems
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, emitter)| emitter)
    }

    /// 移除发射器并交还所有权
    pub fn remove(&mut self, id: EmitterId) -> Option<Emitter<R>> {
        let index = self.systems.iter().position(|(sid, _)| *sid == id)?;
        Some(self.systems.remove(index).1)
    }

    /// 更新所有发射器
    ///
    /// `delta_time` 非法时不更新任何发射器。
    pub fn update(&mut self, delta_time: f32) -> ParticleResult<Vec<(EmitterId, UpdateReport)>> {
        ensure_non_negative("delta_time", delta_time)?;

        let mut reports = Vec::with_capacity(self.systems.len());
        for (id, emitter) in &mut self.systems {
            reports.push((*id, emitter.update(delta_time)?));
        }
        Ok(reports)
    }

    /// 移除已结束的发射器，返回移除数
    pub fn remove_finished(&mut self) -> usize {
        let before = self.systems.len();
        self.systems.retain(|(_, emitter)| !emitter.is_finished());
        let removed = before - self.systems.len();
        if removed > 0 {
            tracing::debug!(target: "particles", removed, "Finished emitters removed");
        }
        removed
    }

    pub fn ids(&self) -> impl Iterator<Item = EmitterId> + '_ {
        self.systems.iter().map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmitterId, &Emitter<R>)> + '_ {
        self.systems.iter().map(|(id, emitter)| (*id, emitter))
    }

    /// 所有发射器的存活粒子总数
    pub fn total_particles(&self) -> usize {
        self.systems
            .iter()
            .map(|(_, emitter)| emitter.particle_count())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn max_systems(&self) -> usize {
        self.max_systems
    }

    /// 清空所有发射器
    pub fn clear(&mut self) {
        self.systems.clear();
    }
}

impl<R: Renderer> Default for ParticleSystemManager<R> {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmitterConfig;
    use crate::particles::EmissionPolicy;
    use crate::render::RecordingRenderer;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn emitter() -> Emitter {
        Emitter::new(EmitterConfig::default().with_seed(1)).unwrap()
    }

    #[test]
    fn test_particle_system_manager() {
        let manager: ParticleSystemManager = ParticleSystemManager::new(10);
        assert_eq!(manager.len(), 0);
        assert!(manager.is_empty());
        assert_eq!(manager.max_systems(), 10);
        assert_eq!(ParticleSystemManager::<NullRenderer>::default().max_systems(), 64);
    }

    #[test]
    fn test_add_respects_capacity() {
        let mut manager = ParticleSystemManager::new(2);
        let a = manager.add(emitter()).unwrap();
        let b = manager.add(emitter()).unwrap();
        assert_ne!(a, b);
        assert!(manager.add(emitter()).is_none());
        assert_eq!(manager.ids().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_remove_keeps_order_and_ids() {
        let mut manager = ParticleSystemManager::new(4);
        let a = manager.add(emitter()).unwrap();
        let b = manager.add(emitter()).unwrap();
        let c = manager.add(emitter()).unwrap();

        assert!(manager.remove(b).is_some());
        assert!(manager.remove(b).is_none());
        assert_eq!(manager.ids().collect::<Vec<_>>(), vec![a, c]);

        // ID 不复用
        let d = manager.add(emitter()).unwrap();
        assert_eq!(d.as_u64(), 3);
    }

    #[test]
    fn test_update_steps_every_emitter() {
        let mut manager = ParticleSystemManager::new(4);
        let a = manager.add(emitter()).unwrap();
        let b = manager.add(emitter()).unwrap();
        manager.get_mut(a).unwrap().spawn(3);
        manager
            .get_mut(b)
            .unwrap()
            .set_emission(EmissionPolicy::Rate { per_second: 10.0 })
            .unwrap();

        let reports = manager.update(0.5).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].0, a);
        assert_eq!(reports[1].1.spawned, 5);
        assert_eq!(manager.total_particles(), 8);
        assert_eq!(manager.get(a).unwrap().runtime(), 0.5);

        assert!(manager.update(-1.0).is_err());
        assert_eq!(manager.get(b).unwrap().runtime(), 0.5);
    }

    #[test]
    fn test_remove_finished_releases_bindings() {
        let shared = Rc::new(RefCell::new(RecordingRenderer::new()));
        let mut manager = ParticleSystemManager::new(4);

        let mut done = EmitterConfig::default().with_seed(2).with_lifetime(1.0);
        done.repeat = false;
        done.duration = 0.0;
        let mut finished = Emitter::with_renderer(done, Rc::clone(&shared)).unwrap();
        finished.spawn(2);

        let running = Emitter::with_renderer(
            EmitterConfig::default().with_seed(3),
            Rc::clone(&shared),
        )
        .unwrap();

        manager.add(finished).unwrap();
        let keep = manager.add(running).unwrap();
        manager.get_mut(keep).unwrap().spawn(1);
        assert_eq!(shared.borrow().live_count(), 3);

        manager.update(1.0).unwrap();
        assert_eq!(manager.remove_finished(), 1);
        assert_eq!(manager.ids().collect::<Vec<_>>(), vec![keep]);
        assert_eq!(shared.borrow().live_count(), 1);

        manager.clear();
        assert_eq!(shared.borrow().live_count(), 0);
    }
}
