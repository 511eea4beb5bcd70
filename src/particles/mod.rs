//! 粒子模拟模块
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            ParticleSystemManager              │
//! │   ┌───────────────────────────────────────┐   │
//! │   │ Emitter                               │   │
//! │   │  - 模板配置 (EmitterConfig)            │   │
//! │   │  - 发射策略 (EmissionPolicy)           │   │
//! │   │  - Vec<Particle> ──▶ Renderer 绑定     │   │
//! │   └───────────────────────────────────────┘   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```
//! use glam::Vec2;
//! use sprite_particles::config::EmitterConfig;
//! use sprite_particles::particles::{EmissionPolicy, Emitter};
//!
//! let config = EmitterConfig::default()
//!     .with_gravity(Vec2::new(0.0, -9.8))
//!     .with_emission(EmissionPolicy::Rate { per_second: 4.0 })
//!     .with_seed(7);
//! let mut emitter = Emitter::new(config)?;
//!
//! let report = emitter.update(0.25)?;
//! assert_eq!(report.spawned, 1);
//! # Ok::<(), sprite_particles::ParticleError>(())
//! ```

pub mod emission;
pub mod emitter;
pub mod particle;
pub mod size;
pub mod spawn;
pub mod system;

pub use emission::{
    EmissionPolicy, EmissionState, MAX_EMISSION_PER_STEP, MAX_EMISSION_RATE, MIN_BURST_INTERVAL,
};
pub use emitter::{Emitter, EmitterStats, UpdateReport};
pub use particle::{DragMode, Particle, ParticleEnv};
pub use size::{SizeOverTime, SizeSample, MIN_SIZE};
pub use spawn::Rect;
pub use system::{EmitterId, ParticleSystemManager};
