//! # Sprite Particles
//!
//! A frame-stepped 2D particle-effect simulator for a game's visual-effects layer.
//!
//! ## Features
//!
//! - **Emitters**: spawn-rect sampling, emission policies (manual, rate, burst), duration and repeat
//! - **Particles**: gravity, one-shot impulses, drag, angular velocity, lifetime and expiry
//! - **Size over time**: constant, runtime pulse, lifetime curve or a custom function
//! - **Renderer seam**: an injected [`render::Renderer`] mirrors every particle's transform;
//!   simulation never depends on rendering success
//! - **Configuration**: TOML/JSON emitter presets with validation and environment overrides
//!
//! ## Architecture Design
//!
//! The host owns a [`particles::ParticleSystemManager`] (or individual emitters) and calls
//! `update(delta_time)` once per frame. Time comes only from `delta_time` and randomness from
//! a seedable generator, so runs are reproducible.
//!
//! ### Example
//!
//! ```
//! use glam::Vec2;
//! use sprite_particles::config::EmitterConfig;
//! use sprite_particles::particles::Emitter;
//! use sprite_particles::render::RecordingRenderer;
//!
//! let config = EmitterConfig::default()
//!     .with_gravity(Vec2::new(0.0, -10.0))
//!     .with_drag(0.1)
//!     .with_seed(1);
//! let mut emitter = Emitter::with_renderer(config, RecordingRenderer::new())?;
//! emitter.spawn(1);
//! emitter.update(1.0)?;
//!
//! let particle = &emitter.particles()[0];
//! assert!((particle.position().y + 9.0).abs() < 1e-5);
//! # Ok::<(), sprite_particles::ParticleError>(())
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors, logging and shared macros
//! - [`config`]: Emitter presets and logging configuration
//! - [`particles`]: Emitter, particle and manager simulation
//! - [`render`]: Renderer interface and headless implementations

/// Errors, logging initialization and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Particle and emitter simulation
pub mod particles;
/// Renderer collaborator interface
pub mod render;

pub use crate::core::{init_logging, ParticleError, ParticleResult, RenderError, RenderResult};
