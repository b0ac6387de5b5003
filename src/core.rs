//! # Core Module / 核心模块
//!
//! This module contains the core functionality of rev-compare,
//! including the run configuration, error taxonomy and the comparison pipeline.
//!
//! 此模块包含 rev-compare 的核心功能，
//! 包括运行配置、错误分类和对比流水线。

pub mod config;
pub mod execution;
pub mod models;

// Re-exports
pub use config::{Mode, RunConfig};
pub use execution::run_comparison;
pub use models::{CompareError, Phase};
