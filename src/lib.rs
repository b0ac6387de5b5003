//! # Rev Compare Library / Rev Compare 库
//!
//! This library provides the core functionality for the rev-compare tool,
//! a before/after comparison runner that builds two revisions of a library
//! and runs a caller-supplied test or benchmark program against each.
//!
//! 此库为 rev-compare 工具提供核心功能，
//! 这是一个前后对比运行器，它构建一个库的两个修订版本，
//! 并针对每个版本运行调用者提供的测试或基准测试程序。
//!
//! ## Modules / 模块
//!
//! - `core` - Run configuration, error taxonomy and the comparison pipeline
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Comparison result reporting (console and JSON)
//! - `cli` - Command-line interface
//!
//! - `core` - 运行配置、错误分类和对比流水线
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - 对比结果报告（控制台和 JSON）
//! - `cli` - 命令行接口

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    // Detect system locale and set it for i18n.
    // Fallback to "en" if detection fails.
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    // Try to match the full locale first (e.g., "zh-CN")
    // Then try to match the language part only (e.g., "en" from "en-US")
    // Finally, fall back to "en"
    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
